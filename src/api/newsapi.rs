use crate::error::{GenerateError, GenerateResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const NEWSAPI_SEARCH_URL: &str = "https://newsapi.org/v2/everything";
const TOPIC_QUERY: &str = "India OR Indian OR Modi OR ISRO OR Cricket OR Bollywood";
const MAX_PAGE_SIZE: u32 = 100;

/// A news item as served to callers: title, description, source name and
/// publish time, in the endpoint's recency order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
    pub source: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    source: Option<ArticleSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

pub struct NewsClient {
    client: Client,
    api_key: String,
}

impl NewsClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Fetches up to `limit` recent headlines for the fixed topic query.
    /// Articles without a title or description are dropped; an empty result
    /// list is not an error.
    pub async fn fetch_trending(&self, limit: u32) -> GenerateResult<Vec<Headline>> {
        let page_size = limit.min(MAX_PAGE_SIZE).to_string();
        let params = [
            ("apiKey", self.api_key.as_str()),
            ("q", TOPIC_QUERY),
            ("language", "en"),
            ("sortBy", "publishedAt"),
            ("pageSize", page_size.as_str()),
        ];

        let resp = self
            .client
            .get(NEWSAPI_SEARCH_URL)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let raw = resp.text().await?;
        parse_search_response(&raw)
    }
}

fn parse_search_response(raw: &str) -> GenerateResult<Vec<Headline>> {
    let body: SearchResponse = serde_json::from_str(raw)
        .map_err(|e| GenerateError::Parse(format!("news search body: {e}")))?;

    let headlines = body
        .articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title.filter(|t| !t.is_empty())?;
            let description = a.description.filter(|d| !d.is_empty())?;
            Some(Headline {
                title,
                description,
                source: a
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "News".to_string()),
                published_at: a.published_at.unwrap_or_default(),
            })
        })
        .collect();

    Ok(headlines)
}
