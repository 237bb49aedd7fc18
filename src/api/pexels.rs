use crate::error::{GenerateError, GenerateResult};
use reqwest::Client;
use serde::Deserialize;

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    large: String,
}

pub struct PexelsClient {
    client: Client,
    api_key: String,
}

impl PexelsClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Searches for one stock photo matching the keywords and returns its
    /// "large" variant URL, or `None` when nothing matches.
    pub async fn search_photo(&self, keywords: &str) -> GenerateResult<Option<String>> {
        let resp = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", keywords), ("per_page", "1")])
            .send()
            .await?
            .error_for_status()?;

        let raw = resp.text().await?;
        parse_search_response(&raw)
    }
}

fn parse_search_response(raw: &str) -> GenerateResult<Option<String>> {
    let body: SearchResponse = serde_json::from_str(raw)
        .map_err(|e| GenerateError::Parse(format!("photo search body: {e}")))?;
    Ok(body.photos.into_iter().next().map(|p| p.src.large))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_large_variant_of_the_first_match() {
        let raw = r#"{
            "page": 1,
            "photos": [
                {"id": 101, "src": {"original": "https://images.example/101.jpg",
                                    "large": "https://images.example/101-large.jpg"}},
                {"id": 102, "src": {"original": "https://images.example/102.jpg",
                                    "large": "https://images.example/102-large.jpg"}}
            ]
        }"#;

        let url = parse_search_response(raw).unwrap();
        assert_eq!(url.as_deref(), Some("https://images.example/101-large.jpg"));
    }

    #[test]
    fn no_match_yields_none() {
        let url = parse_search_response(r#"{"page": 1, "photos": []}"#).unwrap();
        assert!(url.is_none());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_search_response("not json").unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }
}
