use crate::api::newsapi::Headline;
use crate::error::{GenerateError, GenerateResult};
use crate::script::Script;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

pub struct GroqClient {
    client: Client,
    api_key: String,
}

impl GroqClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Asks the model for a 4-scene narration script describing the headline.
    /// Either a fully-shaped `Script` comes back or the call fails; no
    /// image/render work happens on a partial response.
    pub async fn generate_script(&self, headline: &Headline) -> GenerateResult<Script> {
        let prompt = format!(
            "Create a 4-scene video script JSON for: {}. Format: {{\"title\": \"\", \"scenes\": [{{\"keywords\": \"\", \"narration\": \"\"}}]}}",
            headline.title
        );

        let body = json!({
            "model": GROQ_MODEL,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
        });

        let resp = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let raw = resp.text().await?;
        let content = extract_completion_text(&raw)?;
        let script = Script::from_json(&content)?;
        info!(
            "script received: \"{}\" ({} scenes)",
            script.title,
            script.scenes.len()
        );
        Ok(script)
    }
}

fn extract_completion_text(raw: &str) -> GenerateResult<String> {
    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }
    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMsg,
    }
    #[derive(Deserialize)]
    struct ChoiceMsg {
        content: String,
    }

    let resp: Resp = serde_json::from_str(raw)
        .map_err(|e| GenerateError::Parse(format!("completion body: {e}")))?;

    resp.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| GenerateError::Parse("completion body: no choices returned".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_choice_content() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"title\": \"t\", \"scenes\": []}"}}
            ]
        }"#;

        let content = extract_completion_text(raw).unwrap();
        let script = Script::from_json(&content).unwrap();
        assert_eq!(script.title, "t");
        assert!(script.scenes.is_empty());
    }

    #[test]
    fn empty_choice_list_is_a_parse_error() {
        let err = extract_completion_text(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[test]
    fn error_envelope_is_a_parse_error_not_a_panic() {
        let raw = r#"{"error": {"message": "model overloaded", "type": "server_error"}}"#;
        let err = extract_completion_text(raw).unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }
}
