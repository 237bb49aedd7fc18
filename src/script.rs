use crate::error::{GenerateError, GenerateResult};
use serde::{Deserialize, Serialize};

/// One unit of narration plus the search keywords for its visual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub keywords: String,
    pub narration: String,
}

/// The narration plan for one video: a title and an ordered scene list, in
/// exactly the shape the completion endpoint is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    pub scenes: Vec<Scene>,
}

impl Script {
    pub fn from_json(text: &str) -> GenerateResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| GenerateError::Parse(format!("script body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_requested_shape() {
        let raw = r#"{
            "title": "ISRO launch explained",
            "scenes": [
                {"keywords": "rocket launch", "narration": "A new mission lifts off."},
                {"keywords": "mission control room", "narration": "Engineers watch the ascent."},
                {"keywords": "satellite orbit earth", "narration": "The payload reaches orbit."},
                {"keywords": "celebration crowd", "narration": "The team celebrates."}
            ]
        }"#;

        let script = Script::from_json(raw).unwrap();
        assert_eq!(script.title, "ISRO launch explained");
        assert_eq!(script.scenes.len(), 4);
        assert_eq!(script.scenes[0].keywords, "rocket launch");
        assert_eq!(script.scenes[3].narration, "The team celebrates.");
    }

    #[test]
    fn missing_scenes_key_is_a_parse_error() {
        let err = Script::from_json(r#"{"title": "no scenes here"}"#).unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = Script::from_json("Sorry, I cannot do that.").unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }
}
