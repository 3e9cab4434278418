//! Helpers for pulling JSON out of model text.

use serde_json::Value as JsonValue;

/// Parse model output as JSON, tolerating a surrounding markdown code fence.
pub fn parse_model_json(text: &str) -> Option<JsonValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str(trimmed) {
        return Some(v);
    }

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))?;
    serde_json::from_str(unfenced.trim()).ok()
}

/// Normalize model text: whitespace-only answers count as no answer.
pub fn non_empty_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let v = parse_model_json(r#"{"mixName": "Dusk"}"#).unwrap();
        assert_eq!(v["mixName"], "Dusk");
    }

    #[test]
    fn test_parse_fenced_json() {
        let v = parse_model_json("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(v["a"], 1);
        let v = parse_model_json("```\n[1, 2]\n```").unwrap();
        assert_eq!(v[1], 2);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_model_json("").is_none());
        assert!(parse_model_json("here is your recipe").is_none());
        assert!(parse_model_json("```json\nnot json\n```").is_none());
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(non_empty_text(Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(non_empty_text(Some("   ".to_string())), None);
        assert_eq!(non_empty_text(None), None);
    }
}
