//! Best-effort JSON object extraction from model text
//!
//! Two stages:
//! 1. Strict parse of the whole (trimmed) text.
//! 2. Scan for top-level balanced `{...}` spans (string- and escape-aware)
//!    and parse them from last to first; the first one that parses wins.
//!
//! Models sometimes wrap their JSON in prose or markdown fences, which stage 2
//! recovers from. Anything else is reported as [`JsonExtractError::Unparsable`].

use serde_json::{Map, Value};
use thiserror::Error;

/// Characters of the offending text kept for diagnostics
const PREVIEW_CHARS: usize = 160;

/// Extraction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonExtractError {
    /// No JSON object could be recovered from the text
    #[error("Unparsable upstream response: {preview}")]
    Unparsable { preview: String },
}

/// Extract a JSON object from `text`
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, JsonExtractError> {
    let trimmed = text.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(map);
    }

    for span in balanced_object_spans(trimmed).into_iter().rev() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(span) {
            tracing::debug!("Recovered JSON object from surrounding text");
            return Ok(map);
        }
    }

    Err(JsonExtractError::Unparsable {
        preview: trimmed.chars().take(PREVIEW_CHARS).collect(),
    })
}

/// Top-level `{...}` spans in document order
fn balanced_object_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json() {
        let map = extract_json_object(r#"  {"title": "Dune", "year": 2021}  "#).unwrap();
        assert_eq!(map["title"], "Dune");
        assert_eq!(map["year"], 2021);
    }

    #[test]
    fn test_markdown_fenced_json() {
        let text = "```json\n{\"title\": \"Dune\"}\n```";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "Dune");
    }

    #[test]
    fn test_prose_then_json() {
        let text = "Hier is het resultaat:\n{\"title\": \"Alien\", \"type\": \"movie\"}";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "Alien");
    }

    #[test]
    fn test_last_object_wins() {
        let text = r#"Eerste poging {"title": "A"} en definitief {"title": "B"}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "B");
    }

    #[test]
    fn test_falls_back_to_earlier_object_when_last_is_broken() {
        let text = r#"{"title": "A"} daarna {"title": oops}"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["title"], "A");
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"noise {"line": "gebruik } en { vrij", "n": {"x": 1}} tail"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["line"], "gebruik } en { vrij");
        assert_eq!(map["n"]["x"], 1);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"x {"quote": "zei \"hoi\" }"} y"#;
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["quote"], "zei \"hoi\" }");
    }

    #[test]
    fn test_non_object_json_is_unparsable() {
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("\"just a string\"").is_err());
    }

    #[test]
    fn test_plain_text_is_unparsable() {
        let err = extract_json_object("Sorry, ik kan dit niet herkennen.").unwrap_err();
        let JsonExtractError::Unparsable { preview } = err;
        assert!(preview.starts_with("Sorry"));
    }

    #[test]
    fn test_empty_text_is_unparsable() {
        assert!(extract_json_object("").is_err());
        assert!(extract_json_object("   ").is_err());
    }

    #[test]
    fn test_unbalanced_is_unparsable() {
        assert!(extract_json_object(r#"{"title": "Dune""#).is_err());
    }
}
