//! Response-shape unwrapping.
//!
//! Services behind a chat-completions URL disagree on where the text lives.
//! Matchers are tried in order and the first string found wins.

use serde_json::Value;

use essaypilot_protocols::AiError;

type Matcher = fn(&Value) -> Option<&str>;

const MATCHERS: &[(&str, Matcher)] = &[
    ("choices[0].message.content", first_choice),
    ("message.content", message_content),
    ("content", content),
    ("message", message),
    ("string", bare),
];

fn first_choice(v: &Value) -> Option<&str> {
    v.get("choices")?.get(0)?.get("message")?.get("content")?.as_str()
}

fn message_content(v: &Value) -> Option<&str> {
    v.get("message")?.get("content")?.as_str()
}

fn content(v: &Value) -> Option<&str> {
    v.get("content")?.as_str()
}

fn message(v: &Value) -> Option<&str> {
    v.get("message")?.as_str()
}

fn bare(v: &Value) -> Option<&str> {
    v.as_str()
}

/// Trimmed generated text from a response body.
pub fn extract_text(body: &Value) -> Result<String, AiError> {
    for (shape, matcher) in MATCHERS {
        if let Some(text) = matcher(body) {
            tracing::debug!("AI response matched shape {}", shape);
            return Ok(text.trim().to_string());
        }
    }

    let mut preview = body.to_string();
    if preview.len() > 200 {
        let cut = (0..=200).rev().find(|&i| preview.is_char_boundary(i)).unwrap_or(0);
        preview.truncate(cut);
    }
    Err(AiError::UnrecognizedShape(preview))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openai_shape() {
        let body = json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": "  Texto.\n"}}]});
        assert_eq!(extract_text(&body).unwrap(), "Texto.");
    }

    #[test]
    fn test_message_content_shape() {
        let body = json!({"message": {"role": "assistant", "content": "Olá"}});
        assert_eq!(extract_text(&body).unwrap(), "Olá");
    }

    #[test]
    fn test_content_string_shape() {
        assert_eq!(extract_text(&json!({"content": "a"})).unwrap(), "a");
    }

    #[test]
    fn test_message_string_shape() {
        assert_eq!(extract_text(&json!({"message": "b"})).unwrap(), "b");
    }

    #[test]
    fn test_bare_string() {
        assert_eq!(extract_text(&json!(" c ")).unwrap(), "c");
    }

    #[test]
    fn test_first_match_wins() {
        let body = json!({
            "choices": [{"message": {"content": "primeiro"}}],
            "content": "segundo"
        });
        assert_eq!(extract_text(&body).unwrap(), "primeiro");
    }

    #[test]
    fn test_non_string_content_falls_through() {
        let body = json!({"message": {"content": [{"type": "text"}]}, "content": "fallback"});
        assert_eq!(extract_text(&body).unwrap(), "fallback");
    }

    #[test]
    fn test_unrecognized_shape() {
        let err = extract_text(&json!({"data": 1})).unwrap_err();
        assert!(matches!(err, AiError::UnrecognizedShape(ref body) if body.contains("data")));
    }

    #[test]
    fn test_unrecognized_shape_preview_is_bounded() {
        let body = json!({"data": "é".repeat(300)});
        match extract_text(&body) {
            Err(AiError::UnrecognizedShape(preview)) => assert!(preview.len() <= 200),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
