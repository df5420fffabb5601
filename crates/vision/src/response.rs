//! Text extraction from Responses API payloads.

use serde::Deserialize;

/// The parts of a Responses API reply we care about.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesBody {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<serde_json::Value>,
}

impl ResponsesBody {
    /// Prefer the aggregated `output_text`; otherwise scan `output[]` for the
    /// first textual item.
    pub fn text(&self) -> Option<String> {
        self.output_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| self.output.iter().find_map(item_text))
    }
}

/// Text carried by one `output[]` item.
///
/// Handles a bare `text` field, and `message` items whose `content` is either
/// a string or an array of `{type, text}` parts.
fn item_text(item: &serde_json::Value) -> Option<String> {
    if let Some(text) = non_empty_str(item.get("text")) {
        return Some(text);
    }
    if item.get("type").and_then(|t| t.as_str()) != Some("message") {
        return None;
    }
    match item.get("content")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(parts) => parts.iter().find_map(|part| {
            let kind = part.get("type").and_then(|t| t.as_str());
            if matches!(kind, Some("text" | "output_text")) {
                non_empty_str(part.get("text"))
            } else {
                None
            }
        }),
        _ => None,
    }
}

fn non_empty_str(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ResponsesBody {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn output_text_wins() {
        let body = parse(
            r#"{"output_text":"白飯、炒蛋","output":[{"type":"message","content":"ignored"}]}"#,
        );
        assert_eq!(body.text().as_deref(), Some("白飯、炒蛋"));
    }

    #[test]
    fn falls_back_to_message_parts() {
        let body = parse(
            r#"{"output":[
                {"type":"reasoning","summary":[]},
                {"type":"message","role":"assistant","content":[
                    {"type":"refusal","refusal":"no"},
                    {"type":"output_text","text":"牛肉麵","annotations":[]}
                ]}
            ]}"#,
        );
        assert_eq!(body.text().as_deref(), Some("牛肉麵"));
    }

    #[test]
    fn message_content_may_be_a_string() {
        let body = parse(r#"{"output_text":"","output":[{"type":"message","content":"無食物"}]}"#);
        assert_eq!(body.text().as_deref(), Some("無食物"));
    }

    #[test]
    fn bare_text_item_is_used() {
        let body = parse(r#"{"output":[{"type":"output_text","text":"蘋果"}]}"#);
        assert_eq!(body.text().as_deref(), Some("蘋果"));
    }

    #[test]
    fn nothing_textual_yields_none() {
        assert_eq!(parse(r#"{"output":[{"type":"message","content":[]}]}"#).text(), None);
        assert_eq!(parse("{}").text(), None);
    }
}
