//! Title and body extraction for plain text, Markdown and JSON uploads.
//!
//! Parsing never fails: every branch has a file-name fallback, and invalid
//! JSON is treated as plain text.

use serde_json::Value;

use crate::models::{base_name, ParsedContent, UploadedFile};

/// Parses an uploaded text file. Non-UTF-8 bytes are replaced lossily.
pub fn parse(file: &UploadedFile) -> ParsedContent {
    let content = String::from_utf8_lossy(&file.bytes);
    match file.extension().as_deref() {
        Some("md") | Some("markdown") => parse_markdown(&content, &file.name),
        Some("json") => parse_json(&content, &file.name),
        _ => parse_text(&content, &file.name),
    }
}

/// First non-empty line as title when it is under 100 characters.
pub fn parse_text(content: &str, file_name: &str) -> ParsedContent {
    let title = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .filter(|l| l.chars().count() < 100)
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| base_name(file_name).to_string());

    ParsedContent {
        title,
        content: content.trim().to_string(),
    }
}

/// First `# ` heading as title; the body keeps its headers.
pub fn parse_markdown(content: &str, file_name: &str) -> ParsedContent {
    let title = content
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| base_name(file_name).to_string());

    ParsedContent {
        title,
        content: content.trim().to_string(),
    }
}

/// `title`/`name` and `content`/`description` fields of a JSON object.
pub fn parse_json(content: &str, file_name: &str) -> ParsedContent {
    let value: Value = match serde_json::from_str(content) {
        Ok(Value::Null) => {
            tracing::debug!(file = file_name, "JSON document is null, parsing as text");
            return parse_text(content, file_name);
        }
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(file = file_name, error = %e, "invalid JSON, parsing as text");
            return parse_text(content, file_name);
        }
    };

    let title = first_string_field(&value, &["title", "name"])
        .unwrap_or_else(|| base_name(file_name).to_string());
    let body = first_string_field(&value, &["content", "description"])
        .unwrap_or_else(|| serde_json::to_string_pretty(&value).unwrap_or_default());

    ParsedContent {
        title,
        content: body,
    }
}

/// First field among `keys` holding a truthy value: `null`, `false`, zero
/// and the empty string are skipped. Non-string values are rendered as
/// compact JSON.
fn first_string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_named(name: &str, body: &str) -> ParsedContent {
        parse(&UploadedFile::new(name, body.as_bytes().to_vec()))
    }

    #[test]
    fn text_uses_first_line() {
        let parsed = parse_named("notes.txt", "\n  Weekly sync  \nbody line\n");
        assert_eq!(parsed.title, "Weekly sync");
        assert_eq!(parsed.content, "Weekly sync  \nbody line");
    }

    #[test]
    fn text_long_first_line_falls_back_to_file_name() {
        let parsed = parse_named("minutes.2024.txt", &"x".repeat(120));
        assert_eq!(parsed.title, "minutes.2024");
    }

    #[test]
    fn empty_text_uses_file_name() {
        let parsed = parse_named("blank.txt", "   \n");
        assert_eq!(parsed.title, "blank");
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn markdown_heading_becomes_title() {
        let parsed = parse_named("guide.md", "# My Title\nSome body text");
        assert_eq!(
            parsed,
            ParsedContent {
                title: "My Title".to_string(),
                content: "# My Title\nSome body text".to_string(),
            }
        );
    }

    #[test]
    fn markdown_without_h1_uses_file_name() {
        let parsed = parse_named("guide.md", "## Sub only\ntext");
        assert_eq!(parsed.title, "guide");
    }

    #[test]
    fn json_name_and_description() {
        let parsed = parse_named("item.json", r#"{"name":"X","description":"Y"}"#);
        assert_eq!(parsed.title, "X");
        assert_eq!(parsed.content, "Y");
    }

    #[test]
    fn json_without_content_is_pretty_printed() {
        let parsed = parse_named("item.json", r#"{"title":"T","tags":["a"]}"#);
        assert_eq!(parsed.title, "T");
        assert!(parsed.content.contains("\n  \"tags\""));
    }

    #[test]
    fn malformed_json_matches_text_parser() {
        let raw = "{ not json\nsecond line";
        let parsed = parse_named("broken.json", raw);
        assert_eq!(parsed, parse_text(raw, "broken.json"));
        assert_eq!(parsed.title, "{ not json");
    }

    #[test]
    fn json_zero_fields_fall_through() {
        let parsed = parse_named("item.json", r#"{"title":0,"name":"N","content":0.0,"description":"D"}"#);
        assert_eq!(parsed.title, "N");
        assert_eq!(parsed.content, "D");
    }

    #[test]
    fn json_null_document_matches_text_parser() {
        let parsed = parse_named("empty.json", "null");
        assert_eq!(parsed, parse_text("null", "empty.json"));
        assert_eq!(parsed.title, "null");
    }

    #[test]
    fn unknown_extension_parsed_as_text() {
        let parsed = parse_named("data.csv", "a,b\n1,2");
        assert_eq!(parsed.title, "a,b");
    }
}
