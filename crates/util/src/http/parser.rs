//! # HTTP response helpers
//!
//! Decoding of Archer response bodies, plus short diagnostic hints for the
//! status codes the platform commonly returns.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 200;

/// Return a user-friendly hint for common HTTP status codes.
///
/// # Example
/// ```rust
/// use archer_util::http::status_error_message;
///
/// let error_401 = status_error_message(401).unwrap();
/// assert!(error_401.contains("ARCHER_SESSION_TOKEN"));
///
/// assert!(status_error_message(404).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: the Archer session expired; set ARCHER_SESSION_TOKEN=...".into()),
        403 => Some("Forbidden (403). Hint: check the user's access rights to the application".into()),
        _ => None,
    }
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// The error carries the originating status code and a truncated preview of
/// the body, with whitespace collapsed, so malformed payloads can be logged
/// without dumping the full response.
///
/// # Errors
/// Returns a [`JsonParseError`] describing the parse failure.
///
/// # Example
/// ```rust
/// use archer_util::http::parse_response_json_strict;
///
/// let value = parse_response_json_strict(r#"{"value": []}"#, None).unwrap();
/// assert!(value["value"].is_array());
///
/// let error = parse_response_json_strict("<html>login</html>", None).unwrap_err();
/// assert!(error.body_preview().contains("login"));
/// ```
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, BODY_PREVIEW_LIMIT);

        JsonParseError::new(status_note, error, preview)
    })
}

/// Collapse whitespace and cut `text` to roughly `limit` characters for logs.
pub fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
