//! Redaction of Archer session credentials before text reaches the logs.

use once_cell::sync::Lazy;
use regex::Regex;

const REPLACEMENT: &str = "[REDACTED]";

/// Patterns with a captured prefix (1), secret value (2), and optional suffix (3).
static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

/// Redacts values that look like session credentials in a string.
///
/// # Example
/// ```rust
/// use archer_util::redact_sensitive;
///
/// let line = "Authorization: Archer session-id=ABC123";
/// assert_eq!(redact_sensitive(line), "Authorization: [REDACTED]");
///
/// let body = r#"{"SessionToken":"ABC123"}"#;
/// assert_eq!(redact_sensitive(body), r#"{"SessionToken":"[REDACTED]"}"#);
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = captures.get(3).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REPLACEMENT}{suffix}")
            })
            .to_string();
    }

    redacted
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(authorization:\s*)([^\r\n]+)",
        r"(?i)(session-id=)([^\s,;&]+)",
        r#"(?i)("sessiontoken"\s*:\s*")([^"]+)(")"#,
        r"(?i)([A-Z0-9_]*(?:TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}
