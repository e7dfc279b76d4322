//! Query-string encoding for content API filters.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except ASCII alphanumerics and the unreserved marks `-_.~`.
const FORM_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Encode a query component the way HTML forms do.
///
/// Unreserved characters are kept, spaces become `+`, and every other byte of
/// the UTF-8 encoding is percent-encoded (including `/`, `'`, and `+`).
///
/// # Example
/// ```rust
/// use archer_util::encode_form_component;
///
/// assert_eq!(encode_form_component("Ticket Number eq 'INC-1'"), "Ticket+Number+eq+%27INC-1%27");
/// ```
pub fn encode_form_component(value: &str) -> String {
    utf8_percent_encode(value, FORM_COMPONENT).to_string().replace("%20", "+")
}
