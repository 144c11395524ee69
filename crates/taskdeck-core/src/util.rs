//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

const MAX_MESSAGE_CHARS: usize = 180;

/// Trim text to at most 180 characters for error messages, ending a cut
/// message with `...`.
pub fn compact_text(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= MAX_MESSAGE_CHARS {
        return trimmed.to_string();
    }
    let mut truncated = trimmed
        .chars()
        .take(MAX_MESSAGE_CHARS - 3)
        .collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
