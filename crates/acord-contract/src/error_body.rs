//! Response-body excerpts carried by HTTP status errors.

/// Upper bound on the response body kept in an HTTP status error.
pub const ERROR_BODY_MAX_CHARS: usize = 800;

/// Cuts `raw` to `max_chars` characters, marking the cut with `...`.
pub fn truncate_for_error(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let mut truncated = raw.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
