const MAX_SNIPPET_LENGTH: usize = 100;
const MAX_DETAIL_LENGTH: usize = 2_000;

/// Cut `text` to at most `max_chars` characters, appending `...` when shortened.
/// Counts chars rather than bytes so multi-byte responses never split mid-codepoint.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
    }
}

/// Short response excerpt for progress lines.
pub fn snippet(text: &str) -> String {
    truncate_chars(text.trim(), MAX_SNIPPET_LENGTH)
}

/// Longer excerpt kept in outcome details and the JSON report.
pub fn truncate_detail(text: &str) -> String {
    truncate_chars(text, MAX_DETAIL_LENGTH)
}
