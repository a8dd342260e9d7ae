//! Text helpers for user input and log output

/// Shorten `s` to at most `limit` bytes for a log line.
///
/// The cut falls on a char boundary and the suffix records the full length.
pub fn truncate_for_log(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= limit)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Remove line breaks from text typed into forms and prompts
pub fn strip_newlines(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
