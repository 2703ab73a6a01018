//! Text helpers shared by logging, error reporting and console output.

/// Longest prefix of `s` that fits in `max_bytes` and ends on a char boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// A bounded excerpt of `s` for display.
///
/// Text within `max_bytes` is returned as is; longer text is cut with
/// [`truncate_str`] and followed by a note giving the full size.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    format!("{}... ({} bytes total)", truncate_str(s, max_bytes), s.len())
}
