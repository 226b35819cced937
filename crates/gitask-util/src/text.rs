/// Upper bound, in characters, for upstream bodies quoted in error messages.
pub const SNIPPET_LIMIT: usize = 500;

/// Trim `body` and cut it to at most `limit` characters on a char boundary.
pub fn snippet(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
