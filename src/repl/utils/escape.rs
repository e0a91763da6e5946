//! Character escaping for XML element content.

/// Escape `&`, `<` and `>` for use as XML character content.
///
/// Single pass over the input: `&lt;` becomes `&amp;lt;`, and inserted
/// entities are never scanned again. Quotes are left alone because the
/// result is only placed between tags, never inside an attribute.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
