//! Markdown escaping helpers.

/// Characters that carry Markdown meaning somewhere in a line.
const SPECIAL: &[char] = &[
    '\\', '*', '_', '`', '~', '[', ']', '(', ')', '#', '>', '+', '-', '=', '|', '{', '}', '!',
];

/// Backslash-escapes every Markdown metacharacter in `text`.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        if SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escapes text for a table cell; line breaks become spaces.
pub fn escape_cell(text: &str) -> String {
    if is_url(text) {
        return format!("<{}>", text.trim());
    }
    let single_line: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    escape_markdown(single_line.trim())
}

/// True for absolute `http(s)`/`mailto` links without whitespace.
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:"))
        && !text.contains(char::is_whitespace)
}

/// Double-quoted front-matter scalar.
pub fn quote_scalar(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
