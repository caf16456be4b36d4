//! Markup escaping for serialized text and attribute values.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// An entity reference at the start of the input, `;` included.
static ENTITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9]+|#[0-9]+|#x[a-f0-9]+);").expect("entity pattern is valid")
});

/// Control characters, whitespace, quotes, `>`, `/`, `=` and noncharacters.
static INVALID_ATTRIBUTE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{007F}-\u{009F} \"'>/=\u{FDD0}-\u{FDEF}]").expect("attribute name pattern is valid")
});

/// Escape `&` unless it already starts an entity reference.
pub fn escape_ampersand(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for (index, c) in value.char_indices() {
        if c == '&' && !ENTITY_PREFIX.is_match(&value[index + 1..]) {
            escaped.push_str("&amp;");
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    escape_ampersand(value).replace('"', "&quot;")
}

/// Escape editable text content. Every `&` is escaped so text that merely
/// looks like an entity is kept literally.
pub fn escape_editable_html(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;")
}

/// Escape text the way a browser serializes text nodes.
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '\u{a0}']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Escape an attribute value the way a browser serializes it.
pub fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '\u{a0}']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty() && !INVALID_ATTRIBUTE_NAME.is_match(name)
}
