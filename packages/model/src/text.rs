//! Character-index helpers.
//!
//! Every offset in a [`Value`](crate::Value) counts Unicode scalar values, while
//! `str` slicing works on bytes. These helpers translate between the two.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `index`, or `text.len()` past the end.
pub fn byte_index(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Characters `[start, end)` of `text`. Out-of-range bounds are clamped.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let from = byte_index(text, start);
    let to = byte_index(text, end.max(start));
    &text[from..to]
}

/// Character at `index`, if any.
pub fn char_at(text: &str, index: usize) -> Option<char> {
    text.chars().nth(index)
}
