//! # Splicing Operations
//!
//! Insert, remove, slice, split and join Values. Every operation copies the
//! parallel arrays it touches and returns a new Value; format references are
//! shared with the input, never mutated.
//!
//! Optional indexes fall back to the value's selection. Without a selection
//! the start is the end of the text and the end is the start. Indexes are
//! clamped to the text and `end` never precedes `start`.

use crate::errors::{EditorError, EditorResult};
use richtext_model::special_chars::remove_reserved_characters;
use richtext_model::text::char_slice;
use richtext_model::{normalise_formats, FormatList, Replacement, Value};
use tracing::trace;

/// Resolve optional indexes against the selection of `value`.
pub(crate) fn resolve_range(value: &Value, start: Option<usize>, end: Option<usize>) -> (usize, usize) {
    let len = value.len();
    let start = start.or(value.start).unwrap_or(len).min(len);
    let end = end.or(value.end).unwrap_or(start).min(len).max(start);
    (start, end)
}

/// Splice `to_insert` over `[start, end)`. The caret lands after the
/// inserted content.
pub fn insert(value: &Value, to_insert: &Value, start: Option<usize>, end: Option<usize>) -> Value {
    value.assert_valid();
    to_insert.assert_valid();

    let (start, end) = resolve_range(value, start, end);
    let len = value.len();

    let mut text = String::with_capacity(value.text.len() + to_insert.text.len());
    text.push_str(char_slice(&value.text, 0, start));
    text.push_str(&to_insert.text);
    text.push_str(char_slice(&value.text, end, len));

    let formats: Vec<FormatList> = value.formats[..start]
        .iter()
        .chain(&to_insert.formats)
        .chain(&value.formats[end..])
        .cloned()
        .collect();
    let replacements: Vec<Option<Replacement>> = value.replacements[..start]
        .iter()
        .chain(&to_insert.replacements)
        .chain(&value.replacements[end..])
        .cloned()
        .collect();

    let caret = start + to_insert.len();
    normalise_formats(Value {
        text,
        formats,
        replacements,
        start: Some(caret),
        end: Some(caret),
        active_formats: None,
    })
}

/// Insert unformatted `text`. Reserved characters are dropped.
pub fn insert_text(value: &Value, text: &str, start: Option<usize>, end: Option<usize>) -> Value {
    insert(value, &Value::from_plain_text(remove_reserved_characters(text)), start, end)
}

/// Insert one object-replacement character carrying `replacement`.
pub fn insert_object(
    value: &Value,
    replacement: Replacement,
    start: Option<usize>,
    end: Option<usize>,
) -> Value {
    insert(value, &Value::object(replacement), start, end)
}

pub fn remove(value: &Value, start: Option<usize>, end: Option<usize>) -> Value {
    insert(value, &Value::empty(), start, end)
}

/// Characters `[start, end)` without a selection.
///
/// When no index is given and the value has no selection either, the result
/// is a plain copy.
pub fn slice(value: &Value, start: Option<usize>, end: Option<usize>) -> Value {
    if start.or(value.start).is_none() || end.or(value.end).is_none() {
        return value.clone();
    }

    let (start, end) = resolve_range(value, start, end);
    sub_value(value, start, end)
}

fn sub_value(value: &Value, start: usize, end: usize) -> Value {
    Value {
        text: char_slice(&value.text, start, end).to_string(),
        formats: value.formats[start..end].to_vec(),
        replacements: value.replacements[start..end].to_vec(),
        ..Value::default()
    }
}

/// Split on every occurrence of `separator`.
///
/// The selection is carried into the pieces it overlaps: a piece holding a
/// selection endpoint gets the endpoint relative to itself, and a piece the
/// selection runs through is selected from its start or to its end. An empty
/// separator splits between characters.
pub fn split(value: &Value, separator: &str) -> Vec<Value> {
    value.assert_valid();

    let pieces: Vec<&str> = if separator.is_empty() {
        value
            .text
            .char_indices()
            .map(|(byte, c)| &value.text[byte..byte + c.len_utf8()])
            .collect()
    } else {
        value.text.split(separator).collect()
    };
    let separator_len = separator.chars().count();

    let mut next_start = 0;
    pieces
        .into_iter()
        .map(|substring| {
            let piece_start = next_start;
            let piece_len = substring.chars().count();
            let mut piece = sub_value(value, piece_start, piece_start + piece_len);
            next_start += separator_len + piece_len;

            if let (Some(start), Some(end)) = (value.start, value.end) {
                if start >= piece_start && start < next_start {
                    piece.start = Some((start - piece_start).min(piece_len));
                } else if start < piece_start && end > piece_start {
                    piece.start = Some(0);
                }

                if end >= piece_start && end < next_start {
                    piece.end = Some((end - piece_start).min(piece_len));
                } else if start < next_start && end > next_start {
                    piece.end = Some(piece_len);
                }

                match (piece.start, piece.end) {
                    (Some(_), None) => piece.end = Some(piece_len),
                    (None, Some(_)) => piece.start = Some(0),
                    _ => {}
                }
            }

            piece
        })
        .collect()
}

/// Split into the content before `start` and after `end`. The second half
/// gets a caret at its beginning.
pub fn split_at_selection(
    value: &Value,
    start: Option<usize>,
    end: Option<usize>,
) -> EditorResult<(Value, Value)> {
    if value.start.is_none() || value.end.is_none() {
        return Err(EditorError::NoSelection);
    }

    let (start, end) = resolve_range(value, start, end);
    trace!(start, end, "Splitting at selection");

    let before = sub_value(value, 0, start);
    let mut after = sub_value(value, end, value.len());
    after.start = Some(0);
    after.end = Some(0);
    Ok((before, after))
}

/// Concatenate values into one normalised value without a selection.
pub fn concat(values: &[Value]) -> Value {
    let mut combined = Value::empty();
    for value in values {
        append(&mut combined, value);
    }
    normalise_formats(combined)
}

/// Concatenate values with `separator` between each pair.
pub fn join(values: &[Value], separator: &Value) -> Value {
    let mut combined = Value::empty();
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            append(&mut combined, separator);
        }
        append(&mut combined, value);
    }
    normalise_formats(combined)
}

fn append(target: &mut Value, value: &Value) {
    target.text.push_str(&value.text);
    target.formats.extend(value.formats.iter().cloned());
    target.replacements.extend(value.replacements.iter().cloned());
}
