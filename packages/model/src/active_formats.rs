//! Queries over the current selection: active formats, the selected object,
//! collapsed/empty checks and plain text content.

use crate::format::{is_format_equal, FormatList, FormatRef, Replacement};
use crate::special_chars::OBJECT_REPLACEMENT_CHARACTER;
use crate::text::char_at;
use crate::value::Value;

/// Formats active for the current selection.
///
/// For a collapsed caret the cached `active_formats` win. Without a cache the
/// caret sits between two characters and takes the shorter of their format
/// stacks, so a caret right after a bold run types plain text. For a range
/// the result is the set of formats shared by every selected character.
pub fn get_active_formats(value: &Value) -> FormatList {
    let Some(start) = value.start else {
        return FormatList::new();
    };
    let end = value.end.unwrap_or(start);

    if start == end {
        if let Some(active_formats) = &value.active_formats {
            return active_formats.clone();
        }

        let before = start
            .checked_sub(1)
            .and_then(|index| value.formats.get(index))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let after = value
            .formats
            .get(start)
            .map(Vec::as_slice)
            .unwrap_or_default();

        return if before.len() < after.len() {
            before.to_vec()
        } else {
            after.to_vec()
        };
    }

    let Some(first) = value.formats.get(start) else {
        return FormatList::new();
    };

    let end = end.min(value.formats.len()).max(start);
    let mut active: FormatList = first.clone();

    for formats_at_index in value.formats[start..end].iter().rev() {
        if formats_at_index.is_empty() {
            return FormatList::new();
        }

        active.retain(|format| {
            formats_at_index
                .iter()
                .any(|other| is_format_equal(format, other))
        });

        if active.is_empty() {
            return FormatList::new();
        }
    }

    active
}

/// The active format of the given type, if any.
pub fn get_active_format(value: &Value, format_type: &str) -> Option<FormatRef> {
    get_active_formats(value)
        .into_iter()
        .find(|format| format.kind == format_type)
}

/// The object under the selection, when exactly one object-replacement
/// character is selected.
pub fn get_active_object(value: &Value) -> Option<&Replacement> {
    let (start, end) = (value.start?, value.end?);

    if start + 1 != end || char_at(&value.text, start) != Some(OBJECT_REPLACEMENT_CHARACTER) {
        return None;
    }

    value.replacements.get(start)?.as_ref()
}

/// `None` when the value tracks no selection.
pub fn is_collapsed(value: &Value) -> Option<bool> {
    Some(value.start? == value.end?)
}

pub fn is_empty(value: &Value) -> bool {
    value.text.is_empty()
}

/// Plain text with every object-replacement character removed.
pub fn get_text_content(value: &Value) -> String {
    value
        .text
        .chars()
        .filter(|c| *c != OBJECT_REPLACEMENT_CHARACTER)
        .collect()
}
