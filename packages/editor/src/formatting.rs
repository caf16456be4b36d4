//! # Format Operations
//!
//! Apply, remove and toggle formats over a range, and carry the active
//! formats over text typed at a caret.
//!
//! At a collapsed caret, apply and remove act on the whole run of the
//! format under the caret: every neighbouring character holding the very
//! same `Arc` is updated, walking backward and then forward.

use crate::edit::resolve_range;
use richtext_model::{
    get_active_format, is_format_equal, normalise_formats, FormatList, FormatRef, Value,
};
use std::sync::Arc;
use tracing::trace;

/// Add `format` to `[start, end)`, replacing any format of the same type.
///
/// On a range the format is inserted at the shallowest depth shared by every
/// character so it wraps the existing nesting. At a caret the format under
/// the caret is swapped in place along its run. Either way the format becomes
/// active.
pub fn apply_format(
    value: &Value,
    format: FormatRef,
    start: Option<usize>,
    end: Option<usize>,
) -> Value {
    value.assert_valid();

    let (start, end) = resolve_range(value, start, end);
    let mut formats = value.formats.clone();

    if start == end {
        let existing = formats.get(start).and_then(|list| {
            list.iter()
                .position(|candidate| candidate.kind == format.kind)
                .map(|depth| (depth, list[depth].clone()))
        });

        if let Some((depth, existing)) = existing {
            let same_at_depth = |list: &FormatList| {
                list.get(depth)
                    .is_some_and(|candidate| Arc::ptr_eq(candidate, &existing))
            };

            let mut index = start;
            loop {
                if !same_at_depth(&formats[index]) {
                    break;
                }
                formats[index][depth] = format.clone();
                match index.checked_sub(1) {
                    Some(previous) => index = previous,
                    None => break,
                }
            }

            for list in formats.iter_mut().skip(start + 1) {
                if !same_at_depth(list) {
                    break;
                }
                list[depth] = format.clone();
            }
        }
    } else {
        let mut depth = usize::MAX;
        for list in &mut formats[start..end] {
            list.retain(|candidate| candidate.kind != format.kind);
            depth = depth.min(list.len());
        }
        trace!(kind = format.kind.as_str(), depth, "Applying format to range");

        for list in &mut formats[start..end] {
            list.insert(depth, format.clone());
        }
    }

    let mut active_formats: FormatList = value
        .active_formats
        .iter()
        .flatten()
        .filter(|candidate| candidate.kind != format.kind)
        .cloned()
        .collect();
    active_formats.push(format);

    normalise_formats(Value {
        formats,
        active_formats: Some(active_formats),
        ..value.clone()
    })
}

/// Remove every format of type `kind` from `[start, end)`.
///
/// At a caret the whole run of the format under the caret is removed.
pub fn remove_format(value: &Value, kind: &str, start: Option<usize>, end: Option<usize>) -> Value {
    value.assert_valid();

    let (start, end) = resolve_range(value, start, end);
    let mut formats = value.formats.clone();

    if start == end {
        let existing = formats
            .get(start)
            .and_then(|list| list.iter().find(|candidate| candidate.kind == kind))
            .cloned();

        if let Some(existing) = existing {
            let holds = |list: &FormatList| list.iter().any(|candidate| Arc::ptr_eq(candidate, &existing));

            let mut index = start;
            loop {
                if !holds(&formats[index]) {
                    break;
                }
                formats[index].retain(|candidate| candidate.kind != kind);
                match index.checked_sub(1) {
                    Some(previous) => index = previous,
                    None => break,
                }
            }

            for list in formats.iter_mut().skip(start + 1) {
                if !holds(list) {
                    break;
                }
                list.retain(|candidate| candidate.kind != kind);
            }
        }
    } else {
        for list in &mut formats[start..end] {
            list.retain(|candidate| candidate.kind != kind);
        }
    }

    let active_formats: FormatList = value
        .active_formats
        .iter()
        .flatten()
        .filter(|candidate| candidate.kind != kind)
        .cloned()
        .collect();

    normalise_formats(Value {
        formats,
        active_formats: Some(active_formats),
        ..value.clone()
    })
}

/// Remove `format`'s type when it is active at the selection, apply it
/// otherwise.
pub fn toggle_format(value: &Value, format: FormatRef) -> Value {
    if get_active_format(value, &format.kind).is_some() {
        trace!(kind = format.kind.as_str(), "Toggling format off");
        return remove_format(value, &format.kind, None, None);
    }

    apply_format(value, format, None, None)
}

/// Give the characters `[start, end)` the given formats and make them the
/// active formats.
///
/// Formats equal to the ones on either side of the range reuse the
/// neighbour's `Arc`, so freshly typed text joins the run it was typed into.
/// The result is not normalised.
pub fn update_formats(mut value: Value, start: usize, end: usize, formats: &[FormatRef]) -> Value {
    let len = value.formats.len();
    let min = start.min(end).min(len);
    let max = start.max(end).min(len);

    let before: FormatList = min
        .checked_sub(1)
        .and_then(|index| value.formats.get(index))
        .cloned()
        .unwrap_or_default();
    let after: FormatList = value.formats.get(max).cloned().unwrap_or_default();

    let active_formats: FormatList = formats
        .iter()
        .enumerate()
        .map(|(depth, format)| {
            let neighbour = before.get(depth).or_else(|| after.get(depth));
            match neighbour {
                Some(neighbour) if is_format_equal(format, neighbour) => neighbour.clone(),
                _ => format.clone(),
            }
        })
        .collect();

    let end = end.min(len);
    if start < end {
        for list in &mut value.formats[start..end] {
            *list = active_formats.clone();
        }
    }

    value.active_formats = Some(active_formats);
    value
}
