use crate::format::{is_format_equal, FormatList};
use crate::value::Value;
use std::sync::Arc;

/// Make structurally equal formats at the same depth of adjacent characters
/// share one reference.
///
/// Afterwards a run is detectable with `Arc::ptr_eq` alone, which is what the
/// tree builder relies on to reuse nodes.
pub fn normalise_formats(value: Value) -> Value {
    let Value {
        text,
        formats,
        replacements,
        start,
        end,
        active_formats,
    } = value;

    let mut normalised: Vec<FormatList> = Vec::with_capacity(formats.len());

    for mut formats_at_index in formats {
        if let Some(previous) = normalised.last() {
            for (depth, format) in formats_at_index.iter_mut().enumerate() {
                let Some(previous_format) = previous.get(depth) else {
                    break;
                };
                if !Arc::ptr_eq(format, previous_format) && is_format_equal(format, previous_format)
                {
                    *format = Arc::clone(previous_format);
                }
            }
        }
        normalised.push(formats_at_index);
    }

    Value {
        text,
        formats: normalised,
        replacements,
        start,
        end,
        active_formats,
    }
}
