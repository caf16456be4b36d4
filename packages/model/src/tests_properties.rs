use crate::format::{Format, FormatList};
use crate::normalise::normalise_formats;
use crate::value::Value;
use proptest::prelude::*;
use std::sync::Arc;

/// A value of up to 24 characters where each character picks its formats
/// from a small pool of freshly allocated (never shared) descriptors.
fn arb_value() -> impl Strategy<Value = Value> {
    prop::collection::vec((any::<char>(), prop::collection::vec(0u8..3, 0..3)), 0..24).prop_map(
        |chars| {
            let mut value = Value::default();
            for (c, kinds) in chars {
                let c = if crate::special_chars::is_reserved(c) { 'x' } else { c };
                value.text.push(c);
                let formats: FormatList = kinds
                    .into_iter()
                    .map(|kind| {
                        let name = ["core/bold", "core/italic", "core/code"][kind as usize];
                        Format::new(name).shared()
                    })
                    .collect();
                value.formats.push(formats);
                value.replacements.push(None);
            }
            value
        },
    )
}

fn same_identity(a: &Value, b: &Value) -> bool {
    a.formats.len() == b.formats.len()
        && a.formats.iter().zip(&b.formats).all(|(left, right)| {
            left.len() == right.len()
                && left.iter().zip(right).all(|(l, r)| Arc::ptr_eq(l, r))
        })
}

proptest! {
    #[test]
    fn prop_normalise_is_idempotent_by_identity(value in arb_value()) {
        let once = normalise_formats(value);
        let twice = normalise_formats(once.clone());
        prop_assert!(same_identity(&once, &twice));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_normalise_keeps_structure(value in arb_value()) {
        let normalised = normalise_formats(value.clone());
        prop_assert_eq!(&normalised, &value);
        prop_assert!(normalised.validate().is_ok());
    }

    #[test]
    fn prop_equal_neighbours_share_after_normalise(value in arb_value()) {
        let normalised = normalise_formats(value);
        for pair in normalised.formats.windows(2) {
            for (previous, current) in pair[0].iter().zip(&pair[1]) {
                if crate::format::is_format_equal(previous, current) {
                    prop_assert!(Arc::ptr_eq(previous, current));
                } else {
                    break;
                }
            }
        }
    }
}
