use crate::*;
use proptest::prelude::*;
use richtext_model::special_chars::is_reserved;
use richtext_model::text::char_slice;
use richtext_model::{Format, FormatList, Value};

const KINDS: [&str; 3] = ["core/bold", "core/italic", "core/code"];

fn arb_value() -> impl Strategy<Value = Value> {
    prop::collection::vec((any::<char>(), prop::collection::vec(0usize..3, 0..3)), 0..20).prop_map(
        |chars| {
            let mut value = Value::default();
            for (c, kinds) in chars {
                value.text.push(if is_reserved(c) { 'x' } else { c });
                let formats: FormatList = kinds
                    .into_iter()
                    .map(|kind| Format::new(KINDS[kind]).shared())
                    .collect();
                value.formats.push(formats);
                value.replacements.push(None);
            }
            value
        },
    )
}

/// A value plus an in-bounds `start <= end` pair.
fn arb_value_and_range() -> impl Strategy<Value = (Value, usize, usize)> {
    arb_value().prop_flat_map(|value| {
        let len = value.len();
        (Just(value), 0..=len, 0..=len)
            .prop_map(|(value, a, b)| (value, a.min(b), a.max(b)))
    })
}

fn assert_parallel(value: &Value) -> Result<(), TestCaseError> {
    prop_assert!(value.validate().is_ok(), "invalid value: {:?}", value);
    Ok(())
}

proptest! {
    #[test]
    fn prop_operations_keep_arrays_parallel(
        (value, start, end) in arb_value_and_range(),
        text in "[a-z\n]{0,5}",
        kind in 0usize..3,
    ) {
        let format = Format::new(KINDS[kind]).shared();
        let selected = value.clone().with_selection(start, end);

        assert_parallel(&insert_text(&value, &text, Some(start), Some(end)))?;
        assert_parallel(&remove(&value, Some(start), Some(end)))?;
        assert_parallel(&slice(&value, Some(start), Some(end)))?;
        assert_parallel(&apply_format(&value, format.clone(), Some(start), Some(end)))?;
        assert_parallel(&remove_format(&value, KINDS[kind], Some(start), Some(end)))?;
        assert_parallel(&toggle_format(&selected, format.clone()))?;
        assert_parallel(&concat(&[value.clone(), selected.clone()]))?;
        assert_parallel(&join(&[value.clone(), value.clone()], &Value::from_plain_text(",")))?;

        for piece in split(&selected, "a") {
            assert_parallel(&piece)?;
        }
        let (before, after) = split_at_selection(&selected, None, None).unwrap();
        assert_parallel(&before)?;
        assert_parallel(&after)?;
    }

    #[test]
    fn prop_insert_then_remove_restores_content(
        (value, start, _) in arb_value_and_range(),
        inserted in arb_value(),
    ) {
        let with_insert = insert(&value, &inserted, Some(start), Some(start));
        let restored = remove(&with_insert, Some(start), Some(start + inserted.len()));

        prop_assert_eq!(&restored.text, &value.text);
        prop_assert_eq!(&restored.formats, &value.formats);
        prop_assert_eq!(&restored.replacements, &value.replacements);
    }

    #[test]
    fn prop_slice_matches_text_slice((value, start, end) in arb_value_and_range()) {
        let sliced = slice(&value, Some(start), Some(end));
        prop_assert_eq!(sliced.text.as_str(), char_slice(&value.text, start, end));
        prop_assert_eq!(sliced.start, None);
    }

    #[test]
    fn prop_split_then_join_restores_text(value in arb_value()) {
        let pieces = split(&value, "a");
        let joined = join(&pieces, &Value::from_plain_text("a"));
        prop_assert_eq!(joined.text, value.text);
    }
}
