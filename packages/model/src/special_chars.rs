/// Stands in for an atomic embedded object (image, comment, script) in `Value::text`.
pub const OBJECT_REPLACEMENT_CHARACTER: char = '\u{FFFC}';

/// Zero-width padding used to give an empty line a caret anchor in editable trees.
pub const ZWNBSP: char = '\u{FEFF}';

pub const CARRIAGE_RETURN: char = '\r';

pub const LINE_BREAK: char = '\n';

/// Characters that are Value-internal and never legal in source text.
pub fn is_reserved(c: char) -> bool {
    matches!(c, OBJECT_REPLACEMENT_CHARACTER | ZWNBSP | CARRIAGE_RETURN)
}

/// Strip reserved characters from host text before it enters a Value.
pub fn remove_reserved_characters(text: &str) -> String {
    text.chars().filter(|c| !is_reserved(*c)).collect()
}
