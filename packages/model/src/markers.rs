//! Names of the attributes and replacement types the editor reserves for
//! itself in host markup.

/// Prefix of every editor-owned attribute. Such attributes never reach a Value.
pub const INTERNAL_ATTRIBUTE_PREFIX: &str = "data-rich-text-";

/// Prefix that neutralizes event handler attributes (`onclick` and friends)
/// inside editable trees.
pub const DISABLED_HANDLER_PREFIX: &str = "data-disable-rich-text-";

pub const COMMENT_TYPE: &str = "#comment";
pub const COMMENT_ATTRIBUTE: &str = "data-rich-text-comment";

pub const SCRIPT_TYPE: &str = "script";
/// Percent-encoded script body.
pub const SCRIPT_ATTRIBUTE: &str = "data-rich-text-script";

/// Marks line breaks rendered by the editor, as opposed to ones the host
/// inserted on its own.
pub const LINE_BREAK_ATTRIBUTE: &str = "data-rich-text-line-break";

pub const PLACEHOLDER_ATTRIBUTE: &str = "data-rich-text-placeholder";

/// Set on the element of the innermost format active at the caret.
pub const FORMAT_BOUNDARY_ATTRIBUTE: &str = "data-rich-text-format-boundary";
