//! # Rich Text Reconciler
//!
//! Keeps a live host tree in step with a Value: the Value is rendered into a
//! detached element, the live children are patched to match it with as few
//! mutations as possible, and the selection is restored from the paths the
//! tree builder recorded.

pub mod diff;
pub mod render;
pub mod selection;

#[cfg(test)]
mod tests_reconcile;

pub use diff::apply_value;
pub use render::{to_dom, Rendered, ToDomOptions};
pub use selection::{apply_selection, resolve_path};

use richtext_dom::HostTree;
use richtext_model::{FormatTypeRegistry, Value};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Patch the tree but leave the selection alone.
    pub dom_only: bool,
    pub preserve_white_space: bool,
    pub placeholder: Option<String>,
}

/// What a reconciliation did to the live tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub appended: usize,
    pub replaced: usize,
    pub removed: usize,
    /// Attributes set or removed on kept nodes.
    pub attribute_writes: usize,
    pub selection_written: bool,
}

impl ApplyReport {
    /// Nodes added, replaced or removed.
    pub fn structural_changes(&self) -> usize {
        self.appended + self.replaced + self.removed
    }
}

/// Render `value` and reconcile the children of `current` with it.
#[instrument(skip_all, fields(len = value.len(), dom_only = options.dom_only))]
pub fn apply<H, R>(
    host: &mut H,
    value: &Value,
    current: H::Node,
    registry: &R,
    options: &ApplyOptions,
) -> ApplyReport
where
    H: HostTree,
    R: FormatTypeRegistry + ?Sized,
{
    let to_dom_options = ToDomOptions {
        preserve_white_space: options.preserve_white_space,
        placeholder: options.placeholder.clone(),
        editable: true,
    };
    let rendered = to_dom(host, value, registry, &to_dom_options);
    let mut report = apply_value(host, rendered.body, current);

    if !options.dom_only && value.start.is_some() {
        if let (Some(start), Some(end)) = (&rendered.start, &rendered.end) {
            report.selection_written = apply_selection(host, start, end, current);
        }
    }

    debug!(
        appended = report.appended,
        replaced = report.replaced,
        removed = report.removed,
        attribute_writes = report.attribute_writes,
        selection_written = report.selection_written,
        "Applied value"
    );

    report
}
