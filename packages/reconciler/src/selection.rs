//! Restore a selection recorded as tree paths on the live tree.

use richtext_dom::{HostRange, HostTree};
use richtext_tree::SelectionPath;
use tracing::debug;

/// Walk `path` down from `root`. `None` when an index or the offset is out
/// of range.
pub fn resolve_path<H: HostTree>(host: &H, root: H::Node, path: &SelectionPath) -> Option<(H::Node, usize)> {
    let mut node = root;
    for &index in &path.indices {
        node = host.child_at(node, index)?;
    }
    (path.offset <= host.node_length(node)).then_some((node, path.offset))
}

/// Point the host selection at `start`..`end` under `current`.
///
/// Returns whether the selection was written. Nothing is written when a path
/// does not resolve or the host already holds the same range. If the write
/// moved focus, focus goes back to the element that had it.
pub fn apply_selection<H: HostTree>(
    host: &mut H,
    start: &SelectionPath,
    end: &SelectionPath,
    current: H::Node,
) -> bool {
    let (Some((start_container, start_offset)), Some((end_container, end_offset))) = (
        resolve_path(host, current, start),
        resolve_path(host, current, end),
    ) else {
        debug!(?start, ?end, "Selection path does not resolve, leaving selection as is");
        return false;
    };

    let range = HostRange::new(start_container, start_offset, end_container, end_offset);
    if host.selection() == Some(range) {
        debug!("Selection unchanged, skipping write");
        return false;
    }

    let active_element = host.active_element();
    host.set_selection(range);

    if host.active_element() != active_element {
        if let Some(previous) = active_element {
            debug!(?previous, "Restoring focus");
            host.focus(previous);
        }
    }

    true
}
