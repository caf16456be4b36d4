//! Mapping a host range onto character offsets while a tree is parsed.

use richtext_dom::{HostRange, HostTree, NodeKind};
use richtext_model::Value;

/// What a child node contributed: its length and any selection found inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Piece {
    pub len: usize,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Piece {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_len(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn of_value(value: &Value) -> Self {
        Self {
            len: value.len(),
            start: value.start,
            end: value.end,
        }
    }
}

/// Record the selection if `range` points at or into `node`.
///
/// `current` is the accumulated length before `node`. A text container maps
/// its offset directly. An element container addresses children, so a node
/// right at the offset starts the range and the node before it ends there.
pub(crate) fn accumulate_selection<H: HostTree>(
    host: &H,
    node: H::Node,
    range: Option<&HostRange<H::Node>>,
    current: usize,
    piece: Piece,
    start: &mut Option<usize>,
    end: &mut Option<usize>,
) {
    let Some(range) = range else {
        return;
    };

    let parent = host.parent(node);
    let is_text = host.kind(node) == NodeKind::Text;
    let child_of = |container: H::Node, offset: Option<usize>| {
        parent == Some(container) && offset.and_then(|o| host.child_at(container, o)) == Some(node)
    };

    let (start_container, start_offset) = (range.start_container, range.start_offset);
    if let Some(piece_start) = piece.start {
        *start = Some(current + piece_start);
    } else if node == start_container && is_text {
        *start = Some(current + start_offset);
    } else if child_of(start_container, Some(start_offset)) {
        *start = Some(current);
    } else if child_of(start_container, start_offset.checked_sub(1)) {
        *start = Some(current + piece.len);
    } else if node == start_container {
        *start = Some(current);
    }

    let (end_container, end_offset) = (range.end_container, range.end_offset);
    if let Some(piece_end) = piece.end {
        *end = Some(current + piece_end);
    } else if node == end_container && is_text {
        *end = Some(current + end_offset);
    } else if child_of(end_container, end_offset.checked_sub(1)) {
        *end = Some(current + piece.len);
    } else if child_of(end_container, Some(end_offset)) {
        *end = Some(current);
    } else if node == end_container {
        *end = Some(current + end_offset);
    }
}

/// Remap range offsets inside the text node `node` through `filter`, so they
/// count the characters that survive it.
pub(crate) fn filter_range<H, F>(
    host: &H,
    node: H::Node,
    range: Option<&HostRange<H::Node>>,
    filter: F,
) -> Option<HostRange<H::Node>>
where
    H: HostTree,
    F: Fn(&str) -> String,
{
    let mut range = *range?;
    let data = host.node_value(node).unwrap_or_default();
    let filtered_len = |offset: usize| {
        let prefix: String = data.chars().take(offset).collect();
        filter(&prefix).chars().count()
    };

    if node == range.start_container {
        range.start_offset = filtered_len(range.start_offset);
    }
    if node == range.end_container {
        range.end_offset = filtered_len(range.end_offset);
    }
    Some(range)
}
