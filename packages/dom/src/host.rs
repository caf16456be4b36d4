//! # Host Tree Adapter
//!
//! The parser reads and the reconciler patches a tree it does not own. This
//! trait is the whole surface they need: node inspection, a handful of
//! structural writes and the selection/focus state.
//!
//! Nodes are small copyable handles. Handle equality is node identity, which
//! is what selection accumulation and path resolution compare.

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

impl NodeKind {
    /// Text and comment nodes carry character data instead of children.
    pub fn is_character_data(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Comment)
    }
}

/// A selection expressed the way host trees address positions: a container
/// node plus an offset. The offset counts characters in text nodes and child
/// positions in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange<N> {
    pub start_container: N,
    pub start_offset: usize,
    pub end_container: N,
    pub end_offset: usize,
}

impl<N: Copy> HostRange<N> {
    pub fn collapsed(container: N, offset: usize) -> Self {
        Self {
            start_container: container,
            start_offset: offset,
            end_container: container,
            end_offset: offset,
        }
    }

    pub fn new(start_container: N, start_offset: usize, end_container: N, end_offset: usize) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }
}

pub trait HostTree {
    type Node: Copy + Eq + Debug;

    // Reads

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Lowercase tag name of an element.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Character data of a text or comment node.
    fn node_value(&self, node: Self::Node) -> Option<&str>;

    /// Attributes in source order.
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    fn get_attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn child_count(&self, node: Self::Node) -> usize;

    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Serialized children of an element.
    fn inner_html(&self, node: Self::Node) -> String;

    /// Deep structural equality: kind, tag, attribute set, data and children.
    fn is_equal_node(&self, a: Self::Node, b: Self::Node) -> bool;

    // Writes

    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn create_text(&mut self, data: &str) -> Self::Node;

    fn create_comment(&mut self, data: &str) -> Self::Node;

    /// Append to the data of a text or comment node.
    fn append_data(&mut self, node: Self::Node, data: &str);

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// Append `child` to `parent`, detaching it from its current parent first.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Put `new_child` where `old_child` is; `old_child` ends up detached.
    fn replace_child(&mut self, parent: Self::Node, new_child: Self::Node, old_child: Self::Node);

    /// Parse `html` and append the resulting nodes to `parent`.
    fn append_html(&mut self, parent: Self::Node, html: &str);

    // Selection and focus

    fn selection(&self) -> Option<HostRange<Self::Node>>;

    fn set_selection(&mut self, range: HostRange<Self::Node>);

    fn active_element(&self) -> Option<Self::Node>;

    fn focus(&mut self, node: Self::Node);

    // Provided helpers

    fn has_child_nodes(&self, node: Self::Node) -> bool {
        self.child_count(node) > 0
    }

    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        (0..self.child_count(node))
            .filter_map(|index| self.child_at(node, index))
            .collect()
    }

    fn has_attribute(&self, node: Self::Node, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    fn is_element(&self, node: Self::Node, tag: &str) -> bool {
        self.kind(node) == NodeKind::Element && self.tag_name(node) == Some(tag)
    }

    /// Length used for range offsets: characters for character data, child
    /// count otherwise.
    fn node_length(&self, node: Self::Node) -> usize {
        match self.node_value(node) {
            Some(data) if self.kind(node).is_character_data() => data.chars().count(),
            _ => self.child_count(node),
        }
    }

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: Self::Node) -> String {
        match self.kind(node) {
            NodeKind::Text | NodeKind::Comment => {
                self.node_value(node).unwrap_or_default().to_string()
            }
            NodeKind::Element | NodeKind::Document => self
                .children(node)
                .into_iter()
                .filter(|child| self.kind(*child) != NodeKind::Comment)
                .map(|child| self.text_content(child))
                .collect(),
        }
    }

    /// `node` is `ancestor` or lies below it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}
