//! # Intermediate Tree
//!
//! The framework-agnostic tree built from a Value before it is serialized or
//! reconciled into a host tree. Nodes live in an arena owned by the tree and
//! keep a parent link, because the builder constantly climbs from its
//! insertion pointer to the pointer's parent.

use richtext_model::Attributes;

/// Handle into a [`VTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VNodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Root,

    Element {
        tag: String,
        attributes: Attributes,
        /// Rendered without children or an end tag.
        object: bool,
    },

    Text { text: String },

    /// Trusted markup emitted verbatim.
    Html { html: String },

    Comment { data: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: Attributes::new(),
            object: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text { text: text.into() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn as_object(mut self) -> Self {
        if let VNode::Element { ref mut object, .. } = self {
            *object = true;
        }
        self
    }
}

#[derive(Debug, Clone)]
struct Entry {
    node: VNode,
    parent: Option<VNodeId>,
    children: Vec<VNodeId>,
}

#[derive(Debug, Clone)]
pub struct VTree {
    entries: Vec<Entry>,
}

impl Default for VTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VTree {
    pub fn new() -> Self {
        Self {
            entries: vec![Entry {
                node: VNode::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> VNodeId {
        VNodeId(0)
    }

    pub fn node(&self, id: VNodeId) -> &VNode {
        &self.entries[id.0].node
    }

    pub fn parent(&self, id: VNodeId) -> Option<VNodeId> {
        self.entries[id.0].parent
    }

    pub fn children(&self, id: VNodeId) -> &[VNodeId] {
        &self.entries[id.0].children
    }

    pub fn last_child(&self, id: VNodeId) -> Option<VNodeId> {
        self.entries[id.0].children.last().copied()
    }

    /// Append `node` as the last child of `parent`.
    pub fn append(&mut self, parent: VNodeId, node: VNode) -> VNodeId {
        let id = VNodeId(self.entries.len());
        self.entries.push(Entry {
            node,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.entries[parent.0].children.push(id);
        id
    }

    pub fn append_text(&mut self, parent: VNodeId, text: impl Into<String>) -> VNodeId {
        self.append(parent, VNode::text(text))
    }

    /// Extend the data of a text node.
    pub fn push_text(&mut self, id: VNodeId, c: char) {
        if let VNode::Text { text } = &mut self.entries[id.0].node {
            text.push(c);
        }
    }

    /// Detach `id` from its parent.
    pub fn remove(&mut self, id: VNodeId) {
        if let Some(parent) = self.entries[id.0].parent.take() {
            self.entries[parent.0].children.retain(|child| *child != id);
        }
    }

    pub fn is_text(&self, id: VNodeId) -> bool {
        matches!(self.node(id), VNode::Text { .. })
    }

    /// Data of a text node.
    pub fn text(&self, id: VNodeId) -> Option<&str> {
        match self.node(id) {
            VNode::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Position of `id` among its siblings.
    pub fn index_in_parent(&self, id: VNodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }
}

/// A position recorded while building: child indices from the root down to a
/// node, plus an offset inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionPath {
    pub indices: Vec<usize>,
    pub offset: usize,
}

impl SelectionPath {
    /// Path from the root of `tree` to `node`, with the node's text length
    /// (zero for non-text nodes) as the offset.
    pub fn to_node(tree: &VTree, node: VNodeId) -> Self {
        let mut indices = Vec::new();
        let mut current = node;
        while let Some(index) = tree.index_in_parent(current) {
            indices.push(index);
            match tree.parent(current) {
                Some(parent) if parent != tree.root() => current = parent,
                _ => break,
            }
        }
        indices.reverse();

        Self {
            indices,
            offset: tree.text(node).map_or(0, |text| text.chars().count()),
        }
    }
}
