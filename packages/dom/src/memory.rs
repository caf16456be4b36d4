//! # In-memory Host Tree
//!
//! An arena-backed tree implementing [`HostTree`]. Nodes are never freed;
//! removed subtrees simply become detached.
//!
//! One document node is the root of everything "connected". Writes that touch
//! connected nodes are recorded in a mutation log, the way a mutation
//! observer on the document would see them. Building a detached subtree and
//! then attaching it therefore shows up as a single `AppendChild` or
//! `ReplaceChild` entry.

use crate::escape::{escape_attribute_value, escape_text};
use crate::host::{HostRange, HostTree, NodeKind};
use crate::markup;
use std::fmt;
use tracing::warn;

/// Handle into a [`MemoryDom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NodeData {
    Document,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A write observed on a connected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: String,
    },
    AppendChild {
        parent: NodeId,
        child: NodeId,
    },
    RemoveChild {
        parent: NodeId,
        child: NodeId,
    },
    ReplaceChild {
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    },
    AppendData {
        node: NodeId,
        data: String,
    },
    AppendHtml {
        parent: NodeId,
        html: String,
    },
}

impl Mutation {
    /// Adds, removes or swaps nodes (as opposed to attribute or data edits).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::AppendChild { .. }
                | Mutation::RemoveChild { .. }
                | Mutation::ReplaceChild { .. }
                | Mutation::AppendHtml { .. }
        )
    }
}

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeEntry>,
    document: NodeId,
    selection: Option<HostRange<NodeId>>,
    active_element: Option<NodeId>,
    mutations: Vec<Mutation>,
    selection_writes: usize,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeEntry {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
            document: NodeId(0),
            selection: None,
            active_element: None,
            mutations: Vec::new(),
            selection_writes: 0,
        }
    }

    /// A new document with one connected `tag` element holding `html`.
    pub fn with_root(tag: &str, html: &str) -> (Self, NodeId) {
        let mut dom = Self::new();
        let root = dom.create_root(tag);
        dom.set_inner_html(root, html);
        (dom, root)
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Create an element attached directly to the document. Not logged.
    pub fn create_root(&mut self, tag: &str) -> NodeId {
        let root = self.create_element(tag);
        self.attach(self.document, root);
        root
    }

    /// Replace the children of `node` with parsed `html`. Not logged.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        for child in std::mem::take(&mut self.entry_mut(node).children) {
            self.entry_mut(child).parent = None;
        }
        markup::parse_into(self, node, html);
    }

    /// Overwrite the data of a text or comment node. Not logged.
    pub fn set_data(&mut self, node: NodeId, data: &str) {
        match &mut self.entry_mut(node).data {
            NodeData::Text(text) | NodeData::Comment(text) => {
                text.clear();
                text.push_str(data);
            }
            _ => warn!(%node, "set_data on a node without character data"),
        }
    }

    /// Serialized `node` itself.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut html = String::new();
        self.write_node(node, false, &mut html);
        html
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.document, node)
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    /// Number of `set_selection` calls so far.
    pub fn selection_writes(&self) -> usize {
        self.selection_writes
    }

    /// Nearest inclusive ancestor with `contenteditable="true"`.
    fn editing_host(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.get_attribute(candidate, "contenteditable") == Some("true") {
                return Some(candidate);
            }
            current = self.entry(candidate).parent;
        }
        None
    }

    /// Drop the selection without counting a write, as when focus leaves.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut NodeEntry {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn log(&mut self, target: NodeId, mutation: Mutation) {
        if self.is_connected(target) {
            self.mutations.push(mutation);
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.entry(node).parent {
            self.entry_mut(parent).children.retain(|child| *child != node);
            self.entry_mut(node).parent = None;
        }
    }

    /// Append without logging or cycle checks. Used by tree construction.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.entry_mut(child).parent = Some(parent);
        self.entry_mut(parent).children.push(child);
    }

    /// Append text to `parent`, merging into a trailing text child.
    pub(crate) fn attach_text(&mut self, parent: NodeId, data: &str) {
        if let Some(&last) = self.entry(parent).children.last() {
            if let NodeData::Text(text) = &mut self.entry_mut(last).data {
                text.push_str(data);
                return;
            }
        }
        let text = self.create_text(data);
        self.attach(parent, text);
    }

    pub(crate) fn child_list(&self, node: NodeId) -> &[NodeId] {
        &self.entry(node).children
    }

    /// Remove `child` from `parent` without logging.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        self.detach(child);
    }

    fn write_children(&self, node: NodeId, html: &mut String) {
        let raw = self
            .tag_name(node)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
        for &child in &self.entry(node).children {
            self.write_node(child, raw, html);
        }
    }

    fn write_node(&self, node: NodeId, raw: bool, html: &mut String) {
        match &self.entry(node).data {
            NodeData::Document => self.write_children(node, html),
            NodeData::Text(text) if raw => html.push_str(text),
            NodeData::Text(text) => html.push_str(&escape_text(text)),
            NodeData::Comment(data) => {
                html.push_str("<!--");
                html.push_str(data);
                html.push_str("-->");
            }
            NodeData::Element { tag, attributes } => {
                html.push('<');
                html.push_str(tag);
                for (name, value) in attributes {
                    html.push(' ');
                    html.push_str(name);
                    html.push_str("=\"");
                    html.push_str(&escape_attribute_value(value));
                    html.push('"');
                }
                html.push('>');
                if is_void_element(tag) {
                    return;
                }
                self.write_children(node, html);
                html.push_str("</");
                html.push_str(tag);
                html.push('>');
            }
        }
    }
}

impl HostTree for MemoryDom {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.entry(node).data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.entry(node).data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn node_value(&self, node: NodeId) -> Option<&str> {
        match &self.entry(node).data {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        match &self.entry(node).data {
            NodeData::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        }
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.entry(node).data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.entry(node).children.len()
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.entry(node).children.get(index).copied()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).parent
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut html = String::new();
        self.write_children(node, &mut html);
        html
    }

    fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }

        let (left, right) = (self.entry(a), self.entry(b));
        let same_data = match (&left.data, &right.data) {
            (
                NodeData::Element {
                    tag: left_tag,
                    attributes: left_attributes,
                },
                NodeData::Element {
                    tag: right_tag,
                    attributes: right_attributes,
                },
            ) => {
                left_tag == right_tag
                    && left_attributes.len() == right_attributes.len()
                    && left_attributes
                        .iter()
                        .all(|attribute| right_attributes.contains(attribute))
            }
            (left, right) => left == right,
        };

        same_data
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(l, r)| self.is_equal_node(*l, *r))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Text(data.to_string()))
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_string()))
    }

    fn append_data(&mut self, node: NodeId, data: &str) {
        match &mut self.entry_mut(node).data {
            NodeData::Text(text) | NodeData::Comment(text) => text.push_str(data),
            _ => {
                warn!(%node, "append_data on a node without character data");
                return;
            }
        }
        self.log(
            node,
            Mutation::AppendData {
                node,
                data: data.to_string(),
            },
        );
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let NodeData::Element { attributes, .. } = &mut self.entry_mut(node).data else {
            warn!(%node, name, "set_attribute on a non-element");
            return;
        };
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        self.log(
            node,
            Mutation::SetAttribute {
                node,
                name: name.to_string(),
                value: value.to_string(),
            },
        );
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let NodeData::Element { attributes, .. } = &mut self.entry_mut(node).data else {
            return;
        };
        let before = attributes.len();
        attributes.retain(|(key, _)| key != name);
        if attributes.len() != before {
            self.log(
                node,
                Mutation::RemoveAttribute {
                    node,
                    name: name.to_string(),
                },
            );
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.contains(child, parent) {
            warn!(%parent, %child, "append_child would create a cycle");
            return;
        }
        self.attach(parent, child);
        self.log(parent, Mutation::AppendChild { parent, child });
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.entry(child).parent != Some(parent) {
            warn!(%parent, %child, "remove_child on a node that is not a child");
            return;
        }
        self.detach(child);
        self.log(parent, Mutation::RemoveChild { parent, child });
    }

    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) {
        if self.entry(old_child).parent != Some(parent) || self.contains(new_child, parent) {
            warn!(%parent, %new_child, %old_child, "replace_child with an invalid pair");
            return;
        }
        self.detach(new_child);
        let Some(index) = self
            .entry(parent)
            .children
            .iter()
            .position(|child| *child == old_child)
        else {
            return;
        };
        self.entry_mut(parent).children[index] = new_child;
        self.entry_mut(new_child).parent = Some(parent);
        self.entry_mut(old_child).parent = None;
        self.log(
            parent,
            Mutation::ReplaceChild {
                parent,
                new_child,
                old_child,
            },
        );
    }

    fn append_html(&mut self, parent: NodeId, html: &str) {
        markup::parse_into(self, parent, html);
        self.log(
            parent,
            Mutation::AppendHtml {
                parent,
                html: html.to_string(),
            },
        );
    }

    fn selection(&self) -> Option<HostRange<NodeId>> {
        self.selection
    }

    /// Like a browser, a selection placed inside an editing host moves focus
    /// to that host.
    fn set_selection(&mut self, range: HostRange<NodeId>) {
        self.selection_writes += 1;
        self.selection = Some(range);
        if let Some(host) = self.editing_host(range.start_container) {
            self.active_element = Some(host);
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    fn focus(&mut self, node: NodeId) {
        self.active_element = Some(node);
    }
}
