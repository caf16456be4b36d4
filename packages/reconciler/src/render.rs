//! Materialize an intermediate tree as detached host nodes.

use richtext_dom::{is_valid_attribute_name, HostTree};
use richtext_model::{FormatTypeRegistry, Value};
use richtext_tree::{to_tree, SelectionPath, TreeOptions, VNode, VNodeId, VTree};
use tracing::{instrument, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDomOptions {
    pub preserve_white_space: bool,
    pub placeholder: Option<String>,
    /// Render for in-place editing. On unless the tree is only displayed.
    pub editable: bool,
}

impl Default for ToDomOptions {
    fn default() -> Self {
        Self {
            preserve_white_space: false,
            placeholder: None,
            editable: true,
        }
    }
}

impl From<&ToDomOptions> for TreeOptions {
    fn from(options: &ToDomOptions) -> Self {
        TreeOptions {
            preserve_white_space: options.preserve_white_space,
            editable: options.editable,
            placeholder: options.placeholder.clone(),
        }
    }
}

/// A detached `body` element holding the rendered value, plus the selection
/// paths recorded while building it.
#[derive(Debug, Clone)]
pub struct Rendered<N> {
    pub body: N,
    pub start: Option<SelectionPath>,
    pub end: Option<SelectionPath>,
}

/// Render `value` into a new detached element of `host`.
#[instrument(skip_all, fields(len = value.len()))]
pub fn to_dom<H, R>(host: &mut H, value: &Value, registry: &R, options: &ToDomOptions) -> Rendered<H::Node>
where
    H: HostTree,
    R: FormatTypeRegistry + ?Sized,
{
    let built = to_tree(value, registry, &TreeOptions::from(options));
    let body = host.create_element("body");
    append_children(host, &built.tree, built.tree.root(), body);

    Rendered {
        body,
        start: built.start,
        end: built.end,
    }
}

fn append_children<H: HostTree>(host: &mut H, tree: &VTree, id: VNodeId, parent: H::Node) {
    for &child in tree.children(id) {
        match tree.node(child) {
            VNode::Root => {}
            VNode::Element { tag, attributes, .. } => {
                let element = host.create_element(tag);
                for (name, value) in attributes {
                    if is_valid_attribute_name(name) {
                        host.set_attribute(element, name, value);
                    } else {
                        trace!(name = name.as_str(), "Skipping invalid attribute name");
                    }
                }
                host.append_child(parent, element);
                append_children(host, tree, child, element);
            }
            VNode::Text { text } => {
                let node = host.create_text(text);
                host.append_child(parent, node);
            }
            VNode::Html { html } => host.append_html(parent, html),
            VNode::Comment { data } => {
                let node = host.create_comment(data);
                host.append_child(parent, node);
            }
        }
    }
}
