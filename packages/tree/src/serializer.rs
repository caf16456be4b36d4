//! Markup output for Values.
//!
//! The tree is built non-editable, so nothing editor-specific (padding,
//! boundary markers, placeholders) reaches the string.

use crate::builder::{to_tree, TreeOptions};
use crate::vtree::{VNode, VNodeId, VTree};
use richtext_dom::escape::{escape_attribute, escape_editable_html, is_valid_attribute_name};
use richtext_model::{FormatTypeRegistry, Value};
use tracing::{instrument, trace};

/// Serialize `value` to markup.
#[instrument(skip_all, fields(len = value.len()))]
pub fn to_html_string<R>(value: &Value, registry: &R, preserve_white_space: bool) -> String
where
    R: FormatTypeRegistry + ?Sized,
{
    let options = TreeOptions {
        preserve_white_space,
        ..TreeOptions::default()
    };
    let built = to_tree(value, registry, &options);
    children_html(&built.tree, built.tree.root())
}

/// Markup of every child of `node`.
pub fn children_html(tree: &VTree, node: VNodeId) -> String {
    let mut context = Context {
        tree,
        buffer: String::new(),
    };
    context.write_children(node);
    context.buffer
}

struct Context<'a> {
    tree: &'a VTree,
    buffer: String,
}

impl Context<'_> {
    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_children(&mut self, node: VNodeId) {
        for &child in self.tree.children(node) {
            self.write_node(child);
        }
    }

    fn write_node(&mut self, id: VNodeId) {
        let tree = self.tree;
        match tree.node(id) {
            VNode::Root => self.write_children(id),
            VNode::Text { text } => self.add(&escape_editable_html(text)),
            VNode::Html { html } => self.add(html),
            VNode::Comment { data } => {
                self.add("<!--");
                self.add(data);
                self.add("-->");
            }
            VNode::Element {
                tag,
                attributes,
                object,
            } => {
                self.add("<");
                self.add(tag);
                for (name, value) in attributes {
                    if !is_valid_attribute_name(name) {
                        trace!(name = name.as_str(), "Dropping invalid attribute name");
                        continue;
                    }
                    self.add(" ");
                    self.add(name);
                    self.add("=\"");
                    self.add(&escape_attribute(value));
                    self.add("\"");
                }
                self.add(">");

                if *object {
                    return;
                }

                self.write_children(id);
                self.add("</");
                self.add(tag);
                self.add(">");
            }
        }
    }
}
