//! # Parser
//!
//! Walks a host element's children left to right and flattens them into a
//! [`Value`]: text is appended as is, line breaks become `\n`, comments and
//! scripts and non-editable elements collapse into one object replacement
//! character each, and every other element wraps its content in a format.
//!
//! Nothing here fails. Unknown elements become unregistered formats and
//! malformed markup has already been recovered by the host tree.

use crate::attributes::{get_attributes, to_format};
use crate::selection::{accumulate_selection, filter_range, Piece};
use richtext_dom::{HostRange, HostTree, MemoryDom, NodeKind};
use richtext_model::markers::{
    COMMENT_ATTRIBUTE, COMMENT_TYPE, LINE_BREAK_ATTRIBUTE, PLACEHOLDER_ATTRIBUTE, SCRIPT_ATTRIBUTE,
    SCRIPT_TYPE,
};
use richtext_model::special_chars::{remove_reserved_characters, LINE_BREAK};
use richtext_model::{FormatList, FormatTypeRegistry, Replacement, Value, OBJECT_REPLACEMENT_CHARACTER};
use std::sync::Arc;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Collapse white space before parsing. Only [`create_from_html`] honors
    /// it, since it owns the tree it parses.
    pub collapse_white_space: bool,

    /// The tree is a live editable tree rendered by this workspace. Line
    /// breaks without the editor's marker attribute are then ignored.
    pub editable: bool,
}

impl CreateOptions {
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::default()
        }
    }
}

/// Sources a Value can be created from without a host tree at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateInput<'a> {
    Empty,
    Text(&'a str),
    Html(&'a str),
}

/// Create a Value from plain text, markup, or nothing.
pub fn create<R>(input: CreateInput<'_>, registry: &R, options: CreateOptions) -> Value
where
    R: FormatTypeRegistry + ?Sized,
{
    match input {
        CreateInput::Text(text) if !text.is_empty() => {
            Value::from_plain_text(remove_reserved_characters(text))
        }
        CreateInput::Html(html) if !html.is_empty() => create_from_html(html, registry, options),
        _ => Value::empty(),
    }
}

/// Parse a markup string into a Value.
#[instrument(skip_all, fields(len = html.len()))]
pub fn create_from_html<R>(html: &str, registry: &R, options: CreateOptions) -> Value
where
    R: FormatTypeRegistry + ?Sized,
{
    let (mut dom, root) = MemoryDom::with_root("body", html);
    if options.collapse_white_space {
        dom.collapse_white_space(root);
    }
    create_from_element(&dom, root, None, options, registry)
}

/// Parse the children of `element` into a Value.
///
/// When `range` is given, `start`/`end` of the result are the character
/// offsets it maps to. A range endpoint outside `element` leaves the
/// corresponding field unset.
#[instrument(skip_all, fields(editable = options.editable))]
pub fn create_from_element<H, R>(
    host: &H,
    element: H::Node,
    range: Option<&HostRange<H::Node>>,
    options: CreateOptions,
    registry: &R,
) -> Value
where
    H: HostTree,
    R: FormatTypeRegistry + ?Sized,
{
    Parser {
        host,
        registry,
        editable: options.editable,
    }
    .parse(element, range)
}

struct Parser<'a, H: ?Sized, R: ?Sized> {
    host: &'a H,
    registry: &'a R,
    editable: bool,
}

/// The Value being built plus its length in characters.
#[derive(Default)]
struct Accumulator {
    value: Value,
    len: usize,
}

impl Accumulator {
    fn push_text(&mut self, text: &str, len: usize) {
        self.value.text.push_str(text);
        self.value.formats.resize_with(self.len + len, FormatList::new);
        self.value.replacements.resize(self.len + len, None);
        self.len += len;
    }

    fn push_object(&mut self, replacement: Replacement) {
        self.value.text.push(OBJECT_REPLACEMENT_CHARACTER);
        self.value.formats.push(FormatList::new());
        self.value.replacements.push(Some(replacement));
        self.len += 1;
    }

    fn merge(&mut self, other: Value) {
        self.len += other.len();
        self.value.text.push_str(&other.text);
        self.value.formats.extend(other.formats);
        self.value.replacements.extend(other.replacements);
    }

    fn select(&mut self, host_select: impl FnOnce(usize, &mut Option<usize>, &mut Option<usize>)) {
        host_select(self.len, &mut self.value.start, &mut self.value.end);
    }
}

impl<'a, H, R> Parser<'a, H, R>
where
    H: HostTree,
    R: FormatTypeRegistry + ?Sized,
{
    fn accumulate(
        &self,
        accumulator: &mut Accumulator,
        node: H::Node,
        range: Option<&HostRange<H::Node>>,
        piece: Piece,
    ) {
        accumulator.select(|current, start, end| {
            accumulate_selection(self.host, node, range, current, piece, start, end)
        });
    }

    fn parse(&self, element: H::Node, range: Option<&HostRange<H::Node>>) -> Value {
        let host = self.host;
        let mut accumulator = Accumulator::default();

        if !host.has_child_nodes(element) {
            self.accumulate(&mut accumulator, element, range, Piece::empty());
            return accumulator.value;
        }

        for node in host.children(element) {
            match host.kind(node) {
                NodeKind::Text => {
                    let data = host.node_value(node).unwrap_or_default();
                    let text = remove_reserved_characters(data);
                    let len = text.chars().count();
                    let filtered = filter_range(host, node, range, remove_reserved_characters);
                    self.accumulate(&mut accumulator, node, filtered.as_ref(), Piece::of_len(len));
                    accumulator.push_text(&text, len);
                    continue;
                }
                NodeKind::Comment => {
                    let data = host.node_value(node).unwrap_or_default().to_string();
                    self.push_comment(&mut accumulator, node, range, data);
                    continue;
                }
                NodeKind::Element => {}
                NodeKind::Document => continue,
            }

            let tag_name = host.tag_name(node).unwrap_or_default().to_string();

            if tag_name == "span" {
                if let Some(data) = host.get_attribute(node, COMMENT_ATTRIBUTE) {
                    let data = data.to_string();
                    self.push_comment(&mut accumulator, node, range, data);
                    continue;
                }
            }

            if self.editable && tag_name == "br" && !has_truthy_attribute(host, node, LINE_BREAK_ATTRIBUTE) {
                trace!("Ignoring line break not inserted by the editor");
                self.accumulate(&mut accumulator, node, range, Piece::empty());
                continue;
            }

            if tag_name == "script" {
                let payload = match host.get_attribute(node, SCRIPT_ATTRIBUTE) {
                    Some(existing) if !existing.is_empty() => existing.to_string(),
                    _ => urlencoding::encode(&host.inner_html(node)).into_owned(),
                };
                let replacement = Replacement::new(SCRIPT_TYPE).with_attr(SCRIPT_ATTRIBUTE, payload);
                self.accumulate(&mut accumulator, node, range, Piece::of_len(1));
                accumulator.push_object(replacement);
                continue;
            }

            if tag_name == "br" {
                self.accumulate(&mut accumulator, node, range, Piece::empty());
                accumulator.push_text(&LINE_BREAK.to_string(), 1);
                continue;
            }

            let resolved = to_format(&tag_name, get_attributes(host, node), self.registry);

            if !resolved.content_editable {
                trace!(format = %resolved.format.kind, "Collapsing non-editable element into an object");
                self.accumulate(&mut accumulator, node, range, Piece::empty());
                let replacement =
                    Replacement::from(resolved.format).with_inner_html(host.inner_html(node));
                accumulator.push_object(replacement);
                continue;
            }

            let value = self.parse(node, range);
            self.accumulate(&mut accumulator, node, range, Piece::of_value(&value));

            if has_truthy_attribute(host, node, PLACEHOLDER_ATTRIBUTE) {
                accumulator.merge(value);
            } else if value.is_empty() {
                if resolved.format.attributes.is_some() {
                    accumulator.push_object(Replacement::from(resolved.format));
                }
            } else {
                let format = Arc::new(resolved.format);
                accumulator.merge(wrap(value, format));
            }
        }

        accumulator.value
    }

    fn push_comment(
        &self,
        accumulator: &mut Accumulator,
        node: H::Node,
        range: Option<&HostRange<H::Node>>,
        data: String,
    ) {
        let replacement = Replacement::new(COMMENT_TYPE).with_attr(COMMENT_ATTRIBUTE, data);
        self.accumulate(accumulator, node, range, Piece::of_len(1));
        accumulator.push_object(replacement);
    }
}

/// Prepend `format` to every character's stack. Characters of one run in the
/// child shared a stack and share the outer reference too.
fn wrap(mut value: Value, format: richtext_model::FormatRef) -> Value {
    for formats in &mut value.formats {
        formats.insert(0, Arc::clone(&format));
    }
    value
}

fn has_truthy_attribute<H: HostTree>(host: &H, node: H::Node, name: &str) -> bool {
    host.get_attribute(node, name)
        .is_some_and(|value| !value.is_empty())
}
