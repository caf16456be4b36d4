//! # Tree Builder
//!
//! Walks a [`Value`] character by character and grows a [`VTree`]. The
//! builder keeps a pointer to the node the next character lands in. Format
//! elements are reused for as long as the leading part of each character's
//! format stack is the very same `Arc` as the previous character's, so a run
//! that shares one reference renders as one element.
//!
//! When the tree is meant to be edited, empty lines get a padding character
//! so the caret has somewhere to sit, line breaks are marked as the editor's
//! own, and the innermost active format is tagged as the caret's boundary.

use crate::vtree::{SelectionPath, VNode, VNodeId, VTree};
use richtext_model::markers::{
    COMMENT_ATTRIBUTE, COMMENT_TYPE, DISABLED_HANDLER_PREFIX, FORMAT_BOUNDARY_ATTRIBUTE,
    LINE_BREAK_ATTRIBUTE, PLACEHOLDER_ATTRIBUTE, SCRIPT_ATTRIBUTE, SCRIPT_TYPE,
};
use richtext_model::registry::WILDCARD_TAG_NAME;
use richtext_model::special_chars::LINE_BREAK;
use richtext_model::{
    get_active_formats, Attributes, Format, FormatRef, FormatTypeRegistry, Replacement, Value,
    OBJECT_REPLACEMENT_CHARACTER, ZWNBSP,
};
use std::sync::Arc;
use tracing::{instrument, trace, warn};

/// Element used when a wildcard type renders a format without its own tag.
const FALLBACK_TAG_NAME: &str = "span";

const PLACEHOLDER_STYLE: &str = "pointer-events:none;user-select:none;-webkit-user-select:none;-moz-user-select:none;-ms-user-select:none;";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Keep `\n` as text instead of rendering `<br>`.
    pub preserve_white_space: bool,

    /// Build a tree the user will edit in place.
    pub editable: bool,

    /// Shown when an editable Value is empty.
    pub placeholder: Option<String>,
}

impl TreeOptions {
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// A built tree plus where the Value's selection landed in it.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub tree: VTree,
    pub start: Option<SelectionPath>,
    pub end: Option<SelectionPath>,
}

/// The parts of a format or replacement an element is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct FormatSource<'a> {
    pub kind: &'a str,
    pub tag_name: Option<&'a str>,
    pub attributes: Option<&'a Attributes>,
    pub unregistered_attributes: Option<&'a Attributes>,
}

impl<'a> From<&'a Format> for FormatSource<'a> {
    fn from(format: &'a Format) -> Self {
        Self {
            kind: &format.kind,
            tag_name: format.tag_name.as_deref(),
            attributes: format.attributes.as_ref(),
            unregistered_attributes: format.unregistered_attributes.as_ref(),
        }
    }
}

impl<'a> From<&'a Replacement> for FormatSource<'a> {
    fn from(replacement: &'a Replacement) -> Self {
        Self {
            kind: &replacement.kind,
            tag_name: replacement.tag_name.as_deref(),
            attributes: replacement.attributes.as_ref(),
            unregistered_attributes: replacement.unregistered_attributes.as_ref(),
        }
    }
}

/// Render one format (or replacement) as an element node.
///
/// Unregistered kinds render as an element named after the kind. Registered
/// kinds map their attribute keys back to host attribute names, prepend the
/// type's class and, in editable trees, mark non-editable types as such.
pub fn from_format<R>(
    source: FormatSource<'_>,
    object: bool,
    boundary: bool,
    editable: bool,
    registry: &R,
) -> VNode
where
    R: FormatTypeRegistry + ?Sized,
{
    let mut attributes = Attributes::new();

    let Some(format_type) = registry.get(source.kind) else {
        if let Some(own) = source.attributes {
            attributes.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if boundary && editable {
            attributes.insert(FORMAT_BOUNDARY_ATTRIBUTE.to_string(), "true".to_string());
        }
        return VNode::Element {
            tag: source.kind.to_string(),
            attributes: restore_on_attributes(attributes, editable),
            object,
        };
    };

    if let Some(unregistered) = source.unregistered_attributes {
        attributes.extend(unregistered.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if boundary && editable {
        attributes.insert(FORMAT_BOUNDARY_ATTRIBUTE.to_string(), "true".to_string());
    }
    for (key, value) in source.attributes.into_iter().flatten() {
        let host_name = format_type
            .attributes
            .get(key)
            .filter(|name| !name.is_empty())
            .unwrap_or(key);
        attributes.insert(host_name.clone(), value.clone());
    }

    if let Some(class_name) = format_type.class_name.as_deref() {
        let class = match attributes.get("class") {
            Some(existing) => format!("{} {}", class_name, existing),
            None => class_name.to_string(),
        };
        attributes.insert("class".to_string(), class);
    }

    if editable && !format_type.content_editable {
        attributes.insert("contenteditable".to_string(), "false".to_string());
    }

    let tag = match source.tag_name.filter(|tag| !tag.is_empty()) {
        Some(tag) => tag,
        None if format_type.tag_name == WILDCARD_TAG_NAME => FALLBACK_TAG_NAME,
        None => format_type.tag_name.as_str(),
    };

    VNode::Element {
        tag: tag.to_string(),
        attributes: restore_on_attributes(attributes, editable),
        object: format_type.object,
    }
}

/// Outside editable trees, handlers disabled during parsing get their
/// original names back.
fn restore_on_attributes(attributes: Attributes, editable: bool) -> Attributes {
    if editable {
        return attributes;
    }

    let mut restored = Attributes::with_capacity(attributes.len());
    for (key, value) in attributes {
        let key = match key.strip_prefix(DISABLED_HANDLER_PREFIX) {
            Some(original) => original.to_string(),
            None => key,
        };
        restored.insert(key, value);
    }
    restored
}

/// Both stacks hold the very same references at every depth up to `depth`.
fn is_equal_until(a: &[FormatRef], b: &[FormatRef], depth: usize) -> bool {
    (0..=depth).all(|index| match (a.get(index), b.get(index)) {
        (Some(x), Some(y)) => Arc::ptr_eq(x, y),
        (None, None) => true,
        _ => false,
    })
}

/// Build the intermediate tree for `value`.
#[instrument(skip_all, fields(len = value.len(), editable = options.editable))]
pub fn to_tree<R>(value: &Value, registry: &R, options: &TreeOptions) -> BuiltTree
where
    R: FormatTypeRegistry + ?Sized,
{
    let TreeOptions {
        preserve_white_space,
        editable,
        ref placeholder,
    } = *options;

    let chars: Vec<char> = value.text.chars().collect();
    let format_len = value.formats.len();
    if chars.len() != format_len {
        warn!(
            text = chars.len(),
            formats = format_len,
            "Text and formats disagree on length"
        );
    }

    let active_formats = get_active_formats(value);
    let deepest_format = active_formats.last();

    let mut tree = VTree::new();
    let root = tree.root();
    tree.append_text(root, "");

    let mut start: Option<SelectionPath> = None;
    let mut end: Option<SelectionPath> = None;
    let mut last_formats: Option<&[FormatRef]> = None;
    let mut last_character: Option<char> = None;

    for i in 0..=format_len {
        let character = chars.get(i).copied();
        let should_pad = editable && matches!(last_character, None | Some(LINE_BREAK));
        let formats: &[FormatRef] = value.formats.get(i).map_or(&[], Vec::as_slice);

        let mut pointer = tree.last_child(root).unwrap_or(root);

        for (depth, format) in formats.iter().enumerate() {
            if let Some(previous) = last_formats {
                if is_equal_until(formats, previous, depth) {
                    if let Some(child) = tree.last_child(pointer) {
                        pointer = child;
                        continue;
                    }
                }
            }

            let boundary = editable && deepest_format.is_some_and(|deepest| Arc::ptr_eq(deepest, format));
            let parent = parent_of(&tree, pointer);
            let element = from_format(FormatSource::from(&**format), false, boundary, editable, registry);
            let node = tree.append(parent, element);

            if tree.text(pointer).is_some_and(str::is_empty) {
                tree.remove(pointer);
            }

            pointer = tree.append_text(node, "");
        }

        if i == 0 {
            if value.start == Some(0) {
                start = Some(SelectionPath::to_node(&tree, pointer));
            }
            if value.end == Some(0) {
                end = Some(SelectionPath::to_node(&tree, pointer));
            }
        }

        match character {
            Some(OBJECT_REPLACEMENT_CHARACTER) => {
                let Some(replacement) = value.replacements.get(i).and_then(Option::as_ref) else {
                    trace!(index = i, "Object character without a replacement, skipping");
                    continue;
                };
                let parent = parent_of(&tree, pointer);
                pointer = append_object(&mut tree, parent, replacement, value, i, editable, registry);
                let parent = parent_of(&tree, pointer);
                pointer = tree.append_text(parent, "");
            }
            Some(LINE_BREAK) if !preserve_white_space => {
                let mut line_break = VNode::element("br").as_object();
                if editable {
                    line_break = line_break.with_attr(LINE_BREAK_ATTRIBUTE, "true");
                }
                let parent = parent_of(&tree, pointer);
                pointer = tree.append(parent, line_break);
                let parent = parent_of(&tree, pointer);
                pointer = tree.append_text(parent, "");
            }
            Some(c) => {
                if tree.is_text(pointer) {
                    tree.push_text(pointer, c);
                } else {
                    let parent = parent_of(&tree, pointer);
                    pointer = tree.append_text(parent, c.to_string());
                }
            }
            None => {
                if !tree.is_text(pointer) {
                    let parent = parent_of(&tree, pointer);
                    pointer = tree.append_text(parent, "");
                }
            }
        }

        if value.start == Some(i + 1) {
            start = Some(SelectionPath::to_node(&tree, pointer));
        }
        if value.end == Some(i + 1) {
            end = Some(SelectionPath::to_node(&tree, pointer));
        }

        if should_pad && i == chars.len() {
            let parent = parent_of(&tree, pointer);
            tree.append_text(parent, ZWNBSP.to_string());

            if let Some(placeholder) = placeholder.as_deref() {
                if chars.is_empty() {
                    tree.append(
                        parent,
                        VNode::element("span")
                            .with_attr(PLACEHOLDER_ATTRIBUTE, placeholder)
                            .with_attr("style", PLACEHOLDER_STYLE),
                    );
                }
            }
        }

        last_formats = Some(formats);
        last_character = character;
    }

    BuiltTree { tree, start, end }
}

fn parent_of(tree: &VTree, node: VNodeId) -> VNodeId {
    tree.parent(node).unwrap_or_else(|| tree.root())
}

/// Render the replacement at `index` under `parent` and return its node.
fn append_object<R>(
    tree: &mut VTree,
    parent: VNodeId,
    replacement: &Replacement,
    value: &Value,
    index: usize,
    editable: bool,
    registry: &R,
) -> VNodeId
where
    R: FormatTypeRegistry + ?Sized,
{
    let kind = replacement.kind.as_str();

    if kind == COMMENT_TYPE {
        let data = replacement.attribute(COMMENT_ATTRIBUTE).unwrap_or_default();
        if !editable {
            return tree.append(parent, VNode::Comment { data: data.to_string() });
        }

        let wrapper = tree.append(
            parent,
            VNode::element("span")
                .with_attr("contenteditable", "false")
                .with_attr(COMMENT_ATTRIBUTE, data),
        );
        let inner = tree.append(wrapper, VNode::element("span"));
        tree.append_text(inner, data.trim());
        return wrapper;
    }

    if !editable && kind == SCRIPT_TYPE {
        let payload = replacement.attribute(SCRIPT_ATTRIBUTE).unwrap_or_default();
        let html = match urlencoding::decode(payload) {
            Ok(decoded) => decoded.into_owned(),
            Err(err) => {
                warn!(%err, "Script payload is not valid percent-encoding, keeping it raw");
                payload.to_string()
            }
        };
        let element = from_format(
            FormatSource {
                kind: SCRIPT_TYPE,
                tag_name: None,
                attributes: None,
                unregistered_attributes: None,
            },
            false,
            false,
            editable,
            registry,
        );
        let script = tree.append(parent, element);
        tree.append(script, VNode::Html { html });
        return script;
    }

    if registry
        .get(kind)
        .is_some_and(|format_type| !format_type.content_editable)
    {
        let boundary = value.start == Some(index) && value.end == Some(index + 1);
        let element = from_format(FormatSource::from(replacement), false, boundary, editable, registry);
        let node = tree.append(parent, element);
        if let Some(html) = replacement.inner_html.as_deref().filter(|html| !html.is_empty()) {
            tree.append(node, VNode::Html { html: html.to_string() });
        }
        return node;
    }

    let element = from_format(FormatSource::from(replacement), true, false, editable, registry);
    tree.append(parent, element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_model::{EmptyRegistry, FormatType, FormatTypeStore};

    fn registry() -> FormatTypeStore {
        [
            FormatType::new("core/bold", "strong"),
            FormatType::new("core/link", "a").with_attribute("url", "href"),
            FormatType::new("my/highlight", "mark").with_class_name("hl"),
            FormatType::new("core/image", "img")
                .with_attribute("url", "src")
                .as_object(),
            FormatType::new("my/widget", "span").non_editable(),
        ]
        .into_iter()
        .collect()
    }

    fn element(tree: &VTree, id: VNodeId) -> (&str, &Attributes, bool) {
        match tree.node(id) {
            VNode::Element {
                tag,
                attributes,
                object,
            } => (tag.as_str(), attributes, *object),
            other => panic!("expected an element, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_run_renders_one_element() {
        let bold = Format::new("core/bold").shared();
        let value = Value::from_parts(
            "abc",
            vec![vec![], vec![bold.clone()], vec![bold]],
            vec![None; 3],
        )
        .unwrap();
        let built = to_tree(&value, &registry(), &TreeOptions::default());
        let tree = &built.tree;
        let children = tree.children(tree.root());

        assert_eq!(children.len(), 3);
        assert_eq!(tree.text(children[0]), Some("a"));
        assert_eq!(element(tree, children[1]).0, "strong");
        let inner = tree.children(children[1]);
        assert_eq!(tree.text(inner[0]), Some("bc"));
        assert_eq!(tree.text(children[2]), Some(""));
    }

    #[test]
    fn test_equal_but_distinct_references_split() {
        let value = Value::from_parts(
            "ab",
            vec![
                vec![Format::new("core/bold").shared()],
                vec![Format::new("core/bold").shared()],
            ],
            vec![None; 2],
        )
        .unwrap();
        let built = to_tree(&value, &registry(), &TreeOptions::default());
        let tree = &built.tree;
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 3);
        assert_eq!(element(tree, children[0]).0, "strong");
        assert_eq!(element(tree, children[1]).0, "strong");
    }

    #[test]
    fn test_registered_attributes_map_to_host_names() {
        let link = Format::new("core/link")
            .with_attr("url", "https://w.org")
            .with_unregistered_attr("rel", "nofollow");
        let node = from_format(FormatSource::from(&link), false, false, false, &registry());
        let VNode::Element { tag, attributes, .. } = node else {
            panic!("expected an element");
        };
        assert_eq!(tag, "a");
        assert_eq!(attributes.get("href").map(String::as_str), Some("https://w.org"));
        assert_eq!(attributes.get("rel").map(String::as_str), Some("nofollow"));
    }

    #[test]
    fn test_class_is_prepended() {
        let highlight = Format::new("my/highlight").with_unregistered_attr("class", "x");
        let node = from_format(FormatSource::from(&highlight), false, false, false, &registry());
        assert_eq!(
            node,
            VNode::element("mark").with_attr("class", "hl x")
        );
    }

    #[test]
    fn test_handlers_restored_only_outside_editable_trees() {
        let span = Format::new("span").with_attr("data-disable-rich-text-onclick", "f()");

        let plain = from_format(FormatSource::from(&span), false, false, false, &EmptyRegistry);
        assert_eq!(plain, VNode::element("span").with_attr("onclick", "f()"));

        let editable = from_format(FormatSource::from(&span), false, false, true, &EmptyRegistry);
        assert_eq!(
            editable,
            VNode::element("span").with_attr("data-disable-rich-text-onclick", "f()")
        );
    }

    #[test]
    fn test_boundary_marks_deepest_active_format() {
        let bold = Format::new("core/bold").shared();
        let value = Value::from_parts("ab", vec![vec![bold.clone()], vec![bold]], vec![None; 2])
            .unwrap()
            .with_selection(1, 1);

        let built = to_tree(&value, &registry(), &TreeOptions::editable());
        let tree = &built.tree;
        let strong = tree.children(tree.root())[0];
        let (_, attributes, _) = element(tree, strong);
        assert_eq!(
            attributes.get(FORMAT_BOUNDARY_ATTRIBUTE).map(String::as_str),
            Some("true")
        );

        let plain = to_tree(&value, &registry(), &TreeOptions::default());
        let strong = plain.tree.children(plain.tree.root())[0];
        assert!(element(&plain.tree, strong).1.is_empty());
    }

    #[test]
    fn test_line_breaks() {
        let value = Value::from_plain_text("a\nb");

        let built = to_tree(&value, &EmptyRegistry, &TreeOptions::editable());
        let tree = &built.tree;
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 3);
        let (tag, attributes, object) = element(tree, children[1]);
        assert_eq!(tag, "br");
        assert!(object);
        assert_eq!(
            attributes.get(LINE_BREAK_ATTRIBUTE).map(String::as_str),
            Some("true")
        );

        let preserved = to_tree(
            &value,
            &EmptyRegistry,
            &TreeOptions {
                preserve_white_space: true,
                ..TreeOptions::default()
            },
        );
        let children = preserved.tree.children(preserved.tree.root());
        assert_eq!(children.len(), 1);
        assert_eq!(preserved.tree.text(children[0]), Some("a\nb"));
    }

    #[test]
    fn test_padding_after_trailing_line_break() {
        let value = Value::from_plain_text("a\n");
        let built = to_tree(&value, &EmptyRegistry, &TreeOptions::editable());
        let tree = &built.tree;
        let last = tree.last_child(tree.root()).unwrap();
        assert_eq!(tree.text(last), Some("\u{FEFF}"));
    }

    #[test]
    fn test_placeholder_on_empty_value() {
        let options = TreeOptions::editable().with_placeholder("Write…");
        let built = to_tree(&Value::empty(), &EmptyRegistry, &options);
        let tree = &built.tree;
        let children = tree.children(tree.root());

        assert_eq!(tree.text(children[0]), Some(""));
        assert_eq!(tree.text(children[1]), Some("\u{FEFF}"));
        let (tag, attributes, _) = element(tree, children[2]);
        assert_eq!(tag, "span");
        assert_eq!(
            attributes.get(PLACEHOLDER_ATTRIBUTE).map(String::as_str),
            Some("Write…")
        );
        assert_eq!(attributes.get("style").map(String::as_str), Some(PLACEHOLDER_STYLE));
    }

    #[test]
    fn test_selection_paths() {
        let bold = Format::new("core/bold").shared();
        let value = Value::from_parts("ab", vec![vec![], vec![bold]], vec![None; 2])
            .unwrap()
            .with_selection(0, 2);
        let built = to_tree(&value, &registry(), &TreeOptions::default());

        assert_eq!(
            built.start,
            Some(SelectionPath {
                indices: vec![0],
                offset: 0
            })
        );
        assert_eq!(
            built.end,
            Some(SelectionPath {
                indices: vec![1, 0],
                offset: 1
            })
        );
    }

    #[test]
    fn test_objects() {
        let image = Replacement::new("core/image").with_attr("url", "a.png");
        let built = to_tree(&Value::object(image), &registry(), &TreeOptions::default());
        let tree = &built.tree;
        let children = tree.children(tree.root());
        let (tag, attributes, object) = element(tree, children[1]);
        assert_eq!(tag, "img");
        assert!(object);
        assert_eq!(attributes.get("src").map(String::as_str), Some("a.png"));
        assert_eq!(tree.text(children[2]), Some(""));
    }

    #[test]
    fn test_non_editable_replacement_keeps_inner_html() {
        let widget = Replacement::new("my/widget").with_inner_html("<b>w</b>");
        let value = Value::object(widget).with_selection(0, 1);
        let built = to_tree(&value, &registry(), &TreeOptions::editable());
        let tree = &built.tree;
        let node = tree.children(tree.root())[1];

        let (tag, attributes, object) = element(tree, node);
        assert_eq!(tag, "span");
        assert!(!object);
        assert_eq!(attributes.get("contenteditable").map(String::as_str), Some("false"));
        assert!(attributes.contains_key(FORMAT_BOUNDARY_ATTRIBUTE));
        assert_eq!(
            tree.node(tree.children(node)[0]),
            &VNode::Html {
                html: "<b>w</b>".to_string()
            }
        );
    }

    #[test]
    fn test_comment_rendering() {
        let comment = Replacement::new(COMMENT_TYPE).with_attr(COMMENT_ATTRIBUTE, " note ");
        let value = Value::object(comment);

        let built = to_tree(&value, &EmptyRegistry, &TreeOptions::default());
        let tree = &built.tree;
        assert_eq!(
            tree.node(tree.children(tree.root())[1]),
            &VNode::Comment {
                data: " note ".to_string()
            }
        );

        let built = to_tree(&value, &EmptyRegistry, &TreeOptions::editable());
        let tree = &built.tree;
        let wrapper = tree.children(tree.root())[1];
        let (tag, attributes, _) = element(tree, wrapper);
        assert_eq!(tag, "span");
        assert_eq!(attributes.get("contenteditable").map(String::as_str), Some("false"));
        let inner = tree.children(wrapper)[0];
        assert_eq!(tree.text(tree.children(inner)[0]), Some("note"));
    }

    #[test]
    fn test_script_payload_is_decoded() {
        let script = Replacement::new(SCRIPT_TYPE).with_attr(SCRIPT_ATTRIBUTE, "alert%281%29");
        let built = to_tree(&Value::object(script), &EmptyRegistry, &TreeOptions::default());
        let tree = &built.tree;
        let node = tree.children(tree.root())[1];
        assert_eq!(element(tree, node).0, "script");
        assert_eq!(
            tree.node(tree.children(node)[0]),
            &VNode::Html {
                html: "alert(1)".to_string()
            }
        );
    }

    #[test]
    fn test_object_character_without_replacement_is_skipped() {
        let value = Value {
            text: format!("a{}", OBJECT_REPLACEMENT_CHARACTER),
            formats: vec![vec![], vec![]],
            replacements: vec![None, None],
            ..Value::default()
        };
        assert!(value.validate().is_err());

        let built = to_tree(&value, &EmptyRegistry, &TreeOptions::default());
        let tree = &built.tree;
        assert_eq!(tree.children(tree.root()).len(), 1);
        assert_eq!(tree.text(tree.children(tree.root())[0]), Some("a"));
    }

    #[test]
    fn test_wildcard_type_without_tag_renders_fallback_element() {
        let registry: FormatTypeStore = [FormatType::new("my/any", WILDCARD_TAG_NAME)]
            .into_iter()
            .collect();

        let bare = Format::new("my/any");
        let node = from_format(FormatSource::from(&bare), false, false, false, &registry);
        assert!(matches!(&node, VNode::Element { tag, .. } if tag == "span"));

        let tagged = Format::new("my/any").with_tag_name("mark");
        let node = from_format(FormatSource::from(&tagged), false, false, false, &registry);
        assert!(matches!(&node, VNode::Element { tag, .. } if tag == "mark"));
    }
}
