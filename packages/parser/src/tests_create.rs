use crate::create::*;
use richtext_dom::{HostRange, HostTree, MemoryDom};
use richtext_model::markers::{COMMENT_ATTRIBUTE, SCRIPT_ATTRIBUTE, SCRIPT_TYPE};
use richtext_model::{
    EmptyRegistry, FormatType, FormatTypeStore, Value, OBJECT_REPLACEMENT_CHARACTER,
};
use std::sync::Arc;

fn registry() -> FormatTypeStore {
    [
        FormatType::new("core/bold", "strong"),
        FormatType::new("core/italic", "em"),
        FormatType::new("core/image", "img")
            .with_attribute("url", "src")
            .with_attribute("alt", "alt")
            .non_editable(),
    ]
    .into_iter()
    .collect()
}

fn parse(html: &str) -> Value {
    create_from_html(html, &registry(), CreateOptions::default())
}

fn parse_with_range(
    html: &str,
    range: impl Fn(&MemoryDom, richtext_dom::NodeId) -> HostRange<richtext_dom::NodeId>,
) -> Value {
    let (dom, root) = MemoryDom::with_root("div", html);
    let range = range(&dom, root);
    create_from_element(&dom, root, Some(&range), CreateOptions::default(), &registry())
}

#[test]
fn test_plain_text() {
    let value = parse("hello");
    assert_eq!(value, Value::from_plain_text("hello"));
}

#[test]
fn test_line_break_in_paragraph() {
    let (dom, p) = MemoryDom::with_root("p", "x<br>y");
    let value = create_from_element(&dom, p, None, CreateOptions::default(), &EmptyRegistry);

    assert_eq!(value.text, "x\ny");
    assert!(value.formats[1].is_empty());
    assert_eq!(value.replacements[1], None);
    assert!(value.validate().is_ok());
}

#[test]
fn test_editable_tree_ignores_foreign_line_breaks() {
    let (dom, root) = MemoryDom::with_root(
        "div",
        r#"a<br>b<br data-rich-text-line-break="true">c"#,
    );
    let value = create_from_element(&dom, root, None, CreateOptions::editable(), &registry());
    assert_eq!(value.text, "ab\nc");
}

#[test]
fn test_formats_share_one_reference_per_run() {
    let value = parse("a<strong>bc</strong>d");
    assert_eq!(value.text, "abcd");
    assert!(value.formats[0].is_empty());
    assert_eq!(value.formats[1][0].kind, "core/bold");
    assert_eq!(value.formats[1][0].tag_name.as_deref(), Some("strong"));
    assert!(Arc::ptr_eq(&value.formats[1][0], &value.formats[2][0]));
    assert!(value.formats[3].is_empty());
}

#[test]
fn test_nested_formats_are_outermost_first() {
    let value = parse("<strong>a<em>b</em></strong>");
    assert_eq!(value.formats[0].len(), 1);
    assert_eq!(value.formats[1].len(), 2);
    assert_eq!(value.formats[1][1].kind, "core/italic");
    assert!(Arc::ptr_eq(&value.formats[0][0], &value.formats[1][0]));
}

#[test]
fn test_comments_become_objects() {
    let value = parse(r#"a<!--note-->b<span data-rich-text-comment="other"><span>other</span></span>"#);
    assert_eq!(value.text.chars().filter(|c| *c == OBJECT_REPLACEMENT_CHARACTER).count(), 2);

    let first = value.replacements[1].as_ref().unwrap();
    assert_eq!(first.kind, "#comment");
    assert_eq!(first.attribute(COMMENT_ATTRIBUTE), Some("note"));

    let second = value.replacements[3].as_ref().unwrap();
    assert_eq!(second.attribute(COMMENT_ATTRIBUTE), Some("other"));
}

#[test]
fn test_script_payload_is_percent_encoded() {
    let value = parse("<script>alert(1)</script>");
    let replacement = value.replacements[0].as_ref().unwrap();
    assert_eq!(replacement.kind, SCRIPT_TYPE);
    assert_eq!(replacement.attribute(SCRIPT_ATTRIBUTE), Some("alert%281%29"));
}

#[test]
fn test_non_editable_type_becomes_object() {
    let value = parse(r#"a<img src="a.png" alt="A" contenteditable="false">"#);
    assert_eq!(value.text, format!("a{}", OBJECT_REPLACEMENT_CHARACTER));

    let image = value.replacements[1].as_ref().unwrap();
    assert_eq!(image.kind, "core/image");
    assert_eq!(image.attribute("url"), Some("a.png"));
    assert_eq!(image.attribute("alt"), Some("A"));
    assert_eq!(image.inner_html.as_deref(), Some(""));
    assert!(image.unregistered_attributes.as_ref().unwrap().is_empty());
}

#[test]
fn test_empty_elements() {
    let value = parse(r#"<span class="anchor"></span><span></span>"#);
    assert_eq!(value.text, OBJECT_REPLACEMENT_CHARACTER.to_string());
    assert_eq!(value.replacements[0].as_ref().unwrap().kind, "span");
}

#[test]
fn test_placeholder_content_is_not_formatted() {
    let value = parse(r#"<span data-rich-text-placeholder="Type">Type</span>"#);
    assert_eq!(value.text, "Type");
    assert!(value.formats.iter().all(|formats| formats.is_empty()));
}

#[test]
fn test_reserved_characters_are_removed() {
    let value = parse("a\u{FEFF}b\u{FFFC}c\r");
    assert_eq!(value.text, "abc");
    assert!(value.validate().is_ok());
}

#[test]
fn test_unregistered_formats_keep_attributes() {
    let value = parse(r#"<span style="color:red" onclick="x()">a</span>"#);
    let format = &value.formats[0][0];
    assert_eq!(format.kind, "span");
    let attributes = format.attributes.as_ref().unwrap();
    assert_eq!(attributes.get("style").map(String::as_str), Some("color:red"));
    assert!(attributes.contains_key("data-disable-rich-text-onclick"));
}

#[test]
fn test_selection_in_nested_text() {
    let value = parse_with_range("ab<strong>cd</strong>", |dom, root| {
        let strong = dom.child_at(root, 1).unwrap();
        let text = dom.child_at(strong, 0).unwrap();
        HostRange::new(text, 1, text, 2)
    });
    assert_eq!((value.start, value.end), (Some(3), Some(4)));
}

#[test]
fn test_selection_between_children() {
    let value = parse_with_range("ab<strong>cd</strong>", |_, root| HostRange::collapsed(root, 1));
    assert_eq!((value.start, value.end), (Some(2), Some(2)));

    let value = parse_with_range("ab<strong>cd</strong>", |_, root| HostRange::new(root, 0, root, 2));
    assert_eq!((value.start, value.end), (Some(0), Some(4)));
}

#[test]
fn test_selection_after_padding() {
    let value = parse_with_range("\u{FEFF}", |dom, root| {
        let text = dom.child_at(root, 0).unwrap();
        HostRange::collapsed(text, 1)
    });
    assert_eq!(value.text, "");
    assert_eq!((value.start, value.end), (Some(0), Some(0)));
}

#[test]
fn test_selection_in_empty_element() {
    let value = parse_with_range("", |_, root| HostRange::collapsed(root, 0));
    assert_eq!((value.start, value.end), (Some(0), Some(0)));
}

#[test]
fn test_selection_outside_element_is_ignored() {
    let (mut dom, root) = MemoryDom::with_root("div", "ab");
    let other = dom.create_root("div");
    let range = HostRange::collapsed(other, 0);
    let value = create_from_element(&dom, root, Some(&range), CreateOptions::default(), &registry());
    assert_eq!((value.start, value.end), (None, None));
}

#[test]
fn test_collapse_white_space_option() {
    let html = "  <strong>a\n  b</strong>  ";
    let options = CreateOptions {
        collapse_white_space: true,
        ..CreateOptions::default()
    };
    let value = create_from_html(html, &registry(), options);
    assert_eq!(value.text, "a b");

    let verbatim = create_from_html(html, &registry(), CreateOptions::default());
    assert_eq!(verbatim.text, "  a\n  b  ");
}

#[test]
fn test_create_dispatch() {
    let registry = registry();
    let options = CreateOptions::default();
    assert_eq!(create(CreateInput::Empty, &registry, options), Value::empty());
    assert_eq!(create(CreateInput::Text(""), &registry, options), Value::empty());
    assert_eq!(
        create(CreateInput::Text("a<b>\u{FFFC}"), &registry, options).text,
        "a<b>"
    );
    assert_eq!(create(CreateInput::Html("a<b>c</b>"), &registry, options).text, "ac");
}
