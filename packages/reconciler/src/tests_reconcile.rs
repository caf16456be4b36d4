use crate::*;
use richtext_dom::{HostRange, HostTree, MemoryDom, Mutation, NodeId};
use richtext_model::{FormatType, FormatTypeStore, Value};
use richtext_parser::{create_from_html, CreateOptions};
use richtext_tree::SelectionPath;

fn registry() -> FormatTypeStore {
    [
        FormatType::new("core/bold", "strong"),
        FormatType::new("core/italic", "em"),
        FormatType::new("core/link", "a").with_attribute("url", "href"),
    ]
    .into_iter()
    .collect()
}

fn parse(html: &str) -> Value {
    create_from_html(html, &registry(), CreateOptions::default())
}

/// A live editable root already showing `value`, with a clean mutation log.
fn live(value: &Value) -> (MemoryDom, NodeId) {
    let (mut dom, root) = MemoryDom::with_root("div", "");
    apply(&mut dom, value, root, &registry(), &ApplyOptions::default());
    dom.clear_mutations();
    (dom, root)
}

#[test]
fn test_first_apply_appends_everything() {
    let (mut dom, root) = MemoryDom::with_root("div", "");
    let value = parse("a<strong>b</strong>");
    let report = apply(&mut dom, &value, root, &registry(), &ApplyOptions::default());

    assert_eq!(dom.inner_html(root), "a<strong>b</strong>");
    assert_eq!(report.appended, 3);
    assert_eq!(report.replaced, 0);
    assert!(!report.selection_written);
}

#[test]
fn test_reapplying_same_value_is_silent() {
    let value = parse("a<strong>b<em>c</em></strong>");
    let (mut dom, root) = live(&value);

    let again = parse("a<strong>b<em>c</em></strong>");
    let report = apply(&mut dom, &again, root, &registry(), &ApplyOptions::default());
    assert_eq!(report, ApplyReport::default());
    assert!(dom.mutations().is_empty());
}

#[test]
fn test_nested_attribute_change_is_one_mutation() {
    let before = parse(r#"<em>a<strong>b<a href="https://a.org">c</a></strong></em>"#);
    let (mut dom, root) = live(&before);

    let after = parse(r#"<em>a<strong>b<a href="https://b.org">c</a></strong></em>"#);
    let report = apply(&mut dom, &after, root, &registry(), &ApplyOptions::default());

    assert_eq!(report.structural_changes(), 0);
    assert_eq!(report.attribute_writes, 1);
    assert_eq!(dom.mutations().len(), 1);
    assert!(matches!(
        &dom.mutations()[0],
        Mutation::SetAttribute { name, value, .. } if name == "href" && value == "https://b.org"
    ));
    assert!(dom.mutations().iter().all(|mutation| !mutation.is_structural()));
}

#[test]
fn test_changed_text_is_replaced() {
    let (mut dom, root) = live(&parse("a<strong>b</strong>"));
    let strong = dom.child_at(root, 1).unwrap();

    let after = parse("a<strong>c</strong>");
    let report = apply(&mut dom, &after, root, &registry(), &ApplyOptions::default());
    assert_eq!(report.replaced, 1);
    assert_eq!(dom.child_at(root, 1), Some(strong));
    assert_eq!(dom.inner_html(root), "a<strong>c</strong>");
}

#[test]
fn test_different_tag_is_replaced() {
    let (mut dom, root) = live(&parse("<strong>a</strong>"));
    let report = apply(&mut dom, &parse("<em>a</em>"), root, &registry(), &ApplyOptions::default());
    assert_eq!(report.replaced, 1);
    assert_eq!(dom.inner_html(root), "<em>a</em>");
}

#[test]
fn test_shrinking_removes_trailing_children() {
    let (mut dom, root) = live(&parse("a<strong>b</strong>c"));
    let report = apply(&mut dom, &parse("a"), root, &registry(), &ApplyOptions::default());
    assert_eq!(report.removed, 2);
    assert_eq!(dom.inner_html(root), "a");
}

#[test]
fn test_obsolete_attributes_are_removed() {
    let (mut dom, root) = MemoryDom::with_root("div", r#"<a href="x" title="t">l</a>"#);
    let future = dom.create_element("body");
    dom.append_html(future, r#"<a href="x">l</a>"#);

    let report = apply_value(&mut dom, future, root);
    assert_eq!(report.attribute_writes, 1);
    assert_eq!(
        dom.mutations(),
        &[Mutation::RemoveAttribute {
            node: dom.child_at(root, 0).unwrap(),
            name: "title".to_string(),
        }]
    );
    assert!(!dom.has_child_nodes(future));
}

#[test]
fn test_comment_with_new_data_is_replaced() {
    let (mut dom, root) = MemoryDom::with_root("div", "<!--a-->");
    let future = dom.create_element("body");
    dom.append_html(future, "<!--b-->");

    let report = apply_value(&mut dom, future, root);
    assert_eq!(report.replaced, 1);
    assert_eq!(dom.inner_html(root), "<!--b-->");
}

#[test]
fn test_selection_is_restored_once() {
    let value = Value::from_plain_text("ab").with_selection(1, 1);
    let (mut dom, root) = MemoryDom::with_root("div", "");

    let report = apply(&mut dom, &value, root, &registry(), &ApplyOptions::default());
    assert!(report.selection_written);
    let text = dom.child_at(root, 0).unwrap();
    assert_eq!(dom.selection(), Some(HostRange::collapsed(text, 1)));

    let report = apply(&mut dom, &value, root, &registry(), &ApplyOptions::default());
    assert!(!report.selection_written);
    assert_eq!(dom.selection_writes(), 1);
}

#[test]
fn test_dom_only_leaves_selection() {
    let value = Value::from_plain_text("ab").with_selection(0, 2);
    let (mut dom, root) = MemoryDom::with_root("div", "");
    let options = ApplyOptions {
        dom_only: true,
        ..ApplyOptions::default()
    };

    let report = apply(&mut dom, &value, root, &registry(), &options);
    assert!(!report.selection_written);
    assert_eq!(dom.selection(), None);
}

#[test]
fn test_unresolvable_path_is_a_no_op() {
    let (mut dom, root) = MemoryDom::with_root("div", "ab");
    let missing = SelectionPath {
        indices: vec![4],
        offset: 0,
    };
    let too_far = SelectionPath {
        indices: vec![0],
        offset: 9,
    };

    assert!(!apply_selection(&mut dom, &missing, &missing, root));
    assert!(!apply_selection(&mut dom, &too_far, &too_far, root));
    assert_eq!(dom.selection_writes(), 0);
}

#[test]
fn test_focus_is_restored_after_selection_write() {
    let (mut dom, root) = MemoryDom::with_root("div", "");
    dom.set_attribute(root, "contenteditable", "true");
    let toolbar = dom.create_root("button");
    dom.focus(toolbar);

    let value = Value::from_plain_text("ab").with_selection(2, 2);
    let report = apply(&mut dom, &value, root, &registry(), &ApplyOptions::default());

    assert!(report.selection_written);
    assert_eq!(dom.active_element(), Some(toolbar));
}

#[test]
fn test_placeholder_is_rendered_for_empty_value() {
    let (mut dom, root) = MemoryDom::with_root("div", "");
    let options = ApplyOptions {
        placeholder: Some("Start writing".to_string()),
        ..ApplyOptions::default()
    };
    apply(&mut dom, &Value::empty(), root, &registry(), &options);

    let placeholder = dom.child_at(root, 2).unwrap();
    assert_eq!(
        dom.get_attribute(placeholder, "data-rich-text-placeholder"),
        Some("Start writing")
    );
    assert_eq!(dom.text_content(root), "\u{FEFF}");
}

#[test]
fn test_to_dom_is_detached() {
    let (mut dom, _) = MemoryDom::with_root("div", "");
    let value = parse("a<em>b</em>");
    let rendered = to_dom(&mut dom, &value, &registry(), &ToDomOptions::default());

    assert!(!dom.is_connected(rendered.body));
    assert_eq!(dom.inner_html(rendered.body), "a<em>b</em>");
    assert!(dom.mutations().is_empty());
}
