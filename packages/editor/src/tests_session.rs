use crate::*;
use richtext_dom::{HostRange, HostTree, MemoryDom, NodeId};
use richtext_model::{FormatType, FormatTypeStore, ModelError};

fn registry() -> FormatTypeStore {
    [
        FormatType::new("core/bold", "strong"),
        FormatType::new("core/italic", "em"),
    ]
    .into_iter()
    .collect()
}

fn session(html: &str) -> (RichTextSession<MemoryDom, FormatTypeStore>, NodeId) {
    let (dom, root) = MemoryDom::with_root("div", "");
    let session = RichTextSession::new(dom, root, registry(), html, SessionOptions::default()).unwrap();
    (session, root)
}

/// Text node inside the `index`th child of the root.
fn text_in(session: &RichTextSession<MemoryDom, FormatTypeStore>, index: usize) -> NodeId {
    let host = session.host();
    let child = host.child_at(session.element(), index).unwrap();
    host.child_at(child, 0).unwrap()
}

#[test]
fn test_new_renders_and_makes_editable() {
    let (session, root) = session("a<strong>b</strong>");
    assert_eq!(session.host().inner_html(root), "a<strong>b</strong>");
    assert_eq!(session.host().get_attribute(root, "contenteditable"), Some("true"));
    assert_eq!(session.record().text, "ab");
    assert_eq!(session.html(), "a<strong>b</strong>");
}

#[test]
fn test_new_rejects_non_elements() {
    let (mut dom, _) = MemoryDom::with_root("div", "");
    let text = dom.create_text("x");
    let result = RichTextSession::new(dom, text, registry(), "", SessionOptions::default());
    assert!(matches!(result, Err(EditorError::NotAnElement)));
}

#[test]
fn test_typing_inside_run_keeps_format() {
    let (mut session, root) = session("a<strong>bc</strong>");
    let text = text_in(&session, 1);

    session.host_mut().set_selection(HostRange::collapsed(text, 1));
    assert_eq!(
        session.on_selection_change(),
        Some(SessionEvent::Selection {
            start: Some(2),
            end: Some(2)
        })
    );

    session.host_mut().set_data(text, "bxc");
    session.host_mut().set_selection(HostRange::collapsed(text, 2));
    let change = session.on_input(Some("insertText")).unwrap();

    assert_eq!(change.html, "a<strong>bxc</strong>");
    assert_eq!((change.start, change.end), (Some(3), Some(3)));
    assert_eq!(session.host().text_content(root), "abxc");

    // The caret sits inside bold, so the live element carries the boundary marker.
    let strong = session.host().child_at(root, 1).unwrap();
    assert_eq!(
        session.host().get_attribute(strong, "data-rich-text-format-boundary"),
        Some("true")
    );
}

#[test]
fn test_typing_after_run_is_plain() {
    let (mut session, root) = session("a<strong>b</strong>");
    let text = text_in(&session, 1);

    session.host_mut().set_selection(HostRange::collapsed(text, 1));
    session.on_selection_change();

    session.host_mut().set_data(text, "bc");
    session.host_mut().set_selection(HostRange::collapsed(text, 2));
    let change = session.on_input(Some("insertText")).unwrap();

    assert_eq!(change.html, "a<strong>b</strong>c");
    assert_eq!(session.host().inner_html(root), "a<strong>b</strong>c");
}

#[test]
fn test_unsupported_input_is_reverted() {
    let (mut session, root) = session("a<strong>b</strong>");
    session.host_mut().set_inner_html(root, "<p>a</p><p>b</p>");

    assert_eq!(session.on_input(Some("insertParagraph")), None);
    assert_eq!(session.host().inner_html(root), "a<strong>b</strong>");
    assert_eq!(session.on_input(Some("formatItalic")), None);
}

#[test]
fn test_selection_change_is_reentrant_safe() {
    let (mut session, root) = session("ab");
    session.host_mut().set_selection(HostRange::collapsed(root, 0));

    assert!(session.on_selection_change().is_some());
    assert_eq!(session.on_selection_change(), None);
}

#[test]
fn test_selection_change_needs_focus() {
    let (mut session, root) = session("ab");
    let other = session.host_mut().create_root("input");
    session.host_mut().set_selection(HostRange::collapsed(root, 0));
    session.host_mut().focus(other);

    assert_eq!(session.on_selection_change(), None);
}

#[test]
fn test_selection_change_with_new_text_is_input() {
    let (mut session, root) = session("ab");
    let text = session.host().child_at(root, 0).unwrap();
    session.host_mut().set_data(text, "abc");
    session.host_mut().set_selection(HostRange::collapsed(text, 3));

    match session.on_selection_change() {
        Some(SessionEvent::Change(change)) => assert_eq!(change.html, "abc"),
        other => panic!("expected a change, got {other:?}"),
    }
}

#[test]
fn test_composition_gates_input() {
    let (mut session, root) = session("ab");
    let text = session.host().child_at(root, 0).unwrap();

    session.composition_start();
    assert!(session.is_composing());

    session.host_mut().set_data(text, "abか");
    session.host_mut().set_selection(HostRange::collapsed(text, 3));
    assert_eq!(session.on_input(Some("insertCompositionText")), None);
    assert_eq!(session.on_selection_change(), None);

    let change = session.composition_end().unwrap();
    assert!(!session.is_composing());
    assert_eq!(change.html, "abか");
}

#[test]
fn test_composition_start_removes_placeholder() {
    let (dom, root) = MemoryDom::with_root("div", "");
    let options = SessionOptions {
        placeholder: Some("Write".to_string()),
        ..SessionOptions::default()
    };
    let mut session = RichTextSession::new(dom, root, registry(), "", options).unwrap();
    let has_placeholder = |session: &RichTextSession<MemoryDom, FormatTypeStore>| {
        session
            .host()
            .children(root)
            .into_iter()
            .any(|child| session.host().has_attribute(child, "data-rich-text-placeholder"))
    };
    assert!(has_placeholder(&session));

    session.composition_start();
    assert!(!has_placeholder(&session));
}

#[test]
fn test_arrow_key_steps_into_format() {
    let (mut session, _) = session("a<strong>b</strong>");
    session.set_selection(1, 1).unwrap();

    assert!(session.on_arrow_key(false));
    let active = session.record().active_formats.clone().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, "core/bold");

    // Already inside: the caret moves and the next selection change keeps bold.
    assert!(!session.on_arrow_key(false));

    assert!(session.on_arrow_key(true));
    assert_eq!(session.record().active_formats, Some(vec![]));
}

#[test]
fn test_arrow_key_at_edges_is_not_consumed() {
    let (mut session, _) = session("ab");
    session.set_selection(0, 0).unwrap();
    assert!(!session.on_arrow_key(true));

    session.set_selection(2, 2).unwrap();
    assert!(!session.on_arrow_key(false));

    session.set_selection(0, 2).unwrap();
    assert!(!session.on_arrow_key(false));
}

#[test]
fn test_delete_all_selected() {
    let (mut session, root) = session("a<strong>b</strong>");
    let count = session.host().child_count(root);
    session.host_mut().set_selection(HostRange::new(root, 0, root, count));

    let change = session.on_delete_key().unwrap();
    assert_eq!(change.html, "");
    assert_eq!((change.start, change.end), (Some(0), Some(0)));
    assert_eq!(session.record().text, "");
}

#[test]
fn test_delete_partial_selection_is_left_to_host() {
    let (mut session, root) = session("ab");
    let text = session.host().child_at(root, 0).unwrap();
    session.host_mut().set_selection(HostRange::new(text, 0, text, 1));
    assert_eq!(session.on_delete_key(), None);
}

#[test]
fn test_copy_and_cut() {
    let (mut session, _) = session("a<strong>bc</strong>");

    session.set_selection(1, 1).unwrap();
    assert_eq!(session.copy(), None);

    session.set_selection(1, 3).unwrap();
    let clipboard = session.copy().unwrap();
    assert_eq!(clipboard.plain_text, "bc");
    assert_eq!(clipboard.html, "<strong>bc</strong>");

    let (_, change) = session.cut().unwrap();
    assert_eq!(change.html, "a");
}

#[test]
fn test_copy_needs_focus_inside() {
    let (mut session, _) = session("ab");
    session.set_selection(0, 2).unwrap();
    let other = session.host_mut().create_root("input");
    session.host_mut().focus(other);
    assert_eq!(session.copy(), None);
}

#[test]
fn test_set_value_keeps_selection_in_bounds() {
    let (mut session, root) = session("abcd");
    session.set_selection(3, 4).unwrap();

    session.set_value("<em>x</em>");
    assert_eq!(session.host().inner_html(root), "<em>x</em>");
    assert_eq!((session.record().start, session.record().end), (Some(1), Some(1)));
    assert_eq!(session.html(), "<em>x</em>");
}

#[test]
fn test_set_selection_validates_and_focuses() {
    let (mut session, root) = session("ab");
    assert_eq!(
        session.set_selection(0, 9),
        Err(EditorError::Model(ModelError::SelectionOutOfBounds {
            start: 0,
            end: 9,
            len: 2
        }))
    );

    session.set_selection(1, 2).unwrap();
    assert_eq!(session.host().active_element(), Some(root));
    assert!(session.host().selection().is_some());
}
