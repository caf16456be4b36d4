//! # Editable Session
//!
//! Binds one editable element of a host tree to a current Value (the
//! "record") and keeps the two in step as the user types, moves the caret
//! and composes text.
//!
//! The host reports events by calling the `on_*` methods. Each returns what
//! changed, so the embedder can persist the new markup or mirror the
//! selection without listening to the tree itself.

use crate::edit::{remove, slice};
use crate::errors::{EditorError, EditorResult};
use crate::formatting::update_formats;
use richtext_dom::{HostRange, HostTree, NodeKind};
use richtext_model::markers::PLACEHOLDER_ATTRIBUTE;
use richtext_model::{
    get_active_formats, get_text_content, is_collapsed, FormatList, FormatTypeRegistry, Value,
};
use richtext_parser::{create_from_element, create_from_html, CreateOptions};
use richtext_reconciler::{apply, ApplyOptions, ApplyReport};
use richtext_tree::to_html_string;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Input types whose effect the session undoes by re-rendering the record.
const IGNORED_INPUT_TYPES: [&str; 5] = [
    "insertParagraph",
    "insertOrderedList",
    "insertUnorderedList",
    "insertHorizontalRule",
    "insertLink",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub preserve_white_space: bool,
    pub placeholder: Option<String>,
}

/// The record after an edit, serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub html: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The content changed.
    Change(Change),
    /// Only the selection moved.
    Selection {
        start: Option<usize>,
        end: Option<usize>,
    },
}

/// Clipboard payload for a copied selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    pub plain_text: String,
    pub html: String,
}

/// Single editable element bound to a Value.
pub struct RichTextSession<H: HostTree, R: FormatTypeRegistry> {
    host: H,
    element: H::Node,
    registry: R,
    options: SessionOptions,

    /// Last known content and selection
    record: Value,

    /// Active formats chosen by arrow-key navigation, consumed by the next
    /// selection change.
    pending_active_formats: Option<FormatList>,

    /// Set between composition start and end. Input and selection events
    /// are ignored meanwhile.
    composing: bool,

    /// Markup of the record as last reported
    html: String,
}

impl<H: HostTree, R: FormatTypeRegistry> RichTextSession<H, R> {
    /// Make `element` editable and render `html` into it.
    pub fn new(
        mut host: H,
        element: H::Node,
        registry: R,
        html: &str,
        options: SessionOptions,
    ) -> EditorResult<Self> {
        if host.kind(element) != NodeKind::Element {
            return Err(EditorError::NotAnElement);
        }

        host.set_attribute(element, "contenteditable", "true");

        let mut session = Self {
            host,
            element,
            registry,
            options,
            record: Value::empty(),
            pending_active_formats: None,
            composing: false,
            html: html.to_string(),
        };
        session.record = session.parse(html);
        let record = session.record.clone();
        session.apply_record(&record, false);
        Ok(session)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn element(&self) -> H::Node {
        self.element
    }

    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    fn parse(&self, html: &str) -> Value {
        let options = CreateOptions {
            collapse_white_space: !self.options.preserve_white_space,
            ..CreateOptions::default()
        };
        create_from_html(html, &self.registry, options)
    }

    fn is_focused(&self) -> bool {
        self.host.active_element() == Some(self.element)
    }

    /// Parse the live element together with the host selection.
    pub fn create_record(&self) -> Value {
        let range = self.host.selection();
        create_from_element(
            &self.host,
            self.element,
            range.as_ref(),
            CreateOptions::editable(),
            &self.registry,
        )
    }

    pub fn apply_record(&mut self, value: &Value, dom_only: bool) -> ApplyReport {
        let options = ApplyOptions {
            dom_only,
            preserve_white_space: self.options.preserve_white_space,
            placeholder: self.options.placeholder.clone(),
        };
        apply(&mut self.host, value, self.element, &self.registry, &options)
    }

    /// Adopt `value` as the record, render it and serialize it.
    pub fn handle_change(&mut self, value: Value) -> Change {
        self.apply_record(&value, false);
        self.html = to_html_string(&value, &self.registry, self.options.preserve_white_space);
        self.record = value;

        Change {
            html: self.html.clone(),
            start: self.record.start,
            end: self.record.end,
        }
    }

    /// The element's content was edited by the host.
    ///
    /// `None` for `input_type` means the change was noticed without an input
    /// event, e.g. by a selection change.
    #[instrument(skip(self))]
    pub fn on_input(&mut self, input_type: Option<&str>) -> Option<Change> {
        if self.composing {
            return None;
        }

        if let Some(input_type) = input_type {
            if input_type.starts_with("format") || IGNORED_INPUT_TYPES.contains(&input_type) {
                trace!("Reverting unsupported input");
                let record = self.record.clone();
                self.apply_record(&record, false);
                return None;
            }
        }

        let mut current = self.create_record();
        if let (Some(start), Some(end)) = (self.record.start, current.start) {
            let old_active_formats = self.record.active_formats.clone().unwrap_or_default();
            current = update_formats(current, start, end, &old_active_formats);
        }

        Some(self.handle_change(current))
    }

    /// The host selection moved, or the content changed without an input
    /// event.
    #[instrument(skip(self))]
    pub fn on_selection_change(&mut self) -> Option<SessionEvent> {
        if self.host.get_attribute(self.element, "contenteditable") != Some("true") {
            return None;
        }
        if !self.is_focused() || self.composing {
            return None;
        }

        let current = self.create_record();
        if current.text != self.record.text {
            return self.on_input(None).map(SessionEvent::Change);
        }

        if current.start == self.record.start && current.end == self.record.end {
            if self.record.text.is_empty() && current.start == Some(0) {
                self.fix_placeholder_selection();
            }
            return None;
        }

        let mut value = self.record.clone();
        value.start = current.start;
        value.end = current.end;
        value.active_formats = self.pending_active_formats.take();
        value.active_formats = Some(get_active_formats(&value));

        self.apply_record(&value, true);
        self.record = value;

        Some(SessionEvent::Selection {
            start: self.record.start,
            end: self.record.end,
        })
    }

    /// Keep the caret in front of the placeholder rather than inside it.
    fn fix_placeholder_selection(&mut self) {
        let Some(range) = self.host.selection() else {
            return;
        };
        let anchor = range.start_container;
        if self.host.kind(anchor) != NodeKind::Element {
            return;
        }

        let target = self.host.child_at(anchor, range.start_offset);
        let is_placeholder = target.is_some_and(|target| {
            self.host.kind(target) == NodeKind::Element
                && self.host.has_attribute(target, PLACEHOLDER_ATTRIBUTE)
        });
        let collapsed = HostRange::collapsed(anchor, range.start_offset);
        if is_placeholder && range != collapsed {
            trace!("Collapsing selection to placeholder start");
            self.host.set_selection(collapsed);
        }
    }

    pub fn composition_start(&mut self) {
        debug!("Composition started");
        self.composing = true;

        if let Some((parent, placeholder)) = self.find_placeholder(self.element) {
            self.host.remove_child(parent, placeholder);
        }
    }

    pub fn composition_end(&mut self) -> Option<Change> {
        debug!("Composition ended");
        self.composing = false;
        self.on_input(Some("insertText"))
    }

    fn find_placeholder(&self, node: H::Node) -> Option<(H::Node, H::Node)> {
        for child in self.host.children(node) {
            if self.host.kind(child) != NodeKind::Element {
                continue;
            }
            if self.host.has_attribute(child, PLACEHOLDER_ATTRIBUTE) {
                return Some((node, child));
            }
            if let Some(found) = self.find_placeholder(child) {
                return Some(found);
            }
        }
        None
    }

    /// Left or right arrow without modifiers. `reverse` is true for the key
    /// moving towards the start of the text.
    ///
    /// At a format boundary the first press steps into or out of the format
    /// instead of moving the caret. Returns true when the key was consumed
    /// and the host must not move the caret.
    pub fn on_arrow_key(&mut self, reverse: bool) -> bool {
        let (Some(start), Some(end)) = (self.record.start, self.record.end) else {
            return false;
        };
        let current_active_formats = self.record.active_formats.clone().unwrap_or_default();
        let collapsed = start == end;

        if collapsed && current_active_formats.is_empty() {
            if start == 0 && reverse {
                return false;
            }
            if end == self.record.len() && !reverse {
                return false;
            }
        }

        if !collapsed {
            return false;
        }

        let formats_before: FormatList = start
            .checked_sub(1)
            .and_then(|index| self.record.formats.get(index))
            .cloned()
            .unwrap_or_default();
        let formats_after: FormatList = self.record.formats.get(start).cloned().unwrap_or_default();
        let (destination, origin) = if reverse {
            (formats_before, formats_after)
        } else {
            (formats_after, formats_before)
        };

        let is_increasing = current_active_formats
            .iter()
            .enumerate()
            .all(|(index, format)| {
                destination
                    .get(index)
                    .is_some_and(|other| Arc::ptr_eq(format, other))
            });

        let mut depth = current_active_formats.len();
        if !is_increasing {
            depth -= 1;
        } else if depth < destination.len() {
            depth += 1;
        }

        if depth == current_active_formats.len() {
            self.pending_active_formats = Some(destination);
            return false;
        }

        let source = if is_increasing { destination } else { origin };
        let mut value = self.record.clone();
        value.active_formats = Some(source.into_iter().take(depth).collect());
        trace!(depth, "Stepping format boundary");

        self.apply_record(&value, false);
        self.record = value;
        true
    }

    /// Backspace or delete. Deleting a value that is selected from start to
    /// end is handled here; anything else is left to the host. Returns the
    /// change when the key was consumed.
    pub fn on_delete_key(&mut self) -> Option<Change> {
        let current = self.create_record();
        match (current.start, current.end) {
            (Some(0), Some(end)) if end != 0 && end == current.len() => {
                let emptied = remove(&current, None, None);
                Some(self.handle_change(emptied))
            }
            _ => None,
        }
    }

    /// Plain text and markup of the selected content, when a non-collapsed
    /// selection exists and focus is inside the element.
    pub fn copy(&self) -> Option<Clipboard> {
        if is_collapsed(&self.record) != Some(false) {
            return None;
        }
        let focus_inside = self
            .host
            .active_element()
            .is_some_and(|active| self.host.contains(self.element, active));
        if !focus_inside {
            return None;
        }

        let selected = slice(&self.record, None, None);
        Some(Clipboard {
            plain_text: get_text_content(&selected),
            html: to_html_string(&selected, &self.registry, self.options.preserve_white_space),
        })
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self) -> Option<(Clipboard, Change)> {
        let clipboard = self.copy()?;
        let remaining = remove(&self.record, None, None);
        Some((clipboard, self.handle_change(remaining)))
    }

    /// Replace the content from outside, keeping the selection where it
    /// still fits.
    pub fn set_value(&mut self, html: &str) {
        if html == self.html {
            return;
        }

        let mut value = self.parse(html);
        if let (Some(start), Some(end)) = (self.record.start, self.record.end) {
            let len = value.len();
            value.start = Some(start.min(len));
            value.end = Some(end.min(len));
        }

        self.html = html.to_string();
        self.record = value;
        let record = self.record.clone();
        self.apply_record(&record, false);
    }

    /// Select `[start, end)` from outside, focusing the element.
    pub fn set_selection(&mut self, start: usize, end: usize) -> EditorResult<()> {
        let value = self.record.clone().with_selection(start, end);
        value.validate()?;

        if !self.is_focused() {
            self.host.focus(self.element);
        }

        self.apply_record(&value, false);
        self.record = value;
        Ok(())
    }
}
