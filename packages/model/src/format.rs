use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Insertion-ordered attribute map. Equality ignores order.
pub type Attributes = IndexMap<String, String>;

/// Shared format descriptor. Adjacent characters holding the same `Arc` form one run.
pub type FormatRef = Arc<Format>;

/// Format stack of one character, outermost first. Empty means unformatted.
pub type FormatList = Vec<FormatRef>;

/// One annotation (bold, link, ...) applied to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    /// Registered attributes, keyed by the format type's short names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    /// Host attributes the format type does not declare, kept for round-tripping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unregistered_attributes: Option<Attributes>,
}

impl Format {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            tag_name: None,
            attributes: None,
            unregistered_attributes: None,
        }
    }

    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_unregistered_attr(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.unregistered_attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    /// Wrap into a shareable reference.
    pub fn shared(self) -> FormatRef {
        Arc::new(self)
    }
}

/// Payload of an object-replacement character: an image, a comment, a script
/// placeholder or a non-editable inline annotation rendered as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replacement {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unregistered_attributes: Option<Attributes>,

    #[serde(rename = "innerHTML", default, skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
}

impl Replacement {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            tag_name: None,
            attributes: None,
            unregistered_attributes: None,
            inner_html: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    /// Attribute value by name, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attributes| attributes.get(name))
            .map(String::as_str)
    }
}

impl From<Format> for Replacement {
    fn from(format: Format) -> Self {
        Self {
            kind: format.kind,
            tag_name: format.tag_name,
            attributes: format.attributes,
            unregistered_attributes: format.unregistered_attributes,
            inner_html: None,
        }
    }
}

/// Structural format equality: same type and the same attribute set.
///
/// Identical references are equal without looking inside. `tag_name` and
/// unregistered attributes do not take part.
pub fn is_format_equal(a: &Format, b: &Format) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }

    if a.kind != b.kind {
        return false;
    }

    match (&a.attributes, &b.attributes) {
        (None, None) => true,
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// [`is_format_equal`] over optional slots (a missing slot equals nothing).
pub fn is_format_slot_equal(a: Option<&FormatRef>, b: Option<&FormatRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b) || is_format_equal(a, b),
        _ => false,
    }
}
