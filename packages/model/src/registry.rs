//! # Format Types
//!
//! A format type describes one annotation a host supports: the element it
//! renders to, an optional fixed class that identifies it, and the mapping
//! from short attribute keys (as stored on a [`Format`](crate::Format)) to
//! host attribute names.
//!
//! The parser and the tree builder only ever see the [`FormatTypeRegistry`]
//! trait. [`FormatTypeStore`] is the in-memory implementation hosts fill from
//! configuration.

use crate::error::RegistryError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tag name that matches any bare element no other type claims.
pub const WILDCARD_TAG_NAME: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatType {
    pub name: String,

    pub tag_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Short key to host attribute name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    #[serde(default = "default_content_editable")]
    pub content_editable: bool,

    #[serde(default)]
    pub object: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_content_editable() -> bool {
    true
}

impl FormatType {
    pub fn new(name: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_name: tag_name.into(),
            class_name: None,
            attributes: IndexMap::new(),
            content_editable: true,
            object: false,
            title: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Map the short key `key` to the host attribute `host_name`.
    pub fn with_attribute(mut self, key: impl Into<String>, host_name: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), host_name.into());
        self
    }

    /// Mark the type as non-editable: its elements become atomic objects that
    /// keep their inner markup verbatim.
    pub fn non_editable(mut self) -> Self {
        self.content_editable = false;
        self
    }

    pub fn as_object(mut self) -> Self {
        self.object = true;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Lookup interface consumed by the parser and the tree builder.
pub trait FormatTypeRegistry {
    fn get(&self, name: &str) -> Option<&FormatType>;

    /// First type whose class name appears as a whole word in `class_attr`.
    /// The element tag does not take part in the match.
    fn lookup_by_tag_and_class(&self, tag: &str, class_attr: &str) -> Option<&FormatType>;

    /// First class-less type rendering to `tag`, else a class-less wildcard type.
    fn lookup_by_bare_tag(&self, tag: &str) -> Option<&FormatType>;
}

/// Insertion-ordered in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct FormatTypeStore {
    types: IndexMap<String, FormatType>,
}

impl FormatTypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `format_type`, replacing an earlier type of the same name.
    pub fn add(&mut self, format_type: FormatType) -> Result<(), RegistryError> {
        if !is_namespaced(&format_type.name) {
            return Err(RegistryError::UnnamespacedName(format_type.name));
        }
        if format_type.tag_name.is_empty() {
            return Err(RegistryError::MissingTagName(format_type.name));
        }

        debug!(name = %format_type.name, tag = %format_type.tag_name, "Registering format type");
        self.types.insert(format_type.name.clone(), format_type);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<FormatType> {
        self.types.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn find_bare(&self, tag: &str) -> Option<&FormatType> {
        self.iter()
            .find(|format_type| format_type.class_name.is_none() && format_type.tag_name == tag)
    }
}

impl FromIterator<FormatType> for FormatTypeStore {
    /// Collects the valid types, skipping (and logging) rejected ones.
    fn from_iter<I: IntoIterator<Item = FormatType>>(iter: I) -> Self {
        let mut store = Self::new();
        for format_type in iter {
            if let Err(err) = store.add(format_type) {
                tracing::warn!("{}", err);
            }
        }
        store
    }
}

impl FormatTypeRegistry for FormatTypeStore {
    fn get(&self, name: &str) -> Option<&FormatType> {
        self.types.get(name)
    }

    fn lookup_by_tag_and_class(&self, _tag: &str, class_attr: &str) -> Option<&FormatType> {
        self.iter().find(|format_type| {
            format_type
                .class_name
                .as_deref()
                .is_some_and(|class_name| has_class(class_attr, class_name))
        })
    }

    fn lookup_by_bare_tag(&self, tag: &str) -> Option<&FormatType> {
        self.find_bare(tag)
            .or_else(|| self.find_bare(WILDCARD_TAG_NAME))
    }
}

/// Registry with no types; every element parses as an unregistered format.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl FormatTypeRegistry for EmptyRegistry {
    fn get(&self, _name: &str) -> Option<&FormatType> {
        None
    }

    fn lookup_by_tag_and_class(&self, _tag: &str, _class_attr: &str) -> Option<&FormatType> {
        None
    }

    fn lookup_by_bare_tag(&self, _tag: &str) -> Option<&FormatType> {
        None
    }
}

/// `class_name` appears in the space separated `class_attr`.
pub fn has_class(class_attr: &str, class_name: &str) -> bool {
    class_attr.split(' ').any(|word| word == class_name)
}

fn is_namespaced(name: &str) -> bool {
    match name.split_once('/') {
        Some((namespace, local)) => {
            !namespace.is_empty() && !local.is_empty() && !local.contains('/')
        }
        None => false,
    }
}
