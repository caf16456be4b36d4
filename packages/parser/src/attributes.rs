//! Element attributes to format descriptors.

use richtext_dom::HostTree;
use richtext_model::markers::{DISABLED_HANDLER_PREFIX, INTERNAL_ATTRIBUTE_PREFIX};
use richtext_model::{Attributes, Format, FormatType, FormatTypeRegistry};
use tracing::trace;

/// Collect the attributes of `node` that belong in a format.
///
/// Internal `data-rich-text-*` attributes are skipped and `on*` handlers are
/// renamed so they cannot run inside an editable tree. `None` when nothing
/// is left.
pub fn get_attributes<H: HostTree>(host: &H, node: H::Node) -> Option<Attributes> {
    let mut accumulator: Option<Attributes> = None;

    for (name, value) in host.attributes(node) {
        if name.starts_with(INTERNAL_ATTRIBUTE_PREFIX) {
            continue;
        }

        let safe_name = if is_event_handler(&name) {
            format!("{}{}", DISABLED_HANDLER_PREFIX, name)
        } else {
            name
        };
        accumulator
            .get_or_insert_with(Attributes::new)
            .insert(safe_name, value);
    }

    accumulator
}

fn is_event_handler(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// A format resolved from an element, with the matched type's editability.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFormat {
    pub format: Format,
    pub content_editable: bool,
}

/// Resolve an element into a format.
///
/// Class lookup comes first: a matching type's class is removed from the
/// `class` attribute (which disappears when nothing else is left). Then the
/// bare tag is looked up. Unknown elements become a format named after the
/// tag carrying every attribute as is.
pub fn to_format<R>(tag_name: &str, attributes: Option<Attributes>, registry: &R) -> ResolvedFormat
where
    R: FormatTypeRegistry + ?Sized,
{
    let mut attributes = attributes;
    let mut format_type: Option<&FormatType> = None;

    if let Some(attrs) = attributes.as_mut() {
        if let Some(class) = attrs.get("class").cloned() {
            format_type = registry.lookup_by_tag_and_class(tag_name, &class);
            if let Some(class_name) = format_type.and_then(|ft| ft.class_name.as_deref()) {
                let remaining = format!(" {} ", class)
                    .replacen(&format!(" {} ", class_name), " ", 1)
                    .trim()
                    .to_string();
                if remaining.is_empty() {
                    attrs.shift_remove("class");
                } else {
                    attrs.insert("class".to_string(), remaining);
                }
            }
        }
    }

    let Some(format_type) = format_type.or_else(|| registry.lookup_by_bare_tag(tag_name)) else {
        trace!(tag = tag_name, "No format type registered, keeping element as is");
        return ResolvedFormat {
            format: Format {
                kind: tag_name.to_string(),
                tag_name: None,
                attributes,
                unregistered_attributes: None,
            },
            content_editable: true,
        };
    };

    trace!(tag = tag_name, format = %format_type.name, "Resolved format type");

    let Some(mut remaining) = attributes else {
        return ResolvedFormat {
            format: Format::new(format_type.name.clone()).with_tag_name(tag_name),
            content_editable: format_type.content_editable,
        };
    };

    let mut registered = Attributes::new();
    for (key, host_name) in &format_type.attributes {
        if let Some(value) = remaining.shift_remove(host_name) {
            registered.insert(key.clone(), value);
        }
    }

    if !format_type.content_editable {
        remaining.shift_remove("contenteditable");
    }

    ResolvedFormat {
        format: Format {
            kind: format_type.name.clone(),
            tag_name: Some(tag_name.to_string()),
            attributes: Some(registered),
            unregistered_attributes: Some(remaining),
        },
        content_editable: format_type.content_editable,
    }
}
