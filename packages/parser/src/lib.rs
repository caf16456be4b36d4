//! # Rich Text Parser
//!
//! Host tree (or markup) → [`Value`](richtext_model::Value).
//!
//! ```rust,ignore
//! use richtext_parser::{create_from_html, CreateOptions};
//!
//! let value = create_from_html("<strong>hi</strong>", &registry, CreateOptions::default());
//! assert_eq!(value.text, "hi");
//! ```

pub mod attributes;
pub mod create;
mod selection;

#[cfg(test)]
mod tests_create;

pub use attributes::{get_attributes, to_format, ResolvedFormat};
pub use create::{create, create_from_element, create_from_html, CreateInput, CreateOptions};
