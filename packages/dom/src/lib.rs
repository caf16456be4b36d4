//! # Host Trees
//!
//! The [`HostTree`] adapter the parser reads from and the reconciler writes
//! to, plus [`MemoryDom`], an in-memory implementation with a markup reader
//! and a mutation log.
//!
//! Escaping helpers used by every markup writer in the workspace live here
//! too.

pub mod entities;
pub mod escape;
pub mod host;
mod markup;
pub mod memory;
pub mod tokenizer;
mod whitespace;

pub use entities::decode_entities;
pub use escape::{escape_attribute, escape_editable_html, is_valid_attribute_name};
pub use host::{HostRange, HostTree, NodeKind};
pub use memory::{is_void_element, MemoryDom, Mutation, NodeId};
pub use tokenizer::Token;
