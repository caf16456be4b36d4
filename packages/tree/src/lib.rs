//! # Rich Text Tree
//!
//! Turns a [`richtext_model::Value`] into an intermediate tree, and that
//! tree into markup. The reconciler consumes the same tree to update a live
//! host tree.
//!
//! ```text
//! Value ──to_tree──▶ VTree ──children_html──▶ String
//!                      │
//!                      └──▶ reconciler
//! ```

pub mod builder;
pub mod serializer;
pub mod vtree;

pub use builder::{from_format, to_tree, BuiltTree, FormatSource, TreeOptions};
pub use serializer::{children_html, to_html_string};
pub use vtree::{SelectionPath, VNode, VNodeId, VTree};
