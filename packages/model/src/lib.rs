//! # Rich Text Model
//!
//! The value model shared by every other crate in the workspace.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: host tree → Value                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: Value + format algebra               │
//! │  - parallel text/formats/replacements       │
//! │  - normalisation (shared Arc runs)          │
//! │  - active format resolution                 │
//! │  - format type registry                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tree: Value → intermediate tree → markup    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Character indices**: every offset counts `char`s, never bytes
//! 2. **Identity is meaningful**: adjacent equal formats share one `Arc`
//! 3. **Copy on write**: a Value handed out is never mutated

pub mod active_formats;
pub mod error;
pub mod format;
pub mod markers;
pub mod normalise;
pub mod registry;
pub mod special_chars;
pub mod text;
pub mod value;

#[cfg(test)]
mod tests_properties;

pub use active_formats::{
    get_active_format, get_active_formats, get_active_object, get_text_content, is_collapsed,
    is_empty,
};
pub use error::{ModelError, ModelResult, RegistryError};
pub use format::{
    is_format_equal, is_format_slot_equal, Attributes, Format, FormatList, FormatRef, Replacement,
};
pub use normalise::normalise_formats;
pub use registry::{EmptyRegistry, FormatType, FormatTypeRegistry, FormatTypeStore};
pub use special_chars::{OBJECT_REPLACEMENT_CHARACTER, ZWNBSP};
pub use value::Value;
