//! # Rich Text Editor
//!
//! Editing operations over Values and the session that binds a Value to an
//! editable element.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: live element + selection → Value    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: operations + session                │
//! │  - insert/remove/slice/split/join           │
//! │  - apply/remove/toggle formats              │
//! │  - input, selection and composition events  │
//! │  - format boundary navigation               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ reconciler: Value → patched live element    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Copy on write**: operations take `&Value` and return a new Value
//! 2. **Normalised output**: results share one `Arc` per format run
//! 3. **Session owns the record**: the live element is re-parsed, never trusted
//!
//! ## Usage
//!
//! ```rust,ignore
//! use richtext_editor::{insert_text, toggle_format, RichTextSession, SessionOptions};
//! use richtext_model::Format;
//!
//! let value = insert_text(&value, "hello", None, None);
//! let value = toggle_format(&value, Format::new("core/bold").shared());
//!
//! let mut session = RichTextSession::new(dom, root, registry, "<em>hi</em>", SessionOptions::default())?;
//! let change = session.handle_change(value);
//! println!("{}", change.html);
//! ```

mod edit;
mod errors;
mod formatting;
mod session;

#[cfg(test)]
mod tests_properties;
#[cfg(test)]
mod tests_session;

pub use edit::{
    concat, insert, insert_object, insert_text, join, remove, slice, split, split_at_selection,
};
pub use errors::{EditorError, EditorResult};
pub use formatting::{apply_format, remove_format, toggle_format, update_formats};
pub use session::{Change, Clipboard, RichTextSession, SessionEvent, SessionOptions};
