//! # Rich Text Value
//!
//! The canonical in-memory form of formatted text: a string plus two arrays
//! running parallel to its characters.
//!
//! ```text
//! text          h    i    ￼    !
//! formats      [B]  [B]  [ ]  [ ]
//! replacements  -    -   img   -
//! ```
//!
//! Values are never mutated once handed to a caller. Editing operations build
//! new arrays and return a new Value.

use crate::error::{ModelError, ModelResult};
use crate::format::{FormatList, Replacement};
use crate::special_chars::OBJECT_REPLACEMENT_CHARACTER;
use crate::text::char_len;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub text: String,

    /// Format stack per character.
    pub formats: Vec<FormatList>,

    /// Object payload per character; `Some` only at object-replacement characters.
    pub replacements: Vec<Option<Replacement>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,

    /// Formats that apply to text typed at a collapsed caret. Recomputed lazily.
    #[serde(skip)]
    pub active_formats: Option<FormatList>,
}

impl Value {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unformatted value holding `text` verbatim.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = char_len(&text);
        Self {
            text,
            formats: vec![FormatList::new(); len],
            replacements: vec![None; len],
            ..Self::default()
        }
    }

    /// Build from the three parallel arrays, checking the invariants.
    pub fn from_parts(
        text: impl Into<String>,
        formats: Vec<FormatList>,
        replacements: Vec<Option<Replacement>>,
    ) -> ModelResult<Self> {
        let value = Self {
            text: text.into(),
            formats,
            replacements,
            ..Self::default()
        };
        value.validate()?;
        Ok(value)
    }

    /// A single object-replacement character carrying `replacement`.
    pub fn object(replacement: Replacement) -> Self {
        Self {
            text: OBJECT_REPLACEMENT_CHARACTER.to_string(),
            formats: vec![FormatList::new()],
            replacements: vec![Some(replacement)],
            ..Self::default()
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self.active_formats = None;
        self
    }

    pub fn without_selection(mut self) -> Self {
        self.start = None;
        self.end = None;
        self.active_formats = None;
        self
    }

    /// Check the parallel-array invariants and the selection bounds.
    pub fn validate(&self) -> ModelResult<()> {
        let text_len = char_len(&self.text);

        if text_len != self.formats.len() || text_len != self.replacements.len() {
            return Err(ModelError::LengthMismatch {
                text: text_len,
                formats: self.formats.len(),
                replacements: self.replacements.len(),
            });
        }

        for (index, (character, replacement)) in
            self.text.chars().zip(&self.replacements).enumerate()
        {
            let is_object = character == OBJECT_REPLACEMENT_CHARACTER;
            if is_object != replacement.is_some() {
                return Err(ModelError::ReplacementMismatch { index });
            }
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end || end > text_len {
                return Err(ModelError::SelectionOutOfBounds {
                    start,
                    end,
                    len: text_len,
                });
            }
        }

        Ok(())
    }

    /// Panic when the invariants are broken. Editing operations call this on
    /// their inputs: a broken Value can only come from hand-built arrays.
    #[track_caller]
    pub fn assert_valid(&self) {
        if let Err(err) = self.validate() {
            panic!("invalid rich text value: {err}");
        }
    }
}
