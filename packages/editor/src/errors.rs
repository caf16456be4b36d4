//! Error types for the editor

use richtext_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Value has no selection to split at")]
    NoSelection,

    #[error("Editable root must be an element")]
    NotAnElement,

    #[error("Invalid value: {0}")]
    Model(#[from] ModelError),
}

pub type EditorResult<T> = Result<T, EditorError>;
