use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Parallel arrays out of step: text has {text} characters, formats {formats}, replacements {replacements}")]
    LengthMismatch {
        text: usize,
        formats: usize,
        replacements: usize,
    },

    #[error("Replacement at {index} does not line up with an object replacement character")]
    ReplacementMismatch { index: usize },

    #[error("Selection {start}..{end} is out of bounds for length {len}")]
    SelectionOutOfBounds { start: usize, end: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Format type names must be namespaced (e.g. \"core/bold\"): {0}")]
    UnnamespacedName(String),

    #[error("Format type {0} has no tag name")]
    MissingTagName(String),
}
