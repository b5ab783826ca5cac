use thiserror::Error;

/// Errors raised while validating parser output before extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// A token is missing a field the extractor needs (`pos`, `dep` or `children`)
    #[error("Malformed input: token {index} ('{text}') is missing `{field}`")]
    MissingField {
        index: usize,
        text: String,
        field: &'static str,
    },
    /// A field is present but carries a value the token model does not accept
    #[error("Malformed input: token {index} has invalid {field} '{value}'")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: String,
    },
    /// A head or child reference points outside the sentence
    #[error("Malformed input: token {index} references token {target}, but the sentence has {len} tokens")]
    OutOfSentence {
        index: usize,
        target: usize,
        len: usize,
    },
    /// Tree structure violates the dependency invariants
    #[error("Malformed input: token {index}: {reason}")]
    InvalidTree { index: usize, reason: String },
}

impl ExtractionError {
    /// Index of the offending token within its sentence
    pub fn token_index(&self) -> usize {
        match self {
            Self::MissingField { index, .. }
            | Self::InvalidField { index, .. }
            | Self::OutOfSentence { index, .. }
            | Self::InvalidTree { index, .. } => *index,
        }
    }
}
