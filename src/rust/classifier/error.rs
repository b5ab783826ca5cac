use std::fmt;

/// Represents the different types of errors that can occur while training or
/// applying the sentiment classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Training was attempted without examples, or the examples contain no words
    EmptyTrainingSet(String),
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTrainingSet(msg) => write!(f, "Empty training set: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
