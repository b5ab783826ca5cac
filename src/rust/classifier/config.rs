use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// Training and tokenization settings for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Additive smoothing constant (1.0 is Laplace smoothing)
    pub smoothing: f64,
    /// Fold words to lower case before counting
    pub lowercase: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            lowercase: true,
        }
    }
}

impl ClassifierConfig {
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "Smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.smoothing, 1.0);
        assert!(config.lowercase);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_smoothing() {
        for smoothing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ClassifierConfig::default().with_smoothing(smoothing);
            assert!(matches!(config.validate(), Err(ClassifierError::ValidationError(_))));
        }
    }
}
