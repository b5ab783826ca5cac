use std::collections::{BTreeSet, HashMap};

use log::{debug, info};

use super::classifier::{Classifier, LabelStats};
use super::config::ClassifierConfig;
use super::dataset::LabeledExample;
use super::error::ClassifierError;
use super::tokenize::words;

/// A builder for training a Classifier with a fluent interface.
#[derive(Default, Debug, Clone)]
pub struct ClassifierBuilder {
    config: ClassifierConfig,
    examples: Vec<LabeledExample>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use aspectra::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            examples: Vec::new(),
        }
    }

    /// Sets the smoothing and tokenization configuration
    ///
    /// # Example
    /// ```
    /// use aspectra::{ClassifierBuilder, ClassifierConfig};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_config(ClassifierConfig::default().with_smoothing(0.5));
    /// ```
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates a single training example:
    /// - Label must not be empty
    /// - Text must contain something other than whitespace
    fn validate_example(example: &LabeledExample) -> Result<(), ClassifierError> {
        if example.label.is_empty() {
            return Err(ClassifierError::ValidationError("Example label cannot be empty".into()));
        }
        if example.text.trim().is_empty() {
            return Err(ClassifierError::ValidationError(
                format!("Example text for label '{}' cannot be empty", example.label)
            ));
        }
        Ok(())
    }

    /// Adds one labeled example
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The label is empty
    ///   - The text is empty or whitespace only
    ///
    /// # Example
    /// ```
    /// use aspectra::{ClassifierBuilder, LabeledExample};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_example(LabeledExample::new("Delicious food", "positive"));
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_example(mut self, example: LabeledExample) -> Result<Self, ClassifierError> {
        Self::validate_example(&example)?;
        self.examples.push(example);
        Ok(self)
    }

    /// Adds a batch of labeled examples, stopping at the first invalid one
    pub fn add_examples<I>(self, examples: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = LabeledExample>,
    {
        examples.into_iter().try_fold(self, |builder, example| builder.add_example(example))
    }

    /// Trains and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The trained Classifier if successful, or an error if:
    ///   - The configuration is invalid
    ///   - No examples have been added
    ///   - The examples contain no words at all
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use aspectra::{ClassifierBuilder, LabeledExample};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_example(LabeledExample::new("Slow internet.", "negative"))?
    ///     .add_example(LabeledExample::new("Delicious food", "positive"))?
    ///     .build()?;
    /// assert_eq!(classifier.classify("Slow internet")?, "negative");
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        self.config.validate()?;
        if self.examples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet(
                "At least one labeled example is required".to_string()
            ));
        }

        let mut labels: Vec<LabelStats> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut vocabulary = BTreeSet::new();

        for example in &self.examples {
            let slot = *index.entry(example.label.clone()).or_insert_with(|| {
                labels.push(LabelStats::new(&example.label));
                labels.len() - 1
            });
            let stats = &mut labels[slot];
            stats.documents += 1;

            for word in words(&example.text, self.config.lowercase) {
                *stats.word_counts.entry(word.clone()).or_insert(0) += 1;
                stats.total_words += 1;
                vocabulary.insert(word);
            }
        }

        if vocabulary.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet(
                "Training examples do not contain any words".to_string()
            ));
        }

        for stats in &labels {
            debug!(
                "Label '{}': {} documents, {} words",
                stats.label, stats.documents, stats.total_words
            );
        }
        info!(
            "Trained classifier on {} examples: {} labels, vocabulary of {} words",
            self.examples.len(),
            labels.len(),
            vocabulary.len()
        );

        Ok(Classifier::from_parts(
            self.config,
            labels,
            vocabulary,
            self.examples.len(),
        ))
    }
}
