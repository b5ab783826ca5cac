//! Aspect-based sentiment analysis over dependency-parsed sentences.
//!
//! Two pieces do the work: an [`AspectExtractor`] that walks a sentence's
//! dependency tree to find the nominal subject ("aspect") and the adjective
//! describing it, and a naive Bayes [`Classifier`] trained from a handful of
//! labeled phrases that assigns a sentiment label to each description.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use aspectra::{AspectExtractor, Classifier, LabeledExample, TokenRecord};
//!
//! // "The internet was slow." as produced by an upstream dependency parser
//! let tokens = vec![
//!     TokenRecord::new("The", "DET", "det", 1, vec![]),
//!     TokenRecord::new("internet", "NOUN", "nsubj", 2, vec![0]),
//!     TokenRecord::new("was", "AUX", "ROOT", 2, vec![1, 3, 4]),
//!     TokenRecord::new("slow", "ADJ", "acomp", 2, vec![]),
//!     TokenRecord::new(".", "PUNCT", "punct", 2, vec![]),
//! ];
//! let record = AspectExtractor::new().extract_records(&tokens)?;
//! assert_eq!(record.aspect, "internet");
//! assert_eq!(record.description, "slow");
//!
//! let classifier = Classifier::train(vec![
//!     LabeledExample::new("Slow internet.", "negative"),
//!     LabeledExample::new("Delicious food", "positive"),
//! ])?;
//! assert_eq!(classifier.classify(&record.description)?, "negative");
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod extractor;
pub mod model_store;
pub mod pipeline;

pub use classifier::{
    split_sentences, Classifier, ClassifierBuilder, ClassifierConfig, ClassifierError,
    ClassifierInfo, DatasetError, InformativeFeature, LabeledExample,
};
pub use extractor::{
    AspectExtractor, AspectRecord, DependencyRelation, DependencyToken, ExtractionError,
    PartOfSpeech, Sentence, TokenRecord,
};
pub use model_store::{ModelStore, ModelStoreError};
pub use pipeline::{ParsedSentence, Pipeline, PipelineConfig, PipelineError, SentimentRecord};

pub fn init_logger() {
    env_logger::init();
}
