use std::collections::HashMap;

pub mod builder;
mod classifier;
mod config;
pub mod dataset;
mod error;
mod tokenize;

pub use builder::ClassifierBuilder;
pub use classifier::{Classifier, InformativeFeature};
pub use config::ClassifierConfig;
pub use dataset::{DatasetError, LabeledExample};
pub use error::ClassifierError;
pub use tokenize::split_sentences;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of labels the classifier can produce
    pub num_labels: usize,
    /// Labels in the order they were first seen during training
    pub labels: Vec<String>,
    /// Number of training documents per label
    pub label_documents: HashMap<String, usize>,
    /// Number of distinct words seen in training
    pub vocabulary_size: usize,
    /// Total number of training documents
    pub num_documents: usize,
    /// Additive smoothing constant
    pub smoothing: f64,
}
