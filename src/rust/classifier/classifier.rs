use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::config::ClassifierConfig;
use super::dataset::LabeledExample;
use super::error::ClassifierError;
use super::tokenize::{split_sentences, words};

/// Word statistics collected for one label during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LabelStats {
    pub(crate) label: String,
    pub(crate) documents: usize,
    pub(crate) word_counts: HashMap<String, usize>,
    pub(crate) total_words: usize,
}

impl LabelStats {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            documents: 0,
            word_counts: HashMap::new(),
            total_words: 0,
        }
    }
}

/// A word whose likelihood differs most between two labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformativeFeature {
    pub word: String,
    /// Label under which the word is most likely
    pub favored: String,
    /// Label under which the word is least likely
    pub disfavored: String,
    /// `P(word | favored) / P(word | disfavored)`
    pub ratio: f64,
}

/// A multinomial naive Bayes sentiment classifier trained from labeled phrases.
///
/// The model is immutable once built, so it is `Send + Sync` and `classify`
/// may be called concurrently from any number of threads.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use aspectra::{Classifier, LabeledExample};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::train(vec![
///     LabeledExample::new("Slow internet.", "negative"),
///     LabeledExample::new("Delicious food", "positive"),
/// ])?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     assert_eq!(classifier_clone.classify("delicious").unwrap(), "positive");
/// }).join().unwrap();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    config: ClassifierConfig,
    labels: Vec<LabelStats>,
    vocabulary: BTreeSet<String>,
    documents: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Trains a classifier with the default configuration
    pub fn train<I>(examples: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = LabeledExample>,
    {
        Self::train_with_config(examples, ClassifierConfig::default())
    }

    pub fn train_with_config<I>(examples: I, config: ClassifierConfig) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = LabeledExample>,
    {
        Self::builder().with_config(config).add_examples(examples)?.build()
    }

    pub(crate) fn from_parts(
        config: ClassifierConfig,
        labels: Vec<LabelStats>,
        vocabulary: BTreeSet<String>,
        documents: usize,
    ) -> Self {
        Self {
            config,
            labels,
            vocabulary,
            documents,
        }
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_labels: self.labels.len(),
            labels: self.labels.iter().map(|s| s.label.clone()).collect(),
            label_documents: self.labels.iter().map(|s| (s.label.clone(), s.documents)).collect(),
            vocabulary_size: self.vocabulary.len(),
            num_documents: self.documents,
            smoothing: self.config.smoothing,
        }
    }

    /// Labels in the order they were first seen during training
    pub fn labels(&self) -> Vec<&str> {
        self.labels.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Checks invariants of a model that did not come out of the builder
    /// (e.g. one read back from disk).
    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        self.config.validate()?;
        if self.labels.is_empty() || self.vocabulary.is_empty() || self.documents == 0 {
            return Err(ClassifierError::EmptyTrainingSet(
                "Model has no labels or no vocabulary".to_string()
            ));
        }
        if let Some(stats) = self.labels.iter().find(|s| s.documents == 0) {
            return Err(ClassifierError::EmptyTrainingSet(
                format!("Label '{}' has no training documents", stats.label)
            ));
        }
        let mut seen = BTreeSet::new();
        if let Some(stats) = self.labels.iter().find(|s| !seen.insert(s.label.as_str())) {
            return Err(ClassifierError::ValidationError(
                format!("Label '{}' appears more than once", stats.label)
            ));
        }
        if self.labels.iter().map(|s| s.documents).sum::<usize>() != self.documents {
            return Err(ClassifierError::ValidationError(
                "Label document counts do not add up to the number of documents".to_string()
            ));
        }
        Ok(())
    }

    fn log_likelihood(&self, stats: &LabelStats, word: &str) -> f64 {
        let alpha = self.config.smoothing;
        let count = stats.word_counts.get(word).copied().unwrap_or(0) as f64;
        let denominator = stats.total_words as f64 + alpha * self.vocabulary.len() as f64;
        ((count + alpha) / denominator).ln()
    }

    /// Unnormalized log scores, one per label in training order
    fn log_scores(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        let tokens = words(text, self.config.lowercase);
        let unseen = tokens.iter().filter(|w| !self.vocabulary.contains(*w)).count();
        if unseen > 0 {
            debug!("{} of {} words in '{}' were not seen in training", unseen, tokens.len(), text);
        }

        let total = self.documents as f64;
        let scores = self.labels
            .iter()
            .map(|stats| {
                let prior = (stats.documents as f64 / total).ln();
                tokens.iter().fold(prior, |acc, word| acc + self.log_likelihood(stats, word))
            })
            .collect::<Vec<_>>();

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::PredictionError(
                format!("Non-finite score while classifying '{}'", text)
            ));
        }
        Ok(scores)
    }

    /// Index of the highest score; ties go to the label seen first in training
    fn best_index(scores: &[f64]) -> usize {
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        best
    }

    fn posteriors(scores: &[f64]) -> Vec<f64> {
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        exp.into_iter().map(|e| e / sum).collect()
    }

    /// Returns the most probable label for the given text
    pub fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        let scores = self.log_scores(text)?;
        Ok(self.labels[Self::best_index(&scores)].label.clone())
    }

    /// Makes a prediction for the given text, returning the label together with
    /// the posterior probability of every label
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f64>), ClassifierError> {
        let scores = self.log_scores(text)?;
        let best = self.labels[Self::best_index(&scores)].label.clone();
        let probabilities = self.labels
            .iter()
            .zip(Self::posteriors(&scores))
            .map(|(stats, p)| (stats.label.clone(), p))
            .collect();
        Ok((best, probabilities))
    }

    /// Posterior probability of every label, in training order
    pub fn prob_classify(&self, text: &str) -> Result<Vec<(String, f64)>, ClassifierError> {
        let scores = self.log_scores(text)?;
        Ok(self.labels
            .iter()
            .zip(Self::posteriors(&scores))
            .map(|(stats, p)| (stats.label.clone(), p))
            .collect())
    }

    /// Splits the text into sentences and classifies each one separately
    pub fn classify_sentences<'a>(&self, text: &'a str) -> Result<Vec<(&'a str, String)>, ClassifierError> {
        split_sentences(text)
            .into_iter()
            .map(|sentence| Ok((sentence, self.classify(sentence)?)))
            .collect()
    }

    /// Fraction of the given examples whose label is predicted correctly
    pub fn accuracy(&self, test_set: &[LabeledExample]) -> Result<f64, ClassifierError> {
        if test_set.is_empty() {
            return Err(ClassifierError::ValidationError("Test set cannot be empty".into()));
        }
        let mut correct = 0usize;
        for example in test_set {
            if self.classify(&example.text)? == example.label {
                correct += 1;
            } else {
                debug!("Misclassified '{}' (expected '{}')", example.text, example.label);
            }
        }
        Ok(correct as f64 / test_set.len() as f64)
    }

    /// The `n` vocabulary words whose likelihood varies most across labels
    pub fn most_informative_features(&self, n: usize) -> Vec<InformativeFeature> {
        if self.labels.len() < 2 {
            warn!("Informative features need at least two labels");
            return Vec::new();
        }

        let mut features: Vec<InformativeFeature> = self.vocabulary
            .iter()
            .map(|word| {
                let likelihoods: Vec<f64> = self.labels
                    .iter()
                    .map(|stats| self.log_likelihood(stats, word))
                    .collect();
                let favored = Self::best_index(&likelihoods);
                let disfavored = likelihoods
                    .iter()
                    .enumerate()
                    .fold(0, |lowest, (i, l)| if *l < likelihoods[lowest] { i } else { lowest });
                InformativeFeature {
                    word: word.clone(),
                    favored: self.labels[favored].label.clone(),
                    disfavored: self.labels[disfavored].label.clone(),
                    ratio: (likelihoods[favored] - likelihoods[disfavored]).exp(),
                }
            })
            .collect();

        // Stable sort keeps alphabetical order among equal ratios
        features.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));
        features.truncate(n);
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_classifier() -> Classifier {
        Classifier::train(vec![
            LabeledExample::new("Slow internet.", "negative"),
            LabeledExample::new("Delicious food", "positive"),
            LabeledExample::new("Suboptimal experience", "negative"),
            LabeledExample::new("Very enjoyable time", "positive"),
            LabeledExample::new("delicious food.", "neg"),
        ])
        .expect("training succeeds")
    }

    #[test]
    fn test_class_info() {
        let classifier = review_classifier();
        let info = classifier.info();
        assert_eq!(info.num_labels, 3);
        assert_eq!(info.num_documents, 5);
        assert_eq!(info.vocabulary_size, 9);
        assert_eq!(info.label_documents["negative"], 2);
    }

    #[test]
    fn test_smoothed_scores_match_hand_computation() {
        let classifier = Classifier::train(vec![
            LabeledExample::new("Slow internet.", "negative"),
            LabeledExample::new("Delicious food", "positive"),
        ])
        .unwrap();
        // |V| = 4, each label has 2 words: P(w|own) = 2/6, P(w|other) = 1/6
        let scores = classifier.log_scores("Slow internet").unwrap();
        let expected_negative = 0.5f64.ln() + 2.0 * (2.0f64 / 6.0).ln();
        let expected_positive = 0.5f64.ln() + 2.0 * (1.0f64 / 6.0).ln();
        assert!((scores[0] - expected_negative).abs() < 1e-12);
        assert!((scores[1] - expected_positive).abs() < 1e-12);
    }

    #[test]
    fn test_ties_go_to_first_label() {
        assert_eq!(Classifier::best_index(&[-1.0, -1.0, -1.0]), 0);
        assert_eq!(Classifier::best_index(&[-2.0, -1.0, -1.0]), 1);
    }

    #[test]
    fn test_posteriors_sum_to_one() {
        let classifier = review_classifier();
        let (label, probabilities) = classifier.predict("Very slow internet").unwrap();
        assert_eq!(label, "negative");
        let sum: f64 = probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probabilities["negative"] > probabilities["positive"]);
    }

    #[test]
    fn test_prob_classify_follows_label_order() {
        let classifier = review_classifier();
        let labels: Vec<String> = classifier
            .prob_classify("food")
            .unwrap()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["negative", "positive", "neg"]);
    }

    #[test]
    fn test_wordless_input_is_decided_by_priors() {
        let classifier = review_classifier();
        // "negative" and "positive" share the largest prior; the tie goes to the first label
        for text in ["", "  \t", "?!"] {
            assert_eq!(classifier.classify(text).unwrap(), "negative");
        }
        let probabilities = classifier.prob_classify("").unwrap();
        assert!((probabilities[0].1 - 0.4).abs() < 1e-9);
        assert!((probabilities[2].1 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_informative_features() {
        let classifier = review_classifier();
        let features = classifier.most_informative_features(3);
        assert_eq!(features.len(), 3);
        assert!(features.windows(2).all(|w| w[0].ratio >= w[1].ratio));
        assert!(features.iter().all(|f| f.ratio >= 1.0 && f.favored != f.disfavored));

        let single = Classifier::train(vec![LabeledExample::new("fine", "ok")]).unwrap();
        assert!(single.most_informative_features(5).is_empty());
    }

    #[test]
    fn test_validate_rejects_hollow_model() {
        let hollow = Classifier::from_parts(ClassifierConfig::default(), Vec::new(), BTreeSet::new(), 0);
        assert!(matches!(hollow.validate(), Err(ClassifierError::EmptyTrainingSet(_))));
        assert!(review_classifier().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_label_without_documents() {
        let mut model = review_classifier();
        model.documents -= model.labels[2].documents;
        model.labels[2].documents = 0;
        assert!(matches!(model.validate(), Err(ClassifierError::EmptyTrainingSet(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_labels() {
        let mut model = review_classifier();
        model.labels[2].label = "negative".to_string();
        assert!(matches!(model.validate(), Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_inconsistent_document_total() {
        let mut model = review_classifier();
        model.documents += 1;
        assert!(matches!(model.validate(), Err(ClassifierError::ValidationError(_))));
    }
}
