//! Glue between the external dependency parser output, the aspect extractor
//! and the sentiment classifier.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{Classifier, ClassifierError};
use crate::extractor::{AspectExtractor, AspectRecord, ExtractionError, Sentence, TokenRecord};

/// One sentence as exported by the upstream parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub text: String,
    pub tokens: Vec<TokenRecord>,
}

/// Combined extraction and classification result for one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentence: String,
    pub aspect: String,
    pub description: String,
    /// `None` when there was no description to classify
    pub sentiment: Option<String>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Sentence {sentence}: {source}")]
    Extraction {
        sentence: usize,
        #[source]
        source: ExtractionError,
    },
    #[error("Sentence {sentence}: {source}")]
    Classification {
        sentence: usize,
        #[source]
        source: ClassifierError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Keep sentences that produced no description
    pub keep_empty: bool,
    /// Process sentences on the rayon thread pool
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn with_keep_empty(mut self, keep_empty: bool) -> Self {
        self.keep_empty = keep_empty;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

pub struct Pipeline {
    extractor: AspectExtractor,
    classifier: Classifier,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self::with_config(classifier, PipelineConfig::default())
    }

    pub fn with_config(classifier: Classifier, config: PipelineConfig) -> Self {
        Self {
            extractor: AspectExtractor::new(),
            classifier,
            config,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn process(&self, index: usize, sentence: &ParsedSentence) -> Result<SentimentRecord, PipelineError> {
        let parsed = Sentence::from_records(sentence.tokens.clone())
            .map_err(|source| PipelineError::Extraction { sentence: index, source })?;
        let AspectRecord { aspect, description } = self.extractor.extract(&parsed);

        let sentiment = if description.is_empty() {
            None
        } else {
            let label = self.classifier
                .classify(&description)
                .map_err(|source| PipelineError::Classification { sentence: index, source })?;
            Some(label)
        };
        debug!("Sentence {}: aspect '{}', description '{}', sentiment {:?}", index, aspect, description, sentiment);

        Ok(SentimentRecord {
            sentence: sentence.text.clone(),
            aspect,
            description,
            sentiment,
        })
    }

    /// Runs extraction and classification over every sentence.
    ///
    /// The first malformed sentence aborts the run; records without a
    /// description are dropped unless `keep_empty` is set.
    pub fn analyze(&self, sentences: &[ParsedSentence]) -> Result<Vec<SentimentRecord>, PipelineError> {
        info!("Analyzing {} sentences (parallel: {})", sentences.len(), self.config.parallel);
        let records: Vec<SentimentRecord> = if self.config.parallel {
            sentences
                .par_iter()
                .enumerate()
                .map(|(i, s)| self.process(i, s))
                .collect::<Result<_, _>>()?
        } else {
            sentences
                .iter()
                .enumerate()
                .map(|(i, s)| self.process(i, s))
                .collect::<Result<_, _>>()?
        };

        let total = records.len();
        let kept: Vec<SentimentRecord> = records
            .into_iter()
            .filter(|r| self.config.keep_empty || r.sentiment.is_some())
            .collect();
        info!("Produced {} records ({} without a description dropped)", kept.len(), total - kept.len());
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabeledExample;

    fn classifier() -> Classifier {
        Classifier::train(vec![
            LabeledExample::new("Slow internet.", "negative"),
            LabeledExample::new("Delicious food", "positive"),
        ])
        .unwrap()
    }

    fn internet_was_slow() -> ParsedSentence {
        ParsedSentence {
            text: "The internet was slow.".to_string(),
            tokens: vec![
                TokenRecord::new("The", "DET", "det", 1, vec![]),
                TokenRecord::new("internet", "NOUN", "nsubj", 2, vec![0]),
                TokenRecord::new("was", "AUX", "ROOT", 2, vec![1, 3, 4]),
                TokenRecord::new("slow", "ADJ", "acomp", 2, vec![]),
                TokenRecord::new(".", "PUNCT", "punct", 2, vec![]),
            ],
        }
    }

    fn it_rained() -> ParsedSentence {
        ParsedSentence {
            text: "It rained".to_string(),
            tokens: vec![
                TokenRecord::new("It", "PRON", "expl", 1, vec![]),
                TokenRecord::new("rained", "VERB", "ROOT", 1, vec![0]),
            ],
        }
    }

    #[test]
    fn test_analyze_end_to_end() {
        let pipeline = Pipeline::new(classifier());
        let records = pipeline.analyze(&[internet_was_slow(), it_rained()]).unwrap();
        assert_eq!(
            records,
            vec![SentimentRecord {
                sentence: "The internet was slow.".to_string(),
                aspect: "internet".to_string(),
                description: "slow".to_string(),
                sentiment: Some("negative".to_string()),
            }]
        );
    }

    #[test]
    fn test_keep_empty_records() {
        let config = PipelineConfig::default().with_keep_empty(true);
        let pipeline = Pipeline::with_config(classifier(), config);
        let records = pipeline.analyze(&[it_rained()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentiment, None);
        assert_eq!(records[0].aspect, "");
    }

    #[test]
    fn test_malformed_sentence_aborts() {
        let mut broken = it_rained();
        broken.tokens[1].pos = None;
        let pipeline = Pipeline::new(classifier());
        let err = pipeline.analyze(&[internet_was_slow(), broken]).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction { sentence: 1, .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sentences: Vec<ParsedSentence> = (0..32)
            .map(|i| if i % 3 == 0 { it_rained() } else { internet_was_slow() })
            .collect();
        let sequential = Pipeline::new(classifier()).analyze(&sentences).unwrap();
        let parallel = Pipeline::with_config(classifier(), PipelineConfig::default().with_parallel(true))
            .analyze(&sentences)
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
