use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::ExtractionError;
use super::token::{DependencyRelation, DependencyToken, PartOfSpeech, Sentence, TokenRecord};

/// The opinion target of a sentence and the words describing it.
///
/// Empty strings mean "nothing found", which is a valid result and not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRecord {
    pub aspect: String,
    pub description: String,
}

impl AspectRecord {
    pub fn new(aspect: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            aspect: aspect.into(),
            description: description.into(),
        }
    }

    pub fn has_aspect(&self) -> bool {
        !self.aspect.is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_aspect() && !self.has_description()
    }

    /// Folds one token into the accumulator. Later matches replace earlier ones.
    fn absorb(mut self, sentence: &Sentence, index: usize, token: &DependencyToken) -> Self {
        if token.pos == PartOfSpeech::Noun && token.dep == DependencyRelation::Nsubj {
            self.aspect = token.text.clone();
        }
        if token.pos == PartOfSpeech::Adj {
            let prepend: String = sentence
                .children_of(index)
                .filter(|child| child.pos == PartOfSpeech::Adv)
                .map(|child| format!("{} ", child.text))
                .collect();
            self.description = prepend + &token.text;
        }
        self
    }
}

/// Rule-based extractor pairing the nominal subject of a sentence with the
/// adjective (and its adverb intensifiers) describing it.
///
/// Extraction is a pure function of the sentence, so one extractor can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectExtractor;

impl AspectExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts at most one aspect/description pair from a validated sentence.
    ///
    /// The last `NOUN`/`nsubj` token becomes the aspect and the last `ADJ` token
    /// becomes the description, prefixed by its `ADV` children in child order.
    pub fn extract(&self, sentence: &Sentence) -> AspectRecord {
        let record = sentence
            .tokens()
            .iter()
            .enumerate()
            .fold(AspectRecord::default(), |acc, (index, token)| {
                acc.absorb(sentence, index, token)
            });
        debug!(
            "Extracted aspect '{}' / description '{}' from '{}'",
            record.aspect,
            record.description,
            sentence.text()
        );
        record
    }

    /// Validates raw parser output and extracts from it.
    pub fn extract_records(&self, records: &[TokenRecord]) -> Result<AspectRecord, ExtractionError> {
        let sentence = Sentence::from_records(records.to_vec())?;
        Ok(self.extract(&sentence))
    }

    pub fn extract_all(&self, sentences: &[Sentence]) -> Vec<AspectRecord> {
        sentences.iter().map(|sentence| self.extract(sentence)).collect()
    }

    /// Same as [`extract_all`](Self::extract_all) but spread over the rayon pool.
    /// Output order matches input order.
    pub fn extract_all_parallel(&self, sentences: &[Sentence]) -> Vec<AspectRecord> {
        sentences.par_iter().map(|sentence| self.extract(sentence)).collect()
    }
}
