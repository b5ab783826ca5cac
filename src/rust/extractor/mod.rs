mod aspect;
mod error;
mod token;

pub use aspect::{AspectExtractor, AspectRecord};
pub use error::ExtractionError;
pub use token::{DependencyRelation, DependencyToken, PartOfSpeech, Sentence, TokenRecord};
