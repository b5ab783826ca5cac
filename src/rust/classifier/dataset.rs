use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A phrase with its sentiment label. Labels form an open set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub label: String,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

impl<T: Into<String>, L: Into<String>> From<(T, L)> for LabeledExample {
    fn from((text, label): (T, L)) -> Self {
        Self::new(text, label)
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported training data format '{0}', expected .csv or .json")]
    UnsupportedFormat(String),
}

/// Reads `text,label` rows without a header line.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LabeledExample>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut examples = Vec::new();
    for row in reader.deserialize() {
        let (text, label): (String, String) = row?;
        examples.push(LabeledExample::new(text, label));
    }
    Ok(examples)
}

/// Reads a JSON array of `{"text": ..., "label": ...}` objects.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<LabeledExample>, DatasetError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Loads training examples, choosing the format from the file extension.
pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledExample>, DatasetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let examples = match extension.as_str() {
        "csv" => read_csv(BufReader::new(File::open(path)?))?,
        "json" => read_json(BufReader::new(File::open(path)?))?,
        _ => return Err(DatasetError::UnsupportedFormat(path.display().to_string())),
    };
    info!("Loaded {} training examples from {:?}", examples.len(), path);
    Ok(examples)
}
