use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError};

#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("Model not found: {0}")]
    NotFound(String),
    #[error("Invalid model name: '{0}'")]
    InvalidName(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Hash mismatch for model '{name}': expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Stored model is invalid: {0}")]
    InvalidModel(#[from] ClassifierError),
}

/// Saves trained classifiers to disk and loads them back, verifying a
/// SHA-256 checksum on every load.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    /// Creates a new ModelStore with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    ///
    /// `ASPECTRA_CACHE` wins over the platform cache directory, then `~/.cache`,
    /// then the temp directory.
    pub fn get_default_models_dir() -> PathBuf {
        if let Ok(path) = env::var("ASPECTRA_CACHE") {
            return PathBuf::from(path).join("models");
        }
        dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .unwrap_or_else(env::temp_dir)
            .join("aspectra")
            .join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self { models_dir })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.json")
    }

    pub fn get_checksum_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.sha256")
    }

    fn check_name(name: &str) -> Result<(), ModelStoreError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(())
        } else {
            Err(ModelStoreError::InvalidName(name.to_string()))
        }
    }

    fn hash_bytes(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn exists(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        let checksum_path = self.get_checksum_path(name);
        log::debug!("Checking if model '{}' exists at {:?}", name, model_path);
        model_path.exists() && checksum_path.exists()
    }

    /// Serializes the classifier and writes it with its checksum
    pub fn save(&self, name: &str, classifier: &Classifier) -> Result<PathBuf, ModelStoreError> {
        Self::check_name(name)?;
        let model_dir = self.models_dir.join(name);
        log::info!("Saving model '{}' to {:?}", name, model_dir);
        fs::create_dir_all(&model_dir)?;

        let bytes = serde_json::to_vec(classifier)?;
        let hash = Self::hash_bytes(&bytes);
        let model_path = self.get_model_path(name);
        fs::write(&model_path, &bytes)?;
        fs::write(self.get_checksum_path(name), &hash)?;
        log::info!("Wrote {} bytes (sha256 {})", bytes.len(), hash);
        Ok(model_path)
    }

    /// Returns whether the stored model still matches its checksum
    pub fn verify(&self, name: &str) -> Result<bool, ModelStoreError> {
        Self::check_name(name)?;
        if !self.exists(name) {
            return Ok(false);
        }
        let bytes = fs::read(self.get_model_path(name))?;
        let expected = fs::read_to_string(self.get_checksum_path(name))?;
        Ok(Self::hash_bytes(&bytes) == expected.trim())
    }

    /// Loads a previously saved classifier, rejecting files whose checksum
    /// does not match
    pub fn load(&self, name: &str) -> Result<Classifier, ModelStoreError> {
        Self::check_name(name)?;
        if !self.exists(name) {
            return Err(ModelStoreError::NotFound(name.to_string()));
        }

        let model_path = self.get_model_path(name);
        log::info!("Loading model '{}' from {:?}", name, model_path);
        let bytes = fs::read(&model_path)?;
        let expected = fs::read_to_string(self.get_checksum_path(name))?.trim().to_string();
        let actual = Self::hash_bytes(&bytes);
        if actual != expected {
            log::error!("Model '{}' hash mismatch: expected {}, got {}", name, expected, actual);
            return Err(ModelStoreError::HashMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }

        let classifier: Classifier = serde_json::from_slice(&bytes)?;
        classifier.validate()?;
        log::info!("Model '{}' loaded with {} labels", name, classifier.info().num_labels);
        Ok(classifier)
    }

    pub fn remove(&self, name: &str) -> Result<(), ModelStoreError> {
        Self::check_name(name)?;
        let model_dir = self.models_dir.join(name);
        if model_dir.exists() {
            fs::remove_dir_all(&model_dir)?;
        }
        Ok(())
    }
}
