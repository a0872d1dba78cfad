use std::path::{Path, PathBuf};

use crate::constants::{CLIP_IMAGE_SIZE, CLIP_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

/// Weights file expected inside a model directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Tokenizer file expected inside a model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Clone)]
/// Configuration for [`ClipEngine`](super::ClipEngine).
pub struct ClipEngineConfig {
    /// Path to the safetensors weights (`openai/clip-vit-base-patch32` layout).
    pub weights_path: PathBuf,
    /// Path to `tokenizer.json`.
    pub tokenizer_path: PathBuf,
    /// Square input resolution fed to the vision tower.
    pub image_size: usize,
    /// Max text tokens per candidate.
    pub max_seq_len: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for ClipEngineConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::new(),
            tokenizer_path: PathBuf::new(),
            image_size: CLIP_IMAGE_SIZE,
            max_seq_len: CLIP_MAX_SEQ_LEN,
            testing_stub: false,
        }
    }
}

impl ClipEngineConfig {
    /// Creates a config for a model directory holding weights and tokenizer.
    pub fn new<P: AsRef<Path>>(model_dir: P) -> Self {
        let model_dir = model_dir.as_ref();
        Self {
            weights_path: model_dir.join(WEIGHTS_FILE),
            tokenizer_path: model_dir.join(TOKENIZER_FILE),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic logits).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.image_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "image_size must be greater than zero".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.weights_path.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "weights_path is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.weights_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.weights_path.clone(),
            });
        }

        if !self.tokenizer_available() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.tokenizer_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if the weights file exists.
    pub fn weights_available(&self) -> bool {
        !self.weights_path.as_os_str().is_empty() && self.weights_path.is_file()
    }

    /// Returns `true` if the tokenizer file exists.
    pub fn tokenizer_available(&self) -> bool {
        !self.tokenizer_path.as_os_str().is_empty() && self.tokenizer_path.is_file()
    }
}
