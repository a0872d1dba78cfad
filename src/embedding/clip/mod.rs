//! CLIP ViT-B/32 engine (safetensors + tokenizer).
//!
//! Use [`ClipEngineConfig::stub`] for tests/examples without model files.

/// CLIP engine configuration.
pub mod config;
/// Image preprocessing.
pub mod preprocess;


pub use config::{ClipEngineConfig, TOKENIZER_FILE, WEIGHTS_FILE};

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use image::DynamicImage;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::{CLIP_LOGIT_SCALE, CLIP_PAD_TOKEN};
use crate::embedding::EmbeddingEngine;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{load_tokenizer_with_truncation, pad_sequences};

enum EngineBackend {
    Model {
        model: ClipModel,
        tokenizer: Tokenizer,
        pad_id: u32,
        device: Device,
    },
    Stub,
}

/// Image/text similarity engine backed by CLIP (supports stub mode).
///
/// The model is immutable after load, so a single instance serves concurrent
/// requests without locking.
pub struct ClipEngine {
    backend: EngineBackend,
    config: ClipEngineConfig,
}

impl std::fmt::Debug for ClipEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipEngine")
            .field(
                "backend",
                &match &self.backend {
                    EngineBackend::Model { device, .. } => {
                        format!("Model({})", device_label(device))
                    }
                    EngineBackend::Stub => "Stub".to_string(),
                },
            )
            .field("image_size", &self.config.image_size)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl ClipEngine {
    /// Loads the engine from a config (stub mode is supported).
    pub fn load(config: ClipEngineConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("CLIP engine running in STUB mode (synthetic logits)");
            return Ok(Self {
                backend: EngineBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for CLIP");

        let (model, tokenizer, pad_id) = Self::load_model(&config, &device)?;

        info!(
            weights_path = %config.weights_path.display(),
            image_size = config.image_size,
            max_seq_len = config.max_seq_len,
            device = device_label(&device),
            "CLIP model loaded"
        );

        Ok(Self {
            backend: EngineBackend::Model {
                model,
                tokenizer,
                pad_id,
                device,
            },
            config,
        })
    }

    /// Shorthand for `ClipEngine::load(ClipEngineConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(ClipEngineConfig::stub())
    }

    fn load_model(
        config: &ClipEngineConfig,
        device: &Device,
    ) -> Result<(ClipModel, Tokenizer, u32), EmbeddingError> {
        let tokenizer = load_tokenizer_with_truncation(&config.tokenizer_path, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        let pad_id = tokenizer.token_to_id(CLIP_PAD_TOKEN).ok_or_else(|| {
            EmbeddingError::InvalidConfig {
                reason: format!("tokenizer has no {} token", CLIP_PAD_TOKEN),
            }
        })?;

        let model_config = ClipConfig::vit_base_patch32();
        if model_config.vision_config.image_size != config.image_size {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "image_size ({}) does not match the ViT-B/32 input size ({})",
                    config.image_size, model_config.vision_config.image_size
                ),
            });
        }

        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&config.weights_path], DType::F32, device)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to map safetensors: {}", e),
        })?;

        let model =
            ClipModel::new(vb, &model_config).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to build CLIP model: {}", e),
            })?;

        Ok((model, tokenizer, pad_id))
    }

    fn logits_with_model(
        &self,
        image: &DynamicImage,
        candidates: &[&str],
        model: &ClipModel,
        tokenizer: &Tokenizer,
        pad_id: u32,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let size = self.config.image_size;
        let pixels = preprocess::pixel_values(image, size);
        let pixel_values = Tensor::from_vec(pixels, (3, size, size), device)?.unsqueeze(0)?;

        let input_ids = self.encode_candidates(candidates, tokenizer, pad_id, device)?;

        debug!(
            candidates = candidates.len(),
            seq_len = input_ids.dim(1)?,
            "Running CLIP forward pass"
        );

        // logits_per_image: [1, n_candidates]
        let (_logits_per_text, logits_per_image) = model
            .forward(&pixel_values, &input_ids)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("CLIP forward pass failed: {}", e),
            })?;

        let logits = logits_per_image.i(0)?.to_vec1::<f32>()?;
        if logits.len() != candidates.len() {
            return Err(EmbeddingError::OutputMismatch {
                expected: candidates.len(),
                got: logits.len(),
            });
        }

        Ok(logits)
    }

    fn encode_candidates(
        &self,
        candidates: &[&str],
        tokenizer: &Tokenizer,
        pad_id: u32,
        device: &Device,
    ) -> Result<Tensor, EmbeddingError> {
        let rows = candidates
            .iter()
            .map(|text| {
                tokenizer
                    .encode(*text, true)
                    .map(|encoding| encoding.get_ids().to_vec())
                    .map_err(|e| EmbeddingError::TokenizationFailed {
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (rows, width) = pad_sequences(rows, pad_id);
        let flat: Vec<u32> = rows.into_iter().flatten().collect();

        Ok(Tensor::from_vec(flat, (candidates.len(), width), device)?)
    }

    fn logits_stub(&self, image: &DynamicImage, candidates: &[&str]) -> Vec<f32> {
        let image_digest = preprocess::image_digest(image);

        debug!(candidates = candidates.len(), "Generating stub logits");

        candidates
            .iter()
            .map(|text| {
                let mut hasher = blake3::Hasher::new();
                hasher.update(image_digest.as_bytes());
                hasher.update(text.as_bytes());
                let digest = hasher.finalize();

                let mut word = [0u8; 8];
                word.copy_from_slice(&digest.as_bytes()[..8]);
                let unit = (u64::from_le_bytes(word) >> 11) as f64 / (1u64 << 53) as f64;

                // Pseudo cosine similarity in the range CLIP typically reports.
                let cosine = 0.10 + 0.25 * unit;
                (cosine as f32) * CLIP_LOGIT_SCALE
            })
            .collect()
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EngineBackend::Stub)
    }
}

impl EmbeddingEngine for ClipEngine {
    fn similarity_logits(
        &self,
        image: &DynamicImage,
        candidates: &[&str],
    ) -> Result<Vec<f32>, EmbeddingError> {
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EngineBackend::Model {
                model,
                tokenizer,
                pad_id,
                device,
            } => self.logits_with_model(image, candidates, model, tokenizer, *pad_id, device),
            EngineBackend::Stub => Ok(self.logits_stub(image, candidates)),
        }
    }

    fn is_stub(&self) -> bool {
        ClipEngine::is_stub(self)
    }
}
