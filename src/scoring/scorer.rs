use image::DynamicImage;
use tracing::{debug, info};

use crate::embedding::EmbeddingEngine;

use super::error::ScoringError;
use super::types::{CandidateList, ConfidenceScore, LogitVector, ScoreRequest};

/// Scores how well an image matches a specific description relative to a general one.
///
/// The engine is injected at construction and only ever read.
pub struct ConfidenceScorer<E: EmbeddingEngine> {
    engine: E,
}

impl<E: EmbeddingEngine> std::fmt::Debug for ConfidenceScorer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceScorer")
            .field("engine_stub", &self.engine.is_stub())
            .finish()
    }
}

impl<E: EmbeddingEngine> ConfidenceScorer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Consumes the scorer and hands the engine back for teardown.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Decodes `image`, runs one engine call over `[specific, general]`, and
    /// returns the softmax mass of the specific description.
    ///
    /// Equal or empty descriptions go through the same path; nothing is cached
    /// and engine failures are not retried.
    pub fn score(
        &self,
        image: &[u8],
        specific_description: &str,
        general_description: &str,
    ) -> Result<ConfidenceScore, ScoringError> {
        let image = decode_image(image)?;
        let candidates = CandidateList::new(specific_description, general_description);

        debug!(
            width = image.width(),
            height = image.height(),
            specific_len = specific_description.len(),
            general_len = general_description.len(),
            "Scoring image against candidates"
        );

        let raw = self
            .engine
            .similarity_logits(&image, candidates.as_slice())?;
        let logits = LogitVector::try_from(raw)?;
        let confidence = logits.confidence();

        info!(
            specific_logit = logits.specific(),
            general_logit = logits.general(),
            confidence = confidence.value(),
            "Analysis for specific description: {}",
            confidence
        );

        Ok(confidence)
    }

    pub fn score_request(&self, request: &ScoreRequest) -> Result<ConfidenceScore, ScoringError> {
        self.score(
            request.image(),
            request.specific_description(),
            request.general_description(),
        )
    }
}

/// Decodes raw bytes into a raster image, guessing the format from its magic bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ScoringError> {
    if bytes.is_empty() {
        return Err(ScoringError::undecodable_image("image data is empty"));
    }

    image::load_from_memory(bytes)
        .map_err(|e| ScoringError::undecodable_image(format!("cannot identify image: {}", e)))
}
