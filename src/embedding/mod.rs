//! Joint image/text encoders.
//!
//! - [`EmbeddingEngine`] is the seam the scorer depends on.
//! - [`clip`] provides the CLIP ViT-B/32 engine (plus a deterministic stub mode).
//! - [`MockEngine`] is available behind `cfg(any(test, feature = "mock"))`.

/// CLIP engine.
pub mod clip;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// Tokenizer loading helpers.
pub mod utils;

pub use clip::{ClipEngine, ClipEngineConfig};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEngine;

use image::DynamicImage;

/// A pretrained encoder that places images and texts in a shared space.
///
/// Implementations must be safe to call concurrently: one engine is built at
/// startup and shared by every in-flight request.
pub trait EmbeddingEngine: Send + Sync {
    /// Returns one unnormalized similarity logit per candidate, in candidate order.
    ///
    /// Logits are only comparable with each other for the same image.
    fn similarity_logits(
        &self,
        image: &DynamicImage,
        candidates: &[&str],
    ) -> Result<Vec<f32>, EmbeddingError>;

    /// Returns `true` if the engine produces synthetic logits (no model loaded).
    fn is_stub(&self) -> bool {
        false
    }
}

impl<E: EmbeddingEngine + ?Sized> EmbeddingEngine for std::sync::Arc<E> {
    fn similarity_logits(
        &self,
        image: &DynamicImage,
        candidates: &[&str],
    ) -> Result<Vec<f32>, EmbeddingError> {
        (**self).similarity_logits(image, candidates)
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}
