//! Prism library crate (used by the server binary and integration tests).
//!
//! Prism answers one question over HTTP: given an image, a specific description
//! and a general description, how strongly does the image favor the specific one?
//! CLIP logits for both descriptions are softmaxed and the specific probability
//! is returned as the confidence.
//!
//! ## Modules
//! - [`config`] - Environment-driven server configuration
//! - [`embedding`] - CLIP engine, device selection and the [`EmbeddingEngine`] seam
//! - [`scoring`] - Confidence computation ([`ConfidenceScorer`], [`softmax`])
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! [`MockEngine`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use constants::{
    CANDIDATE_COUNT, CLIP_IMAGE_SIZE, CLIP_MAX_SEQ_LEN, MISSING_DATA_MESSAGE, PRISM_STATUS_HEADER,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEngine;
pub use embedding::{ClipEngine, ClipEngineConfig, EmbeddingEngine, EmbeddingError};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use scoring::{
    ConfidenceScore, ConfidenceScorer, InvalidInputKind, LogitVector, ScoreRequest, ScoringError,
    softmax,
};
