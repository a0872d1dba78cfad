//! Contextual confidence scoring.
//!
//! Given an image and two descriptions, [`ConfidenceScorer`] asks the
//! [`EmbeddingEngine`](crate::embedding::EmbeddingEngine) for one logit per
//! description and softmax-normalizes the pair.
//!
//! # Candidate order
//!
//! The candidate list is always `[specific, general]` and the returned
//! confidence is always the probability of index 0. Swapping the two
//! descriptions returns the complementary probability; identical descriptions
//! are still sent to the engine as two entries.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::{InvalidInputKind, ScoringError};
pub use scorer::{ConfidenceScorer, decode_image};
pub use types::{CandidateList, ConfidenceScore, LogitVector, ScoreRequest, softmax};
