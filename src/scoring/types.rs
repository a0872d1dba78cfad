use serde::Serialize;

use crate::constants::{CANDIDATE_COUNT, GENERAL_INDEX, SPECIFIC_INDEX};

use super::error::ScoringError;

#[derive(Debug, Clone)]
/// One scoring request: raw image bytes plus the two descriptions.
pub struct ScoreRequest {
    image: Vec<u8>,
    specific_description: String,
    general_description: String,
}

impl ScoreRequest {
    pub fn new(
        image: impl Into<Vec<u8>>,
        specific_description: impl Into<String>,
        general_description: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            specific_description: specific_description.into(),
            general_description: general_description.into(),
        }
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn specific_description(&self) -> &str {
        &self.specific_description
    }

    pub fn general_description(&self) -> &str {
        &self.general_description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Ordered `[specific, general]` pair handed to the engine.
///
/// Never sorted or deduplicated; confidence is always read from the specific slot.
pub struct CandidateList<'a>([&'a str; CANDIDATE_COUNT]);

impl<'a> CandidateList<'a> {
    pub fn new(specific: &'a str, general: &'a str) -> Self {
        let mut slots = [""; CANDIDATE_COUNT];
        slots[SPECIFIC_INDEX] = specific;
        slots[GENERAL_INDEX] = general;
        Self(slots)
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.0
    }

    pub fn specific(&self) -> &'a str {
        self.0[SPECIFIC_INDEX]
    }

    pub fn general(&self) -> &'a str {
        self.0[GENERAL_INDEX]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Engine logits aligned with a [`CandidateList`]. Always finite.
pub struct LogitVector([f32; CANDIDATE_COUNT]);

impl LogitVector {
    pub fn new(specific: f32, general: f32) -> Result<Self, ScoringError> {
        Self::try_from(vec![specific, general])
    }

    pub fn specific(&self) -> f32 {
        self.0[SPECIFIC_INDEX]
    }

    pub fn general(&self) -> f32 {
        self.0[GENERAL_INDEX]
    }

    /// Softmax probability of the specific slot.
    pub fn confidence(&self) -> ConfidenceScore {
        let probs = softmax(&self.0.map(f64::from));
        ConfidenceScore(probs[SPECIFIC_INDEX].clamp(0.0, 1.0))
    }
}

impl TryFrom<Vec<f32>> for LogitVector {
    type Error = ScoringError;

    fn try_from(logits: Vec<f32>) -> Result<Self, Self::Error> {
        let got = logits.len();
        let values: [f32; CANDIDATE_COUNT] = logits.try_into().map_err(|_| {
            ScoringError::inference(format!(
                "engine returned {} logits for {} candidates",
                got, CANDIDATE_COUNT
            ))
        })?;

        if let Some(bad) = values.iter().find(|l| !l.is_finite()) {
            return Err(ScoringError::inference(format!(
                "engine returned non-finite logit {}",
                bad
            )));
        }

        Ok(Self(values))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
/// Probability in `[0, 1]` that the image matches the specific description.
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

/// Numerically stable softmax: shifts by the max logit before exponentiating.
///
/// Inputs must be finite.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
