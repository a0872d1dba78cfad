use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use image::DynamicImage;

use crate::embedding::{EmbeddingEngine, EmbeddingError};

enum MockBehavior {
    Fixed(Vec<f32>),
    PerText {
        logits: HashMap<String, f32>,
        default: f32,
    },
    Fail(String),
}

/// Scriptable engine for tests: fixed or per-text logits, or a forced failure.
///
/// Records every candidate list it receives.
pub struct MockEngine {
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockEngine {
    /// Always returns `logits`, whatever the candidates are.
    pub fn with_logits(logits: Vec<f32>) -> Self {
        Self::from_behavior(MockBehavior::Fixed(logits))
    }

    /// Looks each candidate up in `logits`, falling back to `default`.
    pub fn per_text(logits: &[(&str, f32)], default: f32) -> Self {
        Self::from_behavior(MockBehavior::PerText {
            logits: logits
                .iter()
                .map(|(text, logit)| (text.to_string(), *logit))
                .collect(),
            default,
        })
    }

    /// Fails every call with `InferenceFailed { reason }`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::from_behavior(MockBehavior::Fail(reason.into()))
    }

    /// Sleeps for `delay` before answering (blocks the calling thread).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn from_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of `similarity_logits` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Candidate lists received, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl EmbeddingEngine for MockEngine {
    fn similarity_logits(
        &self,
        _image: &DynamicImage,
        candidates: &[&str],
    ) -> Result<Vec<f32>, EmbeddingError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(candidates.iter().map(|c| c.to_string()).collect());
        }

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match &self.behavior {
            MockBehavior::Fixed(logits) => Ok(logits.clone()),
            MockBehavior::PerText { logits, default } => Ok(candidates
                .iter()
                .map(|c| logits.get(*c).copied().unwrap_or(*default))
                .collect()),
            MockBehavior::Fail(reason) => Err(EmbeddingError::InferenceFailed {
                reason: reason.clone(),
            }),
        }
    }
}
