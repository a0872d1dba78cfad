use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::embedding::EmbeddingEngine;
use crate::scoring::ConfidenceScorer;

/// Shared, read-only state handed to every request.
pub struct HandlerState<E: EmbeddingEngine + 'static> {
    pub scorer: Arc<ConfidenceScorer<E>>,

    /// Max time a request waits for inference. `None` waits forever.
    pub inference_timeout: Option<Duration>,

    /// Max accepted request body. `None` disables the limit.
    pub max_payload_bytes: Option<usize>,
}

impl<E: EmbeddingEngine + 'static> Clone for HandlerState<E> {
    fn clone(&self) -> Self {
        Self {
            scorer: Arc::clone(&self.scorer),
            inference_timeout: self.inference_timeout,
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}

impl<E: EmbeddingEngine + 'static> HandlerState<E> {
    /// State with no timeout and no payload limit.
    pub fn new(scorer: Arc<ConfidenceScorer<E>>) -> Self {
        Self {
            scorer,
            inference_timeout: None,
            max_payload_bytes: None,
        }
    }

    /// State with limits taken from `config`.
    pub fn from_config(scorer: Arc<ConfidenceScorer<E>>, config: &Config) -> Self {
        Self {
            scorer,
            inference_timeout: config.inference_timeout,
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = Some(timeout);
        self
    }

    pub fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = Some(limit);
        self
    }
}
