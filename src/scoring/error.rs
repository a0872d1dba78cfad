use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Why a request was rejected before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputKind {
    /// A required field was absent.
    MissingField,
    /// The image bytes are not a decodable raster image.
    UndecodableImage,
}

impl InvalidInputKind {
    /// Stable snake_case name (used in logs and the status header).
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidInputKind::MissingField => "missing_field",
            InvalidInputKind::UndecodableImage => "undecodable_image",
        }
    }
}

impl std::fmt::Display for InvalidInputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid input ({kind}): {reason}")]
    InvalidInput {
        kind: InvalidInputKind,
        reason: String,
    },

    #[error("inference failed: {message}")]
    Inference { message: String },
}

impl ScoringError {
    pub fn missing_field(field: &str) -> Self {
        ScoringError::InvalidInput {
            kind: InvalidInputKind::MissingField,
            reason: format!("missing field `{}`", field),
        }
    }

    pub fn undecodable_image(reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            kind: InvalidInputKind::UndecodableImage,
            reason: reason.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        ScoringError::Inference {
            message: message.into(),
        }
    }

    /// Returns the invalid-input kind, if this is an input error.
    pub fn invalid_input_kind(&self) -> Option<InvalidInputKind> {
        match self {
            ScoringError::InvalidInput { kind, .. } => Some(*kind),
            ScoringError::Inference { .. } => None,
        }
    }
}

impl From<EmbeddingError> for ScoringError {
    fn from(err: EmbeddingError) -> Self {
        ScoringError::Inference {
            message: err.to_string(),
        }
    }
}
