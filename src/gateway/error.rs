use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::constants::{
    MISSING_DATA_MESSAGE, PRISM_STATUS_HEADER, PRISM_STATUS_INFERENCE_ERROR,
    PRISM_STATUS_INVALID_REQUEST, PRISM_STATUS_UNDECODABLE_IMAGE,
};
use crate::scoring::{InvalidInputKind, ScoringError};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl GatewayError {
    /// Maps a multipart read failure, keeping the framework's 413 for oversized bodies.
    pub fn from_multipart(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge(err.body_text())
        } else {
            GatewayError::InvalidRequest(err.body_text())
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Scoring(ScoringError::InvalidInput { kind, .. }) => match kind {
                InvalidInputKind::MissingField => StatusCode::BAD_REQUEST,
                // Decode failures are reported like inference failures on the wire.
                InvalidInputKind::UndecodableImage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::Scoring(ScoringError::Inference { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn prism_status(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::PayloadTooLarge(_) => {
                PRISM_STATUS_INVALID_REQUEST
            }
            GatewayError::Scoring(ScoringError::InvalidInput { kind, .. }) => match kind {
                InvalidInputKind::MissingField => PRISM_STATUS_INVALID_REQUEST,
                InvalidInputKind::UndecodableImage => PRISM_STATUS_UNDECODABLE_IMAGE,
            },
            GatewayError::Scoring(ScoringError::Inference { .. }) => PRISM_STATUS_INFERENCE_ERROR,
        }
    }

    /// Text for the `error` body field.
    ///
    /// Every missing field is reported with the same fixed message; which field
    /// was absent only goes to the log.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Scoring(err)
                if err.invalid_input_kind() == Some(InvalidInputKind::MissingField) =>
            {
                MISSING_DATA_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let prism_status = self.prism_status();
        let detail = self.to_string();
        let error_message = self.client_message();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %detail, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(PRISM_STATUS_HEADER, HeaderValue::from_static(prism_status));

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, headers, body).into_response()
    }
}
