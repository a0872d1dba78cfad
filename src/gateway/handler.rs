use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::{
    FIELD_GENERAL_DESCRIPTION, FIELD_IMAGE, FIELD_SPECIFIC_DESCRIPTION, PRISM_STATUS_HEADER,
    PRISM_STATUS_OK,
};
use crate::embedding::EmbeddingEngine;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::AnalyzeResponse;
use crate::gateway::state::HandlerState;
use crate::scoring::{ConfidenceScore, ScoreRequest, ScoringError};

/// Fields collected from an `/analyze` multipart body.
#[derive(Debug, Default)]
pub(crate) struct AnalyzeForm {
    pub image: Option<Vec<u8>>,
    pub specific_description: Option<String>,
    pub general_description: Option<String>,
}

impl AnalyzeForm {
    /// Names of required fields that were not supplied.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.image.is_none() {
            missing.push(FIELD_IMAGE);
        }
        if self.specific_description.is_none() {
            missing.push(FIELD_SPECIFIC_DESCRIPTION);
        }
        if self.general_description.is_none() {
            missing.push(FIELD_GENERAL_DESCRIPTION);
        }
        missing
    }

    /// Converts into a [`ScoreRequest`], or a `MissingField` error naming the
    /// first absent field.
    pub fn into_request(self) -> Result<ScoreRequest, ScoringError> {
        let missing = self.missing_fields();
        match (
            self.image,
            self.specific_description,
            self.general_description,
        ) {
            (Some(image), Some(specific), Some(general)) => {
                Ok(ScoreRequest::new(image, specific, general))
            }
            _ => {
                debug!(missing = ?missing, "Rejecting request with missing fields");
                Err(ScoringError::missing_field(
                    missing.first().copied().unwrap_or(FIELD_IMAGE),
                ))
            }
        }
    }
}

/// Reads the multipart body.
///
/// `image` only counts when sent as a file part; the descriptions only count
/// when sent as plain form fields. The first occurrence of a field wins and
/// unknown fields are ignored.
pub(crate) async fn read_analyze_form(
    mut multipart: Multipart,
) -> Result<AnalyzeForm, GatewayError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(GatewayError::from_multipart)?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let is_file = field.file_name().is_some();

        match name.as_str() {
            FIELD_IMAGE if is_file && form.image.is_none() => {
                let bytes = field.bytes().await.map_err(GatewayError::from_multipart)?;
                form.image = Some(bytes.to_vec());
            }
            FIELD_SPECIFIC_DESCRIPTION if !is_file && form.specific_description.is_none() => {
                form.specific_description = Some(read_text_field(field).await?);
            }
            FIELD_GENERAL_DESCRIPTION if !is_file && form.general_description.is_none() => {
                form.general_description = Some(read_text_field(field).await?);
            }
            _ => {
                debug!(field = %name, is_file, "Ignoring multipart field");
            }
        }
    }

    Ok(form)
}

/// Reads a text part as strict UTF-8.
async fn read_text_field(field: Field<'_>) -> Result<String, GatewayError> {
    let name = field.name().unwrap_or_default().to_owned();
    let bytes = field.bytes().await.map_err(GatewayError::from_multipart)?;

    String::from_utf8(bytes.to_vec()).map_err(|e| {
        GatewayError::InvalidRequest(format!("field `{}` is not valid UTF-8: {}", name, e))
    })
}

#[instrument(skip(state, multipart))]
pub async fn analyze_handler<E>(
    State(state): State<HandlerState<E>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError>
where
    E: EmbeddingEngine + 'static,
{
    // A body that is not multipart at all carries none of the fields.
    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Request is not multipart");
        ScoringError::missing_field(FIELD_IMAGE)
    })?;

    let request = read_analyze_form(multipart).await?.into_request()?;

    debug!(
        image_bytes = request.image().len(),
        specific_len = request.specific_description().len(),
        general_len = request.general_description().len(),
        "Analyze request received"
    );

    let confidence = run_scoring(&state, request).await?;
    Ok(make_response(confidence))
}

/// Runs the blocking scorer off the async runtime, honoring the optional timeout.
///
/// A timed-out inference keeps running on the blocking pool; only the request
/// stops waiting for it.
pub(crate) async fn run_scoring<E>(
    state: &HandlerState<E>,
    request: ScoreRequest,
) -> Result<ConfidenceScore, GatewayError>
where
    E: EmbeddingEngine + 'static,
{
    let scorer = Arc::clone(&state.scorer);
    let task = tokio::task::spawn_blocking(move || scorer.score_request(&request));

    let joined = match state.inference_timeout {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            ScoringError::inference(format!("inference timed out after {} ms", limit.as_millis()))
        })?,
        None => task.await,
    };

    let confidence = joined
        .map_err(|e| ScoringError::inference(format!("inference task failed: {}", e)))??;

    Ok(confidence)
}

pub fn make_response(confidence: ConfidenceScore) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(PRISM_STATUS_HEADER, HeaderValue::from_static(PRISM_STATUS_OK));

    (StatusCode::OK, headers, Json(AnalyzeResponse { confidence })).into_response()
}
