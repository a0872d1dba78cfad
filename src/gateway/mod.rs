//! HTTP gateway (Axum) for confidence scoring.
//!
//! - `POST /analyze` scores a multipart upload (see [`handler::analyze_handler`]).
//! - `GET /healthz` is a liveness probe.
//! - `GET /ready` reports the engine mode.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::analyze_handler;
pub use state::HandlerState;

use crate::constants::{PRISM_STATUS_HEADER, PRISM_STATUS_OK, PRISM_STATUS_READY};
use crate::embedding::EmbeddingEngine;

pub fn create_router_with_state<E>(state: HandlerState<E>) -> Router
where
    E: EmbeddingEngine + 'static,
{
    // Unset means unbounded, including axum's built-in 2 MiB default.
    let body_limit = match state.max_payload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E>))
        .route("/analyze", post(analyze_handler::<E>))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub engine: &'static str,
    pub engine_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(PRISM_STATUS_HEADER, HeaderValue::from_static(PRISM_STATUS_OK));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: PRISM_STATUS_OK,
        }),
    )
        .into_response()
}

/// The engine is loaded before the listener binds, so a serving process is ready.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E>(State(state): State<HandlerState<E>>) -> Response
where
    E: EmbeddingEngine + 'static,
{
    let engine_mode = if state.scorer.engine().is_stub() {
        "stub"
    } else {
        "model"
    };

    let components = ComponentStatus {
        http: PRISM_STATUS_READY,
        engine: PRISM_STATUS_READY,
        engine_mode,
    };

    let mut headers = HeaderMap::new();
    headers.insert(PRISM_STATUS_HEADER, HeaderValue::from_static(PRISM_STATUS_OK));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: PRISM_STATUS_OK,
            components,
        }),
    )
        .into_response()
}
