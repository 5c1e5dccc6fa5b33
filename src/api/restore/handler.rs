// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Room restoration endpoint handlers

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::request::RestoreRequest;
use super::response::{legacy_body, RestorationResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::generation::GenerationOutcome;

/// Header carrying the caller's address, set by the fronting proxy
pub const CLIENT_IP_HEADER: &str = "x-real-ip";

/// Quota identifier for a request. Callers without the header share ""
pub fn client_identifier(headers: &HeaderMap) -> String {
    headers
        .get(CLIENT_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

async fn run(
    state: &AppState,
    headers: &HeaderMap,
    request: RestoreRequest,
    request_id: &str,
) -> Result<GenerationOutcome, ApiError> {
    let client_id = client_identifier(headers);
    debug!(
        "Restoration request {}: client='{}', theme='{}', room='{}'",
        request_id, client_id, request.theme, request.room
    );

    let job = request.into_job();
    state
        .restorer
        .handle(&job, &client_id)
        .await
        .map_err(|e| {
            warn!("Restoration request {} failed: {}", request_id, e);
            ApiError::from(e)
        })
}

/// POST /generate - Restore a room photo
///
/// Pipeline:
/// 1. Quota check keyed by `x-real-ip` (429 with X-RateLimit-* headers)
/// 2. Validate the image URL (400 `invalid_request`)
/// 3. Submit the job and poll until it finishes
/// 4. Return the output JSON, or the string "Failed to restore image" (both 200)
pub async fn generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RestoreRequest>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    match run(&state, &headers, request, &request_id).await {
        Ok(outcome) => Json(legacy_body(outcome)).into_response(),
        Err(e) => e.into_response_with_id(Some(request_id)),
    }
}

/// POST /v1/restorations - Same pipeline with a tagged JSON outcome
pub async fn restorations_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RestoreRequest>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    match run(&state, &headers, request, &request_id).await {
        Ok(outcome) => Json(RestorationResponse::from_outcome(outcome, request_id)).into_response(),
        Err(e) => e.into_response_with_id(Some(request_id)),
    }
}
