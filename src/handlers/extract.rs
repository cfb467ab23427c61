//! `POST /extract` handler
//!
//! Request validation failures are the only non-200 answers; every accepted
//! request gets an [`ExtractionResult`](crate::types::ExtractionResult), with
//! `method: "failed"` when neither path produced content.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::AppState;
use crate::types::ExtractionRequest;

/// JSON body of `POST /extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractBody {
    /// Absolute http(s) URL of the page
    pub url: String,
}

/// Error body for rejected requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

impl ErrorResponse {
    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Extraction endpoint handler.
///
/// # Route
/// `POST /extract`
///
/// # Response
/// - `200 OK` with the extraction result
/// - `400`/`415`/`422` with `{"error": "..."}` for a malformed body
/// - `422 Unprocessable Entity` with `{"error": "..."}` for an invalid URL
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExtractBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Rejected extract request: {}", rejection.body_text());
            return ErrorResponse {
                error: rejection.body_text(),
            }
            .into_response_with(rejection.status());
        }
    };

    let request = match ExtractionRequest::parse(&body.url) {
        Ok(request) => request,
        Err(reason) => {
            warn!("Rejected extract request: {}", reason);
            return ErrorResponse {
                error: format!("invalid url: {}", reason),
            }
            .into_response_with(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    info!(url = %request.url, "Extraction requested");

    let started = Instant::now();
    let result = state.extractor.extract(&request.url).await;
    let elapsed = started.elapsed();

    state.stats.record(result.method, elapsed);
    info!(
        method = %result.method,
        length = result.length,
        elapsed_ms = elapsed.as_millis() as u64,
        "Extraction finished"
    );

    (StatusCode::OK, Json(result)).into_response()
}
