//! Route handlers. Each one decodes the body, hands it to the gate and
//! encodes whatever comes back.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::error::ApiError;
use super::AppState;
use crate::models::{AnalysisResponse, HealthResponse, PortraitResponse};

pub async fn analyze_personality(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request = decode_body(&body?)?;
    Ok(Json(state.gate.analyze(request).await?))
}

pub async fn generate_portrait(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PortraitResponse>, ApiError> {
    let request = decode_body(&body?)?;
    Ok(Json(state.gate.portrait(request).await?))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        openai_configured: state.gate.is_configured(),
    })
}

/// CORS preflight: 200 with an empty body; the headers come from the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Parse a JSON request body without insisting on a `Content-Type` header.
///
/// An empty body, or valid JSON whose shape does not fit the request (a
/// non-object, a non-string field), decodes as the default request so that
/// the gate reports the missing fields. Only unparsable JSON is rejected here.
fn decode_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    match serde_json::from_slice(body) {
        Ok(request) => Ok(request),
        Err(e) if e.classify() == Category::Data => {
            tracing::warn!("Request body has unexpected shape: {}", e);
            Ok(T::default())
        }
        Err(e) => {
            tracing::warn!("Rejected malformed request body: {}", e);
            Err(ApiError::MalformedBody)
        }
    }
}
