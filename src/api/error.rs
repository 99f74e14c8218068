//! Caller-facing HTTP errors.

use std::any::Any;

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::gate::GateError;
use crate::models::ErrorBody;

/// Every way a request can fail, rendered as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Invalid JSON in request body")]
    MalformedBody,

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Invalid request body")]
    UnreadableBody,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Endpoint not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Gate(err) => err.status_code(),
            ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnreadableBody => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge
        } else {
            ApiError::UnreadableBody
        }
    }
}

type Panic = Box<dyn Any + Send + 'static>;

/// Turns a handler panic into a 500 response, logging the payload.
pub fn catch_panic(err: Panic) -> Response {
    if let Some(panic) = err.downcast_ref::<String>() {
        tracing::error!("Unhandled error: {}", panic);
    } else if let Some(panic) = err.downcast_ref::<&str>() {
        tracing::error!("Unhandled error: {}", panic);
    } else {
        tracing::error!("Unhandled error: unknown panic type");
    }

    ApiError::Internal.into_response()
}
