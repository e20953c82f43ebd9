use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Request-level failures surfaced to the caller. Webhook delivery failures
/// are deliberately absent: they are logged and swallowed inside the runner.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required fields")]
    Validation,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal server error")]
    Internal,
}

/// JSON error body, fixed messages only. Internal detail never reaches the
/// caller; it is logged server-side before the error is constructed.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn body(&self) -> ApiErrorBody {
        let error = match self {
            ApiError::Validation => "Missing required fields",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Internal => "Internal server error",
        };
        ApiErrorBody { error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
