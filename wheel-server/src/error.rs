//! HTTP mapping of the engine error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use wheel_core::WheelError;

/// Wrapper so core errors can flow out of handlers via `?`.
#[derive(Debug)]
pub struct ApiError(pub WheelError);

impl From<WheelError> for ApiError {
    fn from(err: WheelError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    retryable: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Operator problem: the catalogue needs a fix.
            WheelError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // The write was rejected; the ledger is intact.
            WheelError::Integrity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WheelError::TransientFetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            WheelError::UnknownPlayer(_) => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
