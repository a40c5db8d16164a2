//! Error responses.
//!
//! Every failure renders as `{"error": code, "message": text}` with the
//! status its domain error maps to. Storage failures are logged and hidden
//! behind a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bizbooks_core::ledger::LedgerError;
use bizbooks_core::posting::PostingError;
use bizbooks_shared::AppError;
use serde_json::json;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Builds an error from its parts.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// A 400 response for a malformed request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
            return Self::new(status, code, "An error occurred");
        }
        Self::new(status, code, message)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<PostingError> for ApiError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Ledger(e) => e.into(),
            e @ PostingError::MissingDefaultAccount(_) => {
                Self::from_parts(400, e.error_code(), e.to_string())
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.message().to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}
