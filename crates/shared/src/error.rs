//! Error categories understood by every Bizbooks layer.
//!
//! Domain errors fold into these when a caller only needs the category,
//! its HTTP status and a stable code.

use thiserror::Error;

/// Shorthand for results carrying an [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// Category of a failed operation.
#[derive(Debug, Error)]
pub enum AppError {
    /// An account, entry or year the caller named does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request itself is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed, but the books refuse it.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Clashes with current state: a duplicate code, a second lock.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Any other server-side failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for the category.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(m)
            | Self::Validation(m)
            | Self::BusinessRule(m)
            | Self::Conflict(m)
            | Self::Database(m)
            | Self::Internal(m) => m,
        }
    }

    /// Returns true for failures the caller cannot fix by changing the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
