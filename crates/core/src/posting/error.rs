//! Posting adapter errors.

use bizbooks_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors raised while turning collaborator events into journal entries.
#[derive(Debug, Error)]
pub enum PostingError {
    /// A default account the posting needs has not been created.
    ///
    /// This is a tenant configuration problem, not a ledger rule violation.
    #[error("Default account {0} not found. Seed the default chart of accounts first.")]
    MissingDefaultAccount(String),

    /// The ledger rejected the entry.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDefaultAccount(_) => "MISSING_DEFAULT_ACCOUNT",
            Self::Ledger(e) => e.error_code(),
        }
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::MissingDefaultAccount(_) => Self::Validation(err.to_string()),
            PostingError::Ledger(e) => e.into(),
        }
    }
}
