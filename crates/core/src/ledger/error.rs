//! Ledger error types for validation and state errors.
//!
//! This module defines every error the chart of accounts, the posting engine,
//! the year lock and the report queries can raise. Each variant belongs to one
//! [`ErrorKind`] so callers can branch on the kind without matching variants.

use std::fmt;

use bizbooks_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A line violates the exactly-one-of-debit/credit rule.
    MalformedLine,
    /// Sum of debits differs from sum of credits.
    Unbalanced,
    /// Both sums are zero.
    EmptyEntry,
    /// Entry date falls in a locked financial year.
    PeriodLocked,
    /// Referenced accounts are absent, inactive or belong to another tenant.
    UnknownAccount,
    /// Entry, account or year lookup miss.
    NotFound,
    /// Operation not allowed in the current state.
    InvalidState,
    /// Unique key already taken.
    Conflict,
    /// Input rejected before reaching the ledger rules.
    Validation,
    /// Underlying storage failed.
    Storage,
}

/// Account ids formatted as a comma separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIds(pub Vec<Uuid>);

impl fmt::Display for AccountIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Posting Errors ==========
    /// Line must carry exactly one positive amount with at most two decimals.
    #[error("Exactly one of debit/credit must be positive, got Dr={debit} Cr={credit}")]
    MalformedLine {
        /// Debit amount supplied.
        debit: Decimal,
        /// Credit amount supplied.
        credit: Decimal,
    },

    /// Journal entry is not balanced (debits != credits).
    #[error("Journal entry not balanced: Dr={debit} Cr={credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Journal entry has no amounts.
    #[error("Journal entry must have non-zero amounts")]
    EmptyEntry,

    /// Financial year is locked.
    #[error("Financial year {0} is locked. No new postings allowed.")]
    PeriodLocked(i32),

    /// One or more accounts are absent, inactive or in another tenant.
    #[error("Accounts not found in this organisation: {0}")]
    UnknownAccount(AccountIds),

    // ========== Lookup Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// No active account with this code.
    #[error("Account with code '{0}' not found")]
    AccountCodeNotFound(String),

    // ========== State Errors ==========
    /// Entry cannot transition from its current status.
    #[error("Cannot void entry with status '{status}'")]
    InvalidState {
        /// The entry.
        entry_id: Uuid,
        /// Its current status.
        status: String,
    },

    /// Financial year is already locked.
    #[error("Financial year {0} is already locked")]
    AlreadyLocked(i32),

    /// System account cannot be changed.
    #[error("System accounts cannot be {0}")]
    SystemAccountProtected(&'static str),

    /// Account is already inactive.
    #[error("Account {0} is already inactive")]
    AccountAlreadyInactive(Uuid),

    // ========== Chart of Accounts Errors ==========
    /// Account code already exists for this tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account does not exist in this tenant.
    #[error("Parent account not found in this organisation: {0}")]
    InvalidParent(Uuid),

    /// Parent assignment would create a cycle.
    #[error("Account {account_id} cannot be placed under {parent_id}: this would create a cycle")]
    ParentCycle {
        /// Account being moved.
        account_id: Uuid,
        /// Requested parent.
        parent_id: Uuid,
    },

    /// Input rejected.
    #[error("{0}")]
    Validation(String),

    // ========== Storage Errors ==========
    /// Storage layer failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Builds an `UnknownAccount` error with ids sorted for stable output.
    #[must_use]
    pub fn unknown_accounts(mut ids: Vec<Uuid>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self::UnknownAccount(AccountIds(ids))
    }

    /// Returns the kind this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedLine { .. } => ErrorKind::MalformedLine,
            Self::Unbalanced { .. } => ErrorKind::Unbalanced,
            Self::EmptyEntry => ErrorKind::EmptyEntry,
            Self::PeriodLocked(_) => ErrorKind::PeriodLocked,
            Self::UnknownAccount(_) => ErrorKind::UnknownAccount,
            Self::EntryNotFound(_) | Self::AccountNotFound(_) | Self::AccountCodeNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidState { .. }
            | Self::AlreadyLocked(_)
            | Self::SystemAccountProtected(_)
            | Self::AccountAlreadyInactive(_) => ErrorKind::InvalidState,
            Self::DuplicateCode(_) => ErrorKind::Conflict,
            Self::InvalidParent(_) | Self::ParentCycle { .. } | Self::Validation(_) => {
                ErrorKind::Validation
            }
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::PeriodLocked(_) => "PERIOD_LOCKED",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotFound(_) | Self::AccountCodeNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::AlreadyLocked(_) => "ALREADY_LOCKED",
            Self::SystemAccountProtected(_) => "SYSTEM_ACCOUNT_PROTECTED",
            Self::AccountAlreadyInactive(_) => "ACCOUNT_ALREADY_INACTIVE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidParent(_) => "INVALID_PARENT",
            Self::ParentCycle { .. } => "PARENT_CYCLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidState | ErrorKind::Conflict => 409,
            ErrorKind::MalformedLine
            | ErrorKind::Unbalanced
            | ErrorKind::EmptyEntry
            | ErrorKind::PeriodLocked
            | ErrorKind::UnknownAccount => 422,
            ErrorKind::Storage => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict | ErrorKind::InvalidState => Self::Conflict(message),
            ErrorKind::MalformedLine
            | ErrorKind::Unbalanced
            | ErrorKind::EmptyEntry
            | ErrorKind::PeriodLocked
            | ErrorKind::UnknownAccount => Self::BusinessRule(message),
            ErrorKind::Storage => Self::Database(message),
        }
    }
}
