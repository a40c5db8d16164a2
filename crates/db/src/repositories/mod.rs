//! Ledger persistence.
//!
//! Each public operation runs in one transaction and reports `LedgerError`;
//! driver failures surface as `LedgerError::Storage`.

pub mod account;
pub mod fiscal;
pub mod journal;
pub mod posting;
pub mod report;

pub use account::{AccountRepository, SeedReport};
pub use fiscal::FinancialYearRepository;
pub use journal::JournalRepository;
pub use posting::PostingGateway;
pub use report::ReportRepository;

use bizbooks_core::ledger::LedgerError;
use sea_orm::{DbErr, SqlErr};

/// Wraps a driver error.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn storage(err: DbErr) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
