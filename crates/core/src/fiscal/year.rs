//! Financial year lock state.
//!
//! A financial year is the calendar year of an entry date. Years default to
//! open; locking is one-way and permanent.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::LedgerError;

/// Returns the financial year an entry dated `date` belongs to.
#[must_use]
pub fn fiscal_year_of(date: NaiveDate) -> i32 {
    date.year()
}

/// Lock state of one tenant's financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialYear {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Calendar year.
    pub year: i32,
    /// Whether postings are refused.
    pub is_locked: bool,
    /// Who locked the year.
    pub locked_by: Option<Uuid>,
    /// When the year was locked.
    pub locked_at: Option<DateTime<Utc>>,
}

impl FinancialYear {
    /// An open year with no lock history. Used when no row exists.
    #[must_use]
    pub const fn open(tenant_id: Uuid, year: i32) -> Self {
        Self {
            tenant_id,
            year,
            is_locked: false,
            locked_by: None,
            locked_at: None,
        }
    }

    /// Returns true if entries dated in this year may be posted.
    #[must_use]
    pub const fn allows_posting(&self) -> bool {
        !self.is_locked
    }

    /// Locks the year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AlreadyLocked` if the year is already locked.
    /// The existing lock metadata is left untouched.
    pub fn lock(&mut self, by: Option<Uuid>, at: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.is_locked {
            return Err(LedgerError::AlreadyLocked(self.year));
        }
        self.is_locked = true;
        self.locked_by = by;
        self.locked_at = Some(at);
        Ok(())
    }
}
