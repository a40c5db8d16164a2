//! Ledger service for validating journal entries before they are stored.
//!
//! The persistence layer runs these checks inside its transaction, in
//! order: balance, then period lock, then account existence.

use std::collections::{BTreeSet, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::NewJournalEntry;

/// Totals and lookups derived from an entry that passed the balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits (equal to `total_debit`).
    pub total_credit: Decimal,
    /// Fiscal year the entry falls in.
    pub fiscal_year: i32,
    /// Distinct accounts referenced by the lines.
    pub account_ids: BTreeSet<Uuid>,
}

impl PostingPlan {
    /// Accounts in `account_ids` that are absent from `active`.
    #[must_use]
    pub fn missing_accounts(&self, active: &HashSet<Uuid>) -> Vec<Uuid> {
        self.account_ids
            .iter()
            .filter(|id| !active.contains(id))
            .copied()
            .collect()
    }
}

/// Stateless validation for journal posting.
pub struct LedgerService;

impl LedgerService {
    /// Checks that the entry balances and is non-empty.
    ///
    /// Lines are already well-formed by construction of `LineSpec`, so this
    /// only has to compare totals. An entry with no lines has zero totals and
    /// is reported as empty.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Unbalanced` if debits differ from credits and
    /// `LedgerError::EmptyEntry` if both are zero.
    pub fn prepare(entry: &NewJournalEntry) -> Result<PostingPlan, LedgerError> {
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut account_ids = BTreeSet::new();

        for line in &entry.lines {
            total_debit += line.debit_amount();
            total_credit += line.credit_amount();
            account_ids.insert(line.account_id());
        }

        if total_debit != total_credit {
            return Err(LedgerError::Unbalanced {
                debit: total_debit,
                credit: total_credit,
            });
        }
        if total_debit.is_zero() {
            return Err(LedgerError::EmptyEntry);
        }

        Ok(PostingPlan {
            total_debit,
            total_credit,
            fiscal_year: entry.entry_date.year(),
            account_ids,
        })
    }

    /// Rejects posting into a locked fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PeriodLocked` if `is_locked` is true.
    pub const fn ensure_period_open(fiscal_year: i32, is_locked: bool) -> Result<(), LedgerError> {
        if is_locked {
            return Err(LedgerError::PeriodLocked(fiscal_year));
        }
        Ok(())
    }

    /// Rejects lines that reference accounts outside `active`.
    ///
    /// `active` holds the ids of the tenant's active accounts among those the
    /// plan references.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownAccount` listing every missing id.
    pub fn ensure_accounts(plan: &PostingPlan, active: &HashSet<Uuid>) -> Result<(), LedgerError> {
        let missing = plan.missing_accounts(active);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::unknown_accounts(missing))
        }
    }
}
