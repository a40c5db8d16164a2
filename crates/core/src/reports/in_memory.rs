//! In-memory report inputs for tests.
//!
//! Builds the rows the storage queries return from plain entries.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ReportService;
use super::types::{AccountTotals, PostedLine};
use crate::coa::Account;
use crate::ledger::{EntryStatus, JournalEntry};

/// A voided entry stays in the books next to its reversal so the pair nets
/// to zero; only drafts are left out.
const fn is_reportable(status: EntryStatus) -> bool {
    matches!(status, EntryStatus::Posted | EntryStatus::Voided)
}

impl ReportService {
    /// Sums posted activity per active account over in-memory entries.
    ///
    /// Mirrors the storage query: only reportable entries dated on or before
    /// `as_of`, only active accounts, accounts without activity report zero.
    #[must_use]
    pub(crate) fn account_totals(
        accounts: &[Account],
        entries: &[JournalEntry],
        as_of: NaiveDate,
    ) -> Vec<AccountTotals> {
        let active: HashSet<Uuid> = accounts.iter().filter(|a| a.is_active).map(|a| a.id).collect();
        let mut sums: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for entry in entries
            .iter()
            .filter(|e| is_reportable(e.status) && e.entry_date <= as_of)
        {
            for line in entry.lines.iter().filter(|l| active.contains(&l.account_id)) {
                let sum = sums.entry(line.account_id).or_default();
                sum.0 += line.debit;
                sum.1 += line.credit;
            }
        }

        accounts
            .iter()
            .filter(|a| a.is_active)
            .map(|a| {
                let (total_debit, total_credit) = sums.get(&a.id).copied().unwrap_or_default();
                AccountTotals {
                    account_id: a.id,
                    code: a.code.clone(),
                    name: a.name.clone(),
                    account_type: a.account_type,
                    sub_type: a.sub_type,
                    total_debit,
                    total_credit,
                }
            })
            .collect()
    }

    /// Collects reportable lines for one account over in-memory entries.
    #[must_use]
    pub(crate) fn posted_lines(account_id: Uuid, entries: &[JournalEntry]) -> Vec<PostedLine> {
        entries
            .iter()
            .filter(|e| is_reportable(e.status))
            .flat_map(|e| {
                e.lines
                    .iter()
                    .filter(move |l| l.account_id == account_id)
                    .map(move |l| PostedLine {
                        entry_id: e.id,
                        entry_date: e.entry_date,
                        created_at: e.created_at,
                        reference: e.reference.clone(),
                        entry_description: e.description.clone(),
                        line_description: l.description.clone(),
                        debit: l.debit,
                        credit: l.credit,
                    })
            })
            .collect()
    }
}
