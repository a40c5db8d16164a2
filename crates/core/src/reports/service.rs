//! Report generation service.
//!
//! Storage hands over rows already restricted to one tenant; everything here
//! is arithmetic and ordering.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountTotals, GeneralLedger, GeneralLedgerLine, LedgerAccount, PostedLine, TrialBalance,
};

/// Service for generating ledger reports.
pub struct ReportService;

impl ReportService {
    /// Generates the trial balance from per-account totals.
    #[must_use]
    pub fn trial_balance(as_of: NaiveDate, rows: Vec<AccountTotals>) -> TrialBalance {
        TrialBalance::from_rows(as_of, rows)
    }

    /// Generates the general ledger for one account.
    ///
    /// Lines are stable-sorted by (entry date, insertion time) and limited to
    /// the window. The running balance starts at zero at the window start; it
    /// is not an opening balance carried from earlier activity.
    #[must_use]
    pub fn general_ledger(
        account: LedgerAccount,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        mut lines: Vec<PostedLine>,
    ) -> GeneralLedger {
        lines.sort_by(|a, b| {
            a.entry_date
                .cmp(&b.entry_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let mut balance = Decimal::ZERO;
        let entries: Vec<GeneralLedgerLine> = lines
            .into_iter()
            .filter(|l| from_date.is_none_or(|from| l.entry_date >= from))
            .filter(|l| to_date.is_none_or(|to| l.entry_date <= to))
            .map(|l| {
                balance += l.debit - l.credit;
                let description = if l.entry_description.is_empty() {
                    l.line_description
                } else {
                    Some(l.entry_description)
                };
                GeneralLedgerLine {
                    entry_id: l.entry_id,
                    date: l.entry_date,
                    reference: l.reference,
                    description,
                    debit: l.debit,
                    credit: l.credit,
                    balance,
                }
            })
            .collect();

        GeneralLedger {
            account,
            from_date,
            to_date,
            entries,
            closing_balance: balance,
        }
    }
}
