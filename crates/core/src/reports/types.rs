//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coa::{AccountSubType, AccountType};

/// Summed posted activity for one account, as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTotals {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account sub-type.
    pub sub_type: Option<AccountSubType>,
    /// Sum of posted debits.
    pub total_debit: Decimal,
    /// Sum of posted credits.
    pub total_credit: Decimal,
}

/// One account row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account sub-type.
    pub sub_type: Option<AccountSubType>,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Debit minus credit.
    pub net_balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Lines dated on or before this date are included.
    pub as_of_date: NaiveDate,
    /// Rows ordered by account code.
    pub accounts: Vec<TrialBalanceRow>,
    /// Sum of all debits.
    pub grand_total_debit: Decimal,
    /// Sum of all credits.
    pub grand_total_credit: Decimal,
    /// Whether grand debits equal grand credits.
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Builds the report from per-account totals.
    #[must_use]
    pub fn from_rows(as_of_date: NaiveDate, rows: Vec<AccountTotals>) -> Self {
        let mut accounts: Vec<TrialBalanceRow> = rows
            .into_iter()
            .map(|r| TrialBalanceRow {
                net_balance: r.total_debit - r.total_credit,
                account_id: r.account_id,
                code: r.code,
                name: r.name,
                account_type: r.account_type,
                sub_type: r.sub_type,
                total_debit: r.total_debit,
                total_credit: r.total_credit,
            })
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let grand_total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let grand_total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();

        Self {
            as_of_date,
            accounts,
            grand_total_debit,
            grand_total_credit,
            is_balanced: grand_total_debit == grand_total_credit,
        }
    }

    /// Looks up the row for an account.
    #[must_use]
    pub fn row(&self, account_id: Uuid) -> Option<&TrialBalanceRow> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }
}

/// The account a general ledger is reported for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// A posted line on one account, joined with its entry header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedLine {
    /// Entry ID.
    pub entry_id: Uuid,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry insertion time.
    pub created_at: DateTime<Utc>,
    /// Entry reference.
    pub reference: Option<String>,
    /// Entry description.
    pub entry_description: String,
    /// Line description.
    pub line_description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One general ledger row with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerLine {
    /// Entry ID.
    pub entry_id: Uuid,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry reference.
    pub reference: Option<String>,
    /// Entry description, or the line description when the entry has none.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line.
    pub balance: Decimal,
}

/// General ledger report for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedger {
    /// The account.
    pub account: LedgerAccount,
    /// Window start, if any.
    pub from_date: Option<NaiveDate>,
    /// Window end, if any.
    pub to_date: Option<NaiveDate>,
    /// Lines in (date, insertion) order.
    pub entries: Vec<GeneralLedgerLine>,
    /// Last running balance, zero when empty.
    pub closing_balance: Decimal,
}
