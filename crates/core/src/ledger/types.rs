//! Ledger domain types for journal posting.
//!
//! This module defines the entry state machine, the line input contract used
//! by every caller that posts, and the persisted entry view returned to them.

use std::fmt;
use std::str::FromStr;

use bizbooks_shared::types::has_money_scale;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Journal entry status.
///
/// Entries are created directly as posted; `Draft` exists in the data model
/// but nothing in the posting engine leaves an entry there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not yet authoritative.
    Draft,
    /// Authoritative and immutable.
    Posted,
    /// Cancelled by a reversal entry (terminal).
    Voided,
}

impl EntryStatus {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }

    /// Returns true if `next` is a permitted transition from `self`.
    ///
    /// The only transitions are draft → posted and posted → voided.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Posted) | (Self::Posted, Self::Voided)
        )
    }

    /// Moves to `next`, or fails with `InvalidState` naming the current status.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidState` if the transition is not permitted.
    pub fn transition_to(self, entry_id: Uuid, next: Self) -> Result<Self, LedgerError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(LedgerError::InvalidState {
                entry_id,
                status: self.to_string(),
            })
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "voided" => Ok(Self::Voided),
            _ => Err(LedgerError::Validation(format!("Unknown entry status: {s}"))),
        }
    }
}

/// What produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Entered by a user.
    Manual,
    /// Invoice issue.
    Invoice,
    /// Payment receipt.
    Payment,
    /// Inventory valuation.
    Inventory,
    /// Reversal of another entry.
    Void,
}

impl EntrySource {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Inventory => "inventory",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntrySource {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "invoice" => Ok(Self::Invoice),
            "payment" => Ok(Self::Payment),
            "inventory" => Ok(Self::Inventory),
            "void" => Ok(Self::Void),
            _ => Err(LedgerError::Validation(format!("Unknown entry source: {s}"))),
        }
    }
}

/// One debit or credit line to post.
///
/// Exactly one of debit/credit is strictly positive and the other is zero;
/// both carry at most two decimal places. The fields are private so every
/// `LineSpec` in existence satisfies this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    account_id: Uuid,
    debit: Decimal,
    credit: Decimal,
    description: Option<String>,
}

impl LineSpec {
    /// Creates a line after checking the one-sided amount rule.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::MalformedLine` if both or neither side is
    /// positive, if either side is negative, or if an amount has more than two
    /// decimal places.
    pub fn new(
        account_id: Uuid,
        debit: Decimal,
        credit: Decimal,
        description: Option<String>,
    ) -> Result<Self, LedgerError> {
        let one_sided = (debit > Decimal::ZERO && credit.is_zero())
            || (credit > Decimal::ZERO && debit.is_zero());
        if !one_sided || !has_money_scale(debit) || !has_money_scale(credit) {
            return Err(LedgerError::MalformedLine { debit, credit });
        }
        Ok(Self {
            account_id,
            debit,
            credit,
            description,
        })
    }

    /// Creates a debit line.
    pub fn debit(account_id: Uuid, amount: Decimal) -> Result<Self, LedgerError> {
        Self::new(account_id, amount, Decimal::ZERO, None)
    }

    /// Creates a credit line.
    pub fn credit(account_id: Uuid, amount: Decimal) -> Result<Self, LedgerError> {
        Self::new(account_id, Decimal::ZERO, amount, None)
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Account posted to.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.account_id
    }

    /// Debit amount (zero for credit lines).
    #[must_use]
    pub const fn debit_amount(&self) -> Decimal {
        self.debit
    }

    /// Credit amount (zero for debit lines).
    #[must_use]
    pub const fn credit_amount(&self) -> Decimal {
        self.credit
    }

    /// Optional line description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Input for posting a journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// The tenant this entry belongs to.
    pub tenant_id: Uuid,
    /// Business date; decides the fiscal year.
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional external reference (e.g. invoice number).
    pub reference: Option<String>,
    /// What produced the entry.
    pub source: EntrySource,
    /// Originating domain object.
    pub source_id: Option<Uuid>,
    /// The user posting.
    pub created_by: Option<Uuid>,
    /// The lines.
    pub lines: Vec<LineSpec>,
}

/// A persisted journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line ID.
    pub id: Uuid,
    /// Account posted to.
    pub account_id: Uuid,
    /// Account code, when resolved for display.
    pub account_code: Option<String>,
    /// Account name, when resolved for display.
    pub account_name: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// A persisted journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Business date.
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// What produced the entry.
    pub source: EntrySource,
    /// Originating domain object.
    pub source_id: Option<Uuid>,
    /// Current status.
    pub status: EntryStatus,
    /// Reversal entry that voided this one.
    pub reversed_by: Option<Uuid>,
    /// The user who posted.
    pub created_by: Option<Uuid>,
    /// Fiscal year derived from `entry_date`.
    pub fiscal_year: i32,
    /// Insertion time; orders entries that share a date.
    pub created_at: DateTime<Utc>,
    /// Lines in insertion order.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of line debits.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of line credits.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}

/// Filters for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalQuery {
    /// Only entries with this status.
    pub status: Option<EntryStatus>,
    /// Entries dated on or after.
    pub from_date: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(EntryStatus::Draft, EntryStatus::Posted, true)]
    #[case(EntryStatus::Posted, EntryStatus::Voided, true)]
    #[case(EntryStatus::Draft, EntryStatus::Voided, false)]
    #[case(EntryStatus::Voided, EntryStatus::Posted, false)]
    #[case(EntryStatus::Posted, EntryStatus::Draft, false)]
    #[case(EntryStatus::Voided, EntryStatus::Voided, false)]
    fn test_status_transitions(
        #[case] from: EntryStatus,
        #[case] to: EntryStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_transition_to_reports_current_status() {
        let id = Uuid::new_v4();
        assert_eq!(
            EntryStatus::Posted.transition_to(id, EntryStatus::Voided).unwrap(),
            EntryStatus::Voided
        );
        match EntryStatus::Voided.transition_to(id, EntryStatus::Voided) {
            Err(LedgerError::InvalidState { entry_id, status }) => {
                assert_eq!(entry_id, id);
                assert_eq!(status, "voided");
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_status_and_source_parse() {
        assert_eq!("voided".parse::<EntryStatus>().unwrap(), EntryStatus::Voided);
        assert!("pending".parse::<EntryStatus>().is_err());
        assert_eq!("void".parse::<EntrySource>().unwrap(), EntrySource::Void);
        assert_eq!(EntrySource::Inventory.to_string(), "inventory");
    }

    #[rstest]
    #[case(dec!(100), dec!(0), true)]
    #[case(dec!(0), dec!(0.01), true)]
    #[case(dec!(100), dec!(100), false)]
    #[case(dec!(0), dec!(0), false)]
    #[case(dec!(-5), dec!(0), false)]
    #[case(dec!(0), dec!(-5), false)]
    #[case(dec!(10), dec!(-10), false)]
    #[case(dec!(1.005), dec!(0), false)]
    #[case(dec!(1.500), dec!(0), true)]
    fn test_line_spec_rule(#[case] debit: Decimal, #[case] credit: Decimal, #[case] ok: bool) {
        let result = LineSpec::new(Uuid::new_v4(), debit, credit, None);
        assert_eq!(result.is_ok(), ok);
        if !ok {
            assert!(matches!(result, Err(LedgerError::MalformedLine { .. })));
        }
    }

    #[test]
    fn test_line_spec_helpers() {
        let account = Uuid::new_v4();
        let line = LineSpec::debit(account, dec!(42.50))
            .unwrap()
            .with_description("Office chairs");
        assert_eq!(line.account_id(), account);
        assert_eq!(line.debit_amount(), dec!(42.50));
        assert_eq!(line.credit_amount(), Decimal::ZERO);
        assert_eq!(line.description(), Some("Office chairs"));

        let line = LineSpec::credit(account, dec!(42.50)).unwrap();
        assert_eq!(line.credit_amount(), dec!(42.50));
        assert!(LineSpec::credit(account, Decimal::ZERO).is_err());
    }
}
