//! Journal entries described by account code.
//!
//! Collaborators know accounts by their well-known codes. A `PostingDraft` is
//! resolved against the tenant's chart of accounts just before posting.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::PostingError;
use crate::ledger::{EntrySource, LineSpec, NewJournalEntry};

/// How a draft line names its account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// By code within the tenant.
    Code(String),
    /// By id, already resolved by the caller.
    Id(Uuid),
}

impl From<&str> for AccountRef {
    fn from(code: &str) -> Self {
        Self::Code(code.to_string())
    }
}

impl From<Uuid> for AccountRef {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

/// A line whose account is not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    /// Target account.
    pub account: AccountRef,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

impl DraftLine {
    /// A debit line.
    pub fn debit(account: impl Into<AccountRef>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line.
    pub fn credit(account: impl Into<AccountRef>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// An entry ready to post once its account codes are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingDraft {
    /// Business date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Producing collaborator.
    pub source: EntrySource,
    /// Originating domain object.
    pub source_id: Option<Uuid>,
    /// Lines.
    pub lines: Vec<DraftLine>,
}

impl PostingDraft {
    /// Distinct account codes referenced, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        let codes: BTreeSet<&str> = self
            .lines
            .iter()
            .filter_map(|l| match &l.account {
                AccountRef::Code(code) => Some(code.as_str()),
                AccountRef::Id(_) => None,
            })
            .collect();
        codes.into_iter().collect()
    }

    /// Resolves account codes and builds the entry to post.
    ///
    /// `lookup` maps a code to the id of the tenant's active account.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::MissingDefaultAccount` for the first code that
    /// does not resolve and `PostingError::Ledger` if a line is malformed.
    pub fn resolve<F>(
        self,
        tenant_id: Uuid,
        created_by: Option<Uuid>,
        lookup: F,
    ) -> Result<NewJournalEntry, PostingError>
    where
        F: Fn(&str) -> Option<Uuid>,
    {
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            let account_id = match line.account {
                AccountRef::Id(id) => id,
                AccountRef::Code(code) => {
                    lookup(&code).ok_or(PostingError::MissingDefaultAccount(code))?
                }
            };
            lines.push(LineSpec::new(account_id, line.debit, line.credit, line.description)?);
        }

        Ok(NewJournalEntry {
            tenant_id,
            entry_date: self.entry_date,
            description: self.description,
            reference: self.reference,
            source: self.source,
            source_id: self.source_id,
            created_by,
            lines,
        })
    }
}
