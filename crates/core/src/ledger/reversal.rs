//! Reversing entries for voiding posted journal entries.
//!
//! Posted entries are never edited. A void posts a mirror entry that swaps
//! every debit with its credit, so the original and its reversal net to zero
//! on every account.

use chrono::NaiveDate;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{EntrySource, EntryStatus, JournalEntry, LineSpec, NewJournalEntry};

/// Stateless builder for reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversal of `original`, dated `today`.
    ///
    /// Lines keep their order and accounts with debit and credit swapped.
    /// Each line is described as a reversal of its original line, falling
    /// back to the original entry id. The reversal carries the same reference
    /// and points back at the original through `source_id`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidState` unless `original` is posted.
    pub fn reversing_entry(
        original: &JournalEntry,
        voided_by: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<NewJournalEntry, LedgerError> {
        original
            .status
            .transition_to(original.id, EntryStatus::Voided)?;

        let lines = original
            .lines
            .iter()
            .map(|line| {
                let label = line
                    .description
                    .clone()
                    .unwrap_or_else(|| original.id.to_string());
                LineSpec::new(
                    line.account_id,
                    line.credit,
                    line.debit,
                    Some(format!("Reversal of {label}")),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewJournalEntry {
            tenant_id: original.tenant_id,
            entry_date: today,
            description: format!("REVERSAL: {}", original.description),
            reference: original.reference.clone(),
            source: EntrySource::Void,
            source_id: Some(original.id),
            created_by: voided_by,
            lines,
        })
    }
}
