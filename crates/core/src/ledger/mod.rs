//! Double-entry journal posting and voiding.
//!
//! - Entry state machine and line contract
//! - Balance, period and account checks run before storage
//! - Reversing entries for voids
//! - Error types shared by every ledger operation

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::{AccountIds, ErrorKind, LedgerError};
pub use reversal::ReversalService;
pub use service::{LedgerService, PostingPlan};
pub use types::{
    EntrySource, EntryStatus, JournalEntry, JournalLine, JournalQuery, LineSpec, NewJournalEntry,
};
