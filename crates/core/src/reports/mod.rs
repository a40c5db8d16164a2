//! Trial balance and general ledger.
//!
//! Pure report assembly over rows read by the persistence layer.

pub mod service;
pub mod types;

#[cfg(test)]
mod in_memory;

pub use service::ReportService;
pub use types::*;
