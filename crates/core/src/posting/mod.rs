//! Postings on behalf of invoicing, payments and inventory.
//!
//! Each collaborator event becomes a [`PostingDraft`] that names accounts by
//! their default codes; the persistence layer resolves the codes and posts
//! the result through the ledger.

pub mod codes;
pub mod draft;
pub mod error;
pub mod inventory;
pub mod invoice;

pub use draft::{AccountRef, DraftLine, PostingDraft};
pub use error::PostingError;
pub use inventory::{InventoryPosting, MovementType};
pub use invoice::{InvoicePosting, PaymentPosting};
