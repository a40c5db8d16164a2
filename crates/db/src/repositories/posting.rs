//! Posting gateway for collaborator events: invoices, payments, inventory.

use bizbooks_core::ledger::JournalEntry;
use bizbooks_core::posting::{
    InventoryPosting, InvoicePosting, PaymentPosting, PostingDraft, PostingError,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use super::account::active_codes;
use super::journal::post_in;
use super::storage;

/// Turns collaborator events into posted journal entries.
#[derive(Debug, Clone)]
pub struct PostingGateway {
    db: DatabaseConnection,
}

impl PostingGateway {
    /// Creates a new posting gateway.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts an issued invoice. Returns `None` for a zero-total invoice.
    ///
    /// # Errors
    ///
    /// Returns `MissingDefaultAccount` if the tenant lacks one of the
    /// default accounts the invoice needs.
    pub async fn post_invoice(
        &self,
        tenant_id: Uuid,
        invoice: &InvoicePosting,
        created_by: Option<Uuid>,
    ) -> Result<Option<JournalEntry>, PostingError> {
        match invoice.draft() {
            Some(draft) => self.post_draft(tenant_id, draft, created_by).await.map(Some),
            None => Ok(None),
        }
    }

    /// Posts a payment received against an invoice.
    pub async fn post_payment(
        &self,
        tenant_id: Uuid,
        payment: &PaymentPosting,
        created_by: Option<Uuid>,
    ) -> Result<JournalEntry, PostingError> {
        self.post_draft(tenant_id, payment.draft(), created_by).await
    }

    /// Posts the cost of goods for an outbound stock movement. Inbound
    /// movements and zero-value issues post nothing and return `None`.
    pub async fn post_inventory_issue(
        &self,
        tenant_id: Uuid,
        movement: &InventoryPosting,
        created_by: Option<Uuid>,
    ) -> Result<Option<JournalEntry>, PostingError> {
        match movement.draft() {
            Some(draft) => self.post_draft(tenant_id, draft, created_by).await.map(Some),
            None => Ok(None),
        }
    }

    async fn post_draft(
        &self,
        tenant_id: Uuid,
        draft: PostingDraft,
        created_by: Option<Uuid>,
    ) -> Result<JournalEntry, PostingError> {
        let txn = self.db.begin().await.map_err(storage)?;

        let resolved = active_codes(&txn, tenant_id, &draft.codes()).await?;
        let entry = draft.resolve(tenant_id, created_by, |code| resolved.get(code).copied())?;
        let posted = post_in(&txn, entry).await?;

        txn.commit().await.map_err(storage)?;
        Ok(posted)
    }
}

