//! Cost of goods sold postings for outbound stock movements.

use std::fmt;

use bizbooks_shared::types::round_money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::codes;
use super::draft::{AccountRef, DraftLine, PostingDraft};
use crate::ledger::EntrySource;

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods bought.
    PurchaseIn,
    /// Goods sold.
    SaleOut,
    /// Goods returned by a customer.
    ReturnIn,
    /// Goods returned to a supplier.
    ReturnOut,
    /// Stock count correction.
    Adjustment,
}

impl MovementType {
    /// Returns the movement name used in references.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PurchaseIn => "purchase_in",
            Self::SaleOut => "sale_out",
            Self::ReturnIn => "return_in",
            Self::ReturnOut => "return_out",
            Self::Adjustment => "adjustment",
        }
    }

    /// Returns true if stock leaves the business.
    #[must_use]
    pub const fn is_outbound(self) -> bool {
        matches!(self, Self::SaleOut | Self::ReturnOut)
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stock movement to value.
#[derive(Debug, Clone)]
pub struct InventoryPosting {
    /// Movement kind.
    pub movement_type: MovementType,
    /// Item SKU.
    pub sku: String,
    /// Item name.
    pub item_name: String,
    /// Quantity moved.
    pub quantity: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Movement date.
    pub movement_date: NaiveDate,
    /// Originating document, if any.
    pub reference_id: Option<Uuid>,
    /// Item-specific COGS account (defaults to 5010).
    pub cogs_account: Option<AccountRef>,
    /// Item-specific inventory account (defaults to 1200).
    pub inventory_account: Option<AccountRef>,
}

impl InventoryPosting {
    /// Movement value rounded to two places.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        round_money(self.quantity * self.unit_cost)
    }

    /// Dr COGS, Cr Inventory at quantity × unit cost.
    ///
    /// Inbound movements and movements valued at zero post nothing.
    #[must_use]
    pub fn draft(&self) -> Option<PostingDraft> {
        if !self.movement_type.is_outbound() {
            return None;
        }
        let amount = self.amount();
        if amount <= Decimal::ZERO {
            return None;
        }

        let cogs = self
            .cogs_account
            .clone()
            .unwrap_or_else(|| codes::COGS.into());
        let inventory = self
            .inventory_account
            .clone()
            .unwrap_or_else(|| codes::INVENTORY.into());

        Some(PostingDraft {
            entry_date: self.movement_date,
            description: format!("COGS - {} x{}", self.item_name, self.quantity),
            reference: Some(format!("{}/{}", self.movement_type, self.sku)),
            source: EntrySource::Inventory,
            source_id: self.reference_id,
            lines: vec![DraftLine::debit(cogs, amount), DraftLine::credit(inventory, amount)],
        })
    }
}
