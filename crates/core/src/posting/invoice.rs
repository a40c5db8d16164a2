//! Invoice issue and payment receipt postings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::codes;
use super::draft::{DraftLine, PostingDraft};
use crate::ledger::EntrySource;

/// An issued invoice with GST splits.
#[derive(Debug, Clone)]
pub struct InvoicePosting {
    /// Invoice ID, recorded as the entry's source id.
    pub invoice_id: Uuid,
    /// Invoice number, recorded as the entry's reference.
    pub invoice_number: String,
    /// Client display name.
    pub client_name: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Amount before tax.
    pub subtotal: Decimal,
    /// Central GST.
    pub cgst: Decimal,
    /// State GST.
    pub sgst: Decimal,
    /// Integrated GST.
    pub igst: Decimal,
    /// Amount due.
    pub total: Decimal,
}

impl InvoicePosting {
    /// Dr Accounts Receivable for the total, Cr revenue for the subtotal and
    /// Cr each GST account with a positive tax.
    ///
    /// Returns `None` for a zero-total invoice, which posts nothing.
    #[must_use]
    pub fn draft(&self) -> Option<PostingDraft> {
        if self.total <= Decimal::ZERO {
            return None;
        }

        let mut lines = vec![
            DraftLine::debit(codes::ACCOUNTS_RECEIVABLE, self.total).described("Accounts Receivable"),
            DraftLine::credit(codes::SERVICE_REVENUE, self.subtotal).described("Revenue"),
        ];
        for (code, amount, label) in [
            (codes::CGST_PAYABLE, self.cgst, "CGST Payable"),
            (codes::SGST_PAYABLE, self.sgst, "SGST Payable"),
            (codes::IGST_PAYABLE, self.igst, "IGST Payable"),
        ] {
            if amount > Decimal::ZERO {
                lines.push(DraftLine::credit(code, amount).described(label));
            }
        }

        Some(PostingDraft {
            entry_date: self.issue_date,
            description: format!("Invoice {} - {}", self.invoice_number, self.client_name),
            reference: Some(self.invoice_number.clone()),
            source: EntrySource::Invoice,
            source_id: Some(self.invoice_id),
            lines,
        })
    }
}

/// A payment received against an invoice.
#[derive(Debug, Clone)]
pub struct PaymentPosting {
    /// Invoice the payment settles.
    pub invoice_id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Amount received.
    pub amount: Decimal,
}

impl PaymentPosting {
    /// Dr Bank, Cr Accounts Receivable.
    #[must_use]
    pub fn draft(&self) -> PostingDraft {
        PostingDraft {
            entry_date: self.payment_date,
            description: format!("Payment received - {}", self.invoice_number),
            reference: Some(self.invoice_number.clone()),
            source: EntrySource::Payment,
            source_id: Some(self.invoice_id),
            lines: vec![
                DraftLine::debit(codes::BANK, self.amount),
                DraftLine::credit(codes::ACCOUNTS_RECEIVABLE, self.amount),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerService;
    use crate::posting::draft::AccountRef;
    use rust_decimal_macros::dec;

    fn invoice(subtotal: Decimal, cgst: Decimal, sgst: Decimal, igst: Decimal) -> InvoicePosting {
        InvoicePosting {
            invoice_id: Uuid::new_v4(),
            invoice_number: "INV-0042".to_string(),
            client_name: "Acme Traders".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            subtotal,
            cgst,
            sgst,
            igst,
            total: subtotal + cgst + sgst + igst,
        }
    }

    fn code_of(line: &DraftLine) -> &str {
        match &line.account {
            AccountRef::Code(c) => c,
            AccountRef::Id(_) => "",
        }
    }

    #[test]
    fn test_intra_state_invoice_splits_cgst_and_sgst() {
        let inv = invoice(dec!(1000.00), dec!(90.00), dec!(90.00), dec!(0));
        let draft = inv.draft().unwrap();

        assert_eq!(draft.description, "Invoice INV-0042 - Acme Traders");
        assert_eq!(draft.reference.as_deref(), Some("INV-0042"));
        assert_eq!(draft.source, EntrySource::Invoice);
        assert_eq!(draft.source_id, Some(inv.invoice_id));

        let codes: Vec<&str> = draft.lines.iter().map(code_of).collect();
        assert_eq!(codes, vec!["1100", "4010", "2110", "2120"]);
        assert_eq!(draft.lines[0].debit, dec!(1180.00));
        assert_eq!(draft.lines[1].credit, dec!(1000.00));
        assert_eq!(draft.lines[3].description.as_deref(), Some("SGST Payable"));
    }

    #[test]
    fn test_inter_state_invoice_uses_igst_only() {
        let draft = invoice(dec!(500), dec!(0), dec!(0), dec!(90)).draft().unwrap();
        let codes: Vec<&str> = draft.lines.iter().map(code_of).collect();
        assert_eq!(codes, vec!["1100", "4010", "2130"]);
    }

    #[test]
    fn test_invoice_draft_balances_once_resolved() {
        let draft = invoice(dec!(1000.00), dec!(90.00), dec!(90.00), dec!(0)).draft().unwrap();
        let entry = draft.resolve(Uuid::new_v4(), None, |_| Some(Uuid::new_v4())).unwrap();
        let plan = LedgerService::prepare(&entry).unwrap();
        assert_eq!(plan.total_debit, dec!(1180.00));
    }

    #[test]
    fn test_zero_invoice_posts_nothing() {
        assert!(invoice(dec!(0), dec!(0), dec!(0), dec!(0)).draft().is_none());
    }

    #[test]
    fn test_payment_draft() {
        let payment = PaymentPosting {
            invoice_id: Uuid::new_v4(),
            invoice_number: "INV-0042".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            amount: dec!(590.00),
        };
        let draft = payment.draft();
        assert_eq!(draft.description, "Payment received - INV-0042");
        assert_eq!(draft.source, EntrySource::Payment);
        assert_eq!(draft.source_id, Some(payment.invoice_id));
        assert_eq!(draft.codes(), vec!["1020", "1100"]);
        assert_eq!(draft.lines[0].debit, dec!(590.00));
        assert_eq!(draft.lines[1].credit, dec!(590.00));
    }
}
