//! # Receipt
//!
//! Printable data for a ticket, either the active one (preview) or a sale
//! already recorded in the ledger.
//!
//! ```text
//! ┌────────────────────────────┐
//! │   establishment header     │
//! │   invoice · date · seller  │
//! ├────────────────────────────┤
//! │   name   qty  unit  total  │  ◄── one ReceiptLine per cart line
//! ├────────────────────────────┤
//! │   totals + VAT breakdown   │
//! │   payment method (+ room)  │  ◄── only once paid
//! ├────────────────────────────┤
//! │   footer messages          │
//! └────────────────────────────┘
//! ```
//!
//! Rendering belongs to the caller; everything here is serde data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::calculator::{compute_totals, Totals};
use crate::cart::{article_count, CartLineItem};
use crate::discount::Discount;
use crate::invoice::InvoiceId;
use crate::ledger::CompletedTransaction;
use crate::money::Money;
use crate::ticket::Session;
use crate::types::EstablishmentDetails;

/// Printed when the ticket has no seller.
pub const UNKNOWN_SELLER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// Unit price × quantity, before the ticket discount.
    pub line_total: Money,
}

impl From<&CartLineItem> for ReceiptLine {
    fn from(line: &CartLineItem) -> Self {
        ReceiptLine {
            name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptPayment {
    pub transaction_id: Uuid,
    /// Payment method label.
    pub method: String,
    pub room_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub invoice_id: InvoiceId,
    pub issued_at: DateTime<Utc>,
    pub seller_name: String,
    pub lines: Vec<ReceiptLine>,
    pub discount: Discount,
    pub totals: Totals,
    pub article_count: u64,
    /// `None` on a preview.
    pub payment: Option<ReceiptPayment>,
    pub establishment: EstablishmentDetails,
}

impl Receipt {
    /// Receipt of the ticket being built, dated `now`.
    pub fn preview(
        session: &Session,
        establishment: &EstablishmentDetails,
        now: DateTime<Utc>,
    ) -> Self {
        let lines = session.cart().lines();
        Receipt {
            invoice_id: session.active_invoice().clone(),
            issued_at: now,
            seller_name: seller_or_unknown(session.seller_name()),
            lines: lines.iter().map(ReceiptLine::from).collect(),
            discount: session.discount(),
            totals: compute_totals(lines, session.discount()),
            article_count: article_count(lines),
            payment: None,
            establishment: establishment.clone(),
        }
    }

    /// Receipt of a recorded sale, as it was when paid.
    pub fn for_transaction(
        transaction: &CompletedTransaction,
        establishment: &EstablishmentDetails,
    ) -> Self {
        Receipt {
            invoice_id: transaction.invoice_id.clone(),
            issued_at: transaction.completed_at,
            seller_name: seller_or_unknown(transaction.seller_name.clone()),
            lines: transaction.lines.iter().map(ReceiptLine::from).collect(),
            discount: transaction.discount,
            totals: transaction.totals.clone(),
            article_count: transaction.article_count(),
            payment: Some(ReceiptPayment {
                transaction_id: transaction.id,
                method: transaction.payment_method.clone(),
                room_number: transaction.room_number.clone(),
            }),
            establishment: establishment.clone(),
        }
    }

    pub fn is_preview(&self) -> bool {
        self.payment.is_none()
    }

    /// Amount formatted in the establishment currency.
    pub fn format(&self, amount: Money) -> String {
        amount.format_with(&self.establishment.currency)
    }
}

fn seller_or_unknown(name: Option<String>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_SELLER.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ticket::{apply, Action, Context};
    use crate::types::UserRole;
    use chrono::TimeZone;

    fn paid_session(ctx: &Context<'_>) -> Session {
        let mut session = Session::new();
        for action in [
            Action::AddItem {
                product_id: "prod_salade_fes_inn".to_string(),
                quantity: 2,
            },
            Action::ApplyDiscount {
                input: "10".to_string(),
            },
            Action::OpenPayment,
            Action::SubmitPayment {
                method_id: "room_transfer".to_string(),
                room_number: Some("12".to_string()),
            },
        ] {
            session = apply(&session, action, ctx).unwrap().session;
        }
        session
    }

    #[test]
    fn test_preview_of_active_ticket() {
        let catalog = Catalog::builtin();
        let ctx = Context::new(&catalog, UserRole::Cashier, Utc::now(), Uuid::new_v4());
        let session = apply(
            &Session::new(),
            Action::AddItem {
                product_id: "prod_salade_fes_inn".to_string(),
                quantity: 3,
            },
            &ctx,
        )
        .unwrap()
        .session;

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let receipt = Receipt::preview(&session, &EstablishmentDetails::default(), now);

        assert!(receipt.is_preview());
        assert_eq!(receipt.invoice_id.as_str(), "INV-0001");
        assert_eq!(receipt.seller_name, UNKNOWN_SELLER);
        assert_eq!(receipt.issued_at, now);
        assert_eq!(receipt.article_count, 3);
        assert_eq!(receipt.lines[0].name, "Salade FES INN");
        assert_eq!(receipt.lines[0].line_total, Money::from_cents(21000));
        assert_eq!(receipt.totals, session.totals());
    }

    #[test]
    fn test_receipt_for_transaction() {
        let catalog = Catalog::builtin();
        let ctx = Context::new(&catalog, UserRole::Cashier, Utc::now(), Uuid::new_v4());
        let session = paid_session(&ctx);
        let sale = session.ledger().latest().unwrap();

        let receipt = Receipt::for_transaction(sale, &EstablishmentDetails::default());
        let payment = receipt.payment.as_ref().unwrap();

        assert_eq!(payment.transaction_id, ctx.entity_id);
        assert_eq!(payment.method, "Transfert Chambre");
        assert_eq!(payment.room_number.as_deref(), Some("12"));
        assert_eq!(receipt.invoice_id.as_str(), "INV-0001");
        assert_eq!(receipt.issued_at, ctx.now);
        assert_eq!(receipt.format(receipt.totals.total_tax_inclusive), "126,00 €");
    }

    #[test]
    fn test_blank_seller_prints_unknown() {
        assert_eq!(seller_or_unknown(Some("  ".to_string())), UNKNOWN_SELLER);
        assert_eq!(seller_or_unknown(Some("Marie".to_string())), "Marie");
    }
}
