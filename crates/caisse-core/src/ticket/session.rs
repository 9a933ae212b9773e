//! Explicit state of one register session.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::{compute_totals, Totals};
use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::discount::Discount;
use crate::held::HeldTickets;
use crate::invoice::{InvoiceCounter, InvoiceId};
use crate::keypad::{DiscountInput, NumericEntry};
use crate::ledger::Ledger;
use crate::types::{PaymentMethod, Product, Seller, UserRole};

// =============================================================================
// Phase
// =============================================================================

/// Which dialog, if any, the active ticket is in.
///
/// ```text
///                ┌──────────── Dismiss / Enter ────────────┐
///                ▼                                         │
///   ┌──────────────────┐  OpenDiscount   ┌──────────────────┴─┐
///   │     Building     │ ──────────────► │ Discount{input}    │
///   └──┬───┬───┬───┬───┘                 └────────────────────┘
///      │   │   │   │ OpenPayment  ┌─────────────────┐ SubmitPayment ┌──────────────────┐
///      │   │   │   └────────────► │ AwaitingPayment │ ────────────► │ Receipt{Some(tx)}│
///      │   │   │                  └─────────────────┘               └──────────────────┘
///      │   │   │ PrintReceipt     ┌──────────────────┐
///      │   │   └────────────────► │ Receipt{None}    │
///      │   │ Cancel               ├──────────────────┤
///      │   └────────────────────► │ ConfirmCancel    │ ── Confirm ──► Building (cleared)
///      │ RequestVoid              ├──────────────────┤
///      └────────────────────────► │ ConfirmVoid{tx}  │ ── Confirm ──► Building (voided)
///                                 └──────────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Building,
    Discount {
        input: DiscountInput,
    },
    AwaitingPayment,
    /// `None` previews the active ticket; `Some` shows a paid transaction.
    Receipt {
        transaction_id: Option<Uuid>,
    },
    ConfirmCancel,
    ConfirmVoid {
        transaction_id: Uuid,
    },
}

impl Phase {
    pub fn is_building(&self) -> bool {
        matches!(self, Phase::Building)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::Building => "building a ticket",
            Phase::Discount { .. } => "editing the discount",
            Phase::AwaitingPayment => "awaiting payment",
            Phase::Receipt { .. } => "showing a receipt",
            Phase::ConfirmCancel => "confirming a cancellation",
            Phase::ConfirmVoid { .. } => "confirming a void",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Everything the ticket lifecycle reads and writes.
///
/// Only the reducer in [`crate::ticket::apply`] produces new sessions; the
/// fields are readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) cart: Cart,
    pub(crate) discount: Discount,
    pub(crate) invoice_counter: InvoiceCounter,
    pub(crate) active_invoice: InvoiceId,
    pub(crate) seller: Option<Seller>,
    pub(crate) selected_product: Option<Arc<Product>>,
    pub(crate) entry: NumericEntry,
    pub(crate) phase: Phase,
    pub(crate) held: HeldTickets,
    pub(crate) ledger: Ledger,
}

impl Session {
    /// A fresh session: empty ticket `INV-0001`, no seller.
    pub fn new() -> Self {
        let invoice_counter = InvoiceCounter::new();
        Session {
            cart: Cart::new(),
            discount: Discount::NONE,
            active_invoice: invoice_counter.current_id(),
            invoice_counter,
            seller: None,
            selected_product: None,
            entry: NumericEntry::new(),
            phase: Phase::Building,
            held: HeldTickets::new(),
            ledger: Ledger::new(),
        }
    }

    /// A fresh session attributed to `seller`.
    pub fn with_seller(seller: Seller) -> Self {
        Session {
            seller: Some(seller),
            ..Session::new()
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn invoice_counter(&self) -> &InvoiceCounter {
        &self.invoice_counter
    }

    /// Invoice id of the ticket being built.
    pub fn active_invoice(&self) -> &InvoiceId {
        &self.active_invoice
    }

    pub fn seller(&self) -> Option<&Seller> {
        self.seller.as_ref()
    }

    /// Seller name as recorded on tickets.
    pub fn seller_name(&self) -> Option<String> {
        self.seller.as_ref().map(|s| s.name.clone())
    }

    pub fn selected_product(&self) -> Option<&Arc<Product>> {
        self.selected_product.as_ref()
    }

    pub fn entry(&self) -> &NumericEntry {
        &self.entry
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn held(&self) -> &HeldTickets {
        &self.held
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Totals of the active ticket, derived on demand.
    pub fn totals(&self) -> Totals {
        compute_totals(self.cart.lines(), self.discount)
    }

    /// The day can be closed once no ticket is in progress or held.
    pub fn can_close_day(&self) -> bool {
        self.cart.is_empty() && self.held.is_empty()
    }

    /// Payment methods offered to the session user.
    pub fn available_payment_methods<'c>(
        &self,
        catalog: &'c Catalog,
        role: UserRole,
    ) -> Vec<&'c PaymentMethod> {
        catalog.payment_methods_for(role)
    }

    /// Clears the ticket being built. The invoice id stays.
    pub(crate) fn reset_ticket(&mut self) {
        self.cart.clear();
        self.selected_product = None;
        self.entry.reset();
        self.discount = Discount::NONE;
    }

    /// Clears the ticket and moves to the next invoice id.
    pub(crate) fn reset_for_next_invoice(&mut self) {
        self.reset_ticket();
        self.active_invoice = self.invoice_counter.advance();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
