//! # Ticket Lifecycle
//!
//! A pure reducer over an explicit [`Session`].
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   &Session + Action + &Context                                          │
//! │            │                                                            │
//! │            ▼                                                            │
//! │        apply()  ── guard fails ──► Err(CoreError)   (session untouched) │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   Transition { session: new Session, outcome }                          │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   caller swaps the new session in                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ticket States
//! - **in progress**: the cart of the session, under the active invoice id
//! - **held**: a snapshot in [`HeldTickets`](crate::held::HeldTickets)
//! - **paid**: a [`CompletedTransaction`] in the ledger
//! - **discarded**: cleared after a confirmed cancel
//!
//! ## Invoice Numbers
//! Every id that leaves the active slot (paid or held) advances the counter
//! exactly once, so no two tickets ever share an id.

mod action;
mod session;

pub use action::{Action, Context};
pub use session::{Phase, Session};

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::calculator::compute_totals;
use crate::cart::Cart;
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::held::HeldTicket;
use crate::invoice::InvoiceId;
use crate::keypad::{DiscountInput, Key};
use crate::ledger::CompletedTransaction;
use crate::money::Money;
use crate::types::{Product, Seller};
use crate::validation::validate_room_number;

// =============================================================================
// Transition Result
// =============================================================================

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Session changed; nothing more to report.
    Updated,
    Held {
        ticket_id: Uuid,
        invoice_id: InvoiceId,
    },
    Retrieved {
        ticket_id: Uuid,
        invoice_id: InvoiceId,
    },
    /// A new ticket was started; `auto_held` names the ticket that was
    /// held to make room for it.
    NewTicket {
        invoice_id: InvoiceId,
        auto_held: Option<Uuid>,
    },
    Paid {
        transaction_id: Uuid,
        invoice_id: InvoiceId,
        total: Money,
    },
    /// The ticket was cleared (cancel).
    Cleared,
    /// A sale was removed from the ledger.
    Voided { transaction: Box<CompletedTransaction> },
    /// Accepted, but there was nothing to act on.
    Ignored(Ignored),
}

/// Why an action was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ignored {
    HeldTicketNotFound,
    TransactionNotFound,
    NothingToDismiss,
    KeyNotApplicable,
}

/// Result of a successful [`apply`].
#[derive(Debug, Clone)]
pub struct Transition {
    pub session: Session,
    pub outcome: Outcome,
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies an action to a session.
///
/// # Errors
///
/// Returns an error when a guard rejects the action (wrong phase, empty
/// ticket, missing privilege, invalid input). The input session is never
/// modified; on error there is simply no new session.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use uuid::Uuid;
/// use caisse_core::catalog::Catalog;
/// use caisse_core::ticket::{apply, Action, Context, Session};
/// use caisse_core::types::UserRole;
///
/// let catalog = Catalog::builtin();
/// let ctx = Context::new(&catalog, UserRole::Cashier, Utc::now(), Uuid::new_v4());
///
/// let session = Session::new();
/// let next = apply(
///     &session,
///     Action::AddItem { product_id: "prod_pizza_margarita".into(), quantity: 2 },
///     &ctx,
/// )
/// .unwrap()
/// .session;
///
/// assert_eq!(next.cart().article_count(), 2);
/// assert!(session.cart().is_empty());
/// ```
pub fn apply(session: &Session, action: Action, ctx: &Context<'_>) -> CoreResult<Transition> {
    let mut next = session.clone();
    let outcome = next.reduce(action, ctx)?;
    Ok(Transition {
        session: next,
        outcome,
    })
}

impl Session {
    fn reduce(&mut self, action: Action, ctx: &Context<'_>) -> CoreResult<Outcome> {
        let operation = action.operation();
        if action.starts_from_ticket_screen() {
            self.require_building(operation)?;
        }

        match action {
            Action::SelectSeller { seller_id } => {
                let user = ctx
                    .catalog
                    .seller(&seller_id)
                    .ok_or(CoreError::SellerNotFound(seller_id))?;
                self.seller = Some(Seller::from(user));
                Ok(Outcome::Updated)
            }
            Action::SelectProduct { product_id } => {
                let product = lookup_product(ctx, product_id)?;
                let quantity = self.entry.quantity().unwrap_or(1);
                self.cart.add_item(Arc::clone(&product), i64::from(quantity))?;
                self.selected_product = Some(product);
                self.entry.reset();
                Ok(Outcome::Updated)
            }
            Action::AddItem {
                product_id,
                quantity,
            } => {
                let product = lookup_product(ctx, product_id)?;
                self.cart.add_item(product, quantity)?;
                Ok(Outcome::Updated)
            }
            Action::SetQuantity {
                product_id,
                quantity,
            } => {
                self.cart.set_quantity(&product_id, quantity);
                Ok(Outcome::Updated)
            }
            Action::RemoveItem { product_id } => {
                self.cart.remove_item(&product_id);
                Ok(Outcome::Updated)
            }
            Action::Key { key } => self.press_key(key),
            Action::StartNewTicket => {
                let auto_held = if self.cart.is_empty() {
                    self.reset_for_next_invoice();
                    None
                } else {
                    Some(self.hold(ctx))
                };
                Ok(Outcome::NewTicket {
                    invoice_id: self.active_invoice.clone(),
                    auto_held,
                })
            }
            Action::Hold => {
                self.require_items(operation)?;
                let invoice_id = self.active_invoice.clone();
                let ticket_id = self.hold(ctx);
                Ok(Outcome::Held {
                    ticket_id,
                    invoice_id,
                })
            }
            Action::Retrieve { ticket_id } => self.retrieve(ticket_id, ctx),
            Action::OpenDiscount => {
                self.require_items(operation)?;
                let input = if self.discount.is_zero() {
                    DiscountInput::new()
                } else {
                    DiscountInput::prefilled(self.discount.value().normalize().to_string())
                };
                self.phase = Phase::Discount { input };
                Ok(Outcome::Updated)
            }
            Action::ApplyDiscount { input } => self.apply_discount(&input),
            Action::PrintReceipt => {
                self.require_items(operation)?;
                self.phase = Phase::Receipt {
                    transaction_id: None,
                };
                Ok(Outcome::Updated)
            }
            Action::OpenPayment => {
                self.require_items(operation)?;
                self.phase = Phase::AwaitingPayment;
                Ok(Outcome::Updated)
            }
            Action::SubmitPayment {
                method_id,
                room_number,
            } => self.submit_payment(&method_id, room_number.as_deref(), ctx),
            Action::Cancel => {
                if self.cart.is_empty() && self.entry.is_empty() {
                    self.reset_ticket();
                    Ok(Outcome::Cleared)
                } else {
                    self.phase = Phase::ConfirmCancel;
                    Ok(Outcome::Updated)
                }
            }
            Action::Confirm => self.confirm(),
            Action::RequestVoid { transaction_id } => {
                if !ctx.role.is_privileged() {
                    return Err(CoreError::NotPrivileged { operation });
                }
                if self.ledger.get(&transaction_id).is_none() {
                    return Ok(Outcome::Ignored(Ignored::TransactionNotFound));
                }
                self.phase = Phase::ConfirmVoid { transaction_id };
                Ok(Outcome::Updated)
            }
            Action::Dismiss => Ok(self.dismiss()),
        }
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    fn require_building(&self, operation: &'static str) -> CoreResult<()> {
        if self.phase.is_building() {
            Ok(())
        } else {
            Err(self.invalid_phase(operation))
        }
    }

    fn require_items(&self, operation: &'static str) -> CoreResult<()> {
        if self.cart.is_empty() {
            Err(CoreError::EmptyCart { operation })
        } else {
            Ok(())
        }
    }

    fn invalid_phase(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidPhase {
            operation,
            phase: self.phase.to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Hold / Retrieve
    // -------------------------------------------------------------------------

    /// Snapshots the active ticket into the held store and prepares the next
    /// invoice id. The caller checks the cart is not empty.
    fn hold(&mut self, ctx: &Context<'_>) -> Uuid {
        let ticket = HeldTicket {
            id: ctx.entity_id,
            held_at: ctx.now,
            lines: self.cart.snapshot(),
            seller_name: self.seller_name(),
            discount: self.discount,
            invoice_id: self.active_invoice.clone(),
        };
        self.held.hold(ticket);
        self.reset_for_next_invoice();
        ctx.entity_id
    }

    fn retrieve(&mut self, ticket_id: Uuid, ctx: &Context<'_>) -> CoreResult<Outcome> {
        if !self.cart.is_empty() {
            return Err(CoreError::CartNotEmpty);
        }

        let Some(ticket) = self.held.take(&ticket_id) else {
            return Ok(Outcome::Ignored(Ignored::HeldTicketNotFound));
        };

        self.reset_ticket();
        self.cart = Cart::from_lines(ticket.lines);
        self.discount = ticket.discount;
        self.active_invoice = ticket.invoice_id.clone();

        let seller = ticket
            .seller_name
            .as_deref()
            .and_then(|name| ctx.catalog.seller_by_name(name));
        if let Some(user) = seller {
            self.seller = Some(Seller::from(user));
        }

        Ok(Outcome::Retrieved {
            ticket_id,
            invoice_id: ticket.invoice_id,
        })
    }

    // -------------------------------------------------------------------------
    // Keypad
    // -------------------------------------------------------------------------

    fn press_key(&mut self, key: Key) -> CoreResult<Outcome> {
        match self.phase {
            Phase::Discount { .. } => self.press_discount_key(key),
            Phase::Building => Ok(self.press_entry_key(key)),
            _ => Err(self.invalid_phase("use the keypad")),
        }
    }

    fn press_entry_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Qty => self.entry.enter_quantity_mode(),
            Key::Enter => self.commit_entry(),
            Key::Backspace => self.entry.backspace(),
            Key::Clear => self.entry.clear(),
            Key::Digit(_) | Key::Point => match key.as_char() {
                Some(ch) => self.entry.push(ch),
                None => return Outcome::Ignored(Ignored::KeyNotApplicable),
            },
        }
        Outcome::Updated
    }

    fn press_discount_key(&mut self, key: Key) -> CoreResult<Outcome> {
        let Phase::Discount { input } = &mut self.phase else {
            return Ok(Outcome::Ignored(Ignored::KeyNotApplicable));
        };

        match key {
            Key::Enter => {
                let text = input.as_str().to_string();
                return self.apply_discount(&text);
            }
            Key::Backspace => input.backspace(),
            Key::Clear => input.clear(),
            Key::Qty => return Ok(Outcome::Ignored(Ignored::KeyNotApplicable)),
            Key::Digit(_) | Key::Point => match key.as_char() {
                Some(ch) => input.push(ch),
                None => return Ok(Outcome::Ignored(Ignored::KeyNotApplicable)),
            },
        }
        Ok(Outcome::Updated)
    }

    /// Enter outside the discount dialog: a quantity typed after `Qty`
    /// overwrites the selected product's line, or adds it.
    fn commit_entry(&mut self) {
        if self.entry.is_quantity_mode() {
            if let (Some(quantity), Some(product)) =
                (self.entry.quantity(), self.selected_product.clone())
            {
                self.cart.put_quantity(product, quantity);
            }
        }
        self.entry.reset();
    }

    // -------------------------------------------------------------------------
    // Discount
    // -------------------------------------------------------------------------

    fn apply_discount(&mut self, input: &str) -> CoreResult<Outcome> {
        let operation = "apply a discount";
        if !matches!(self.phase, Phase::Building | Phase::Discount { .. }) {
            return Err(self.invalid_phase(operation));
        }
        self.require_items(operation)?;

        self.discount = Discount::parse(input)?;
        self.phase = Phase::Building;
        Ok(Outcome::Updated)
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    /// Finalizes the sale in one step: record, advance the counter, reset
    /// the ticket, show the receipt.
    fn submit_payment(
        &mut self,
        method_id: &str,
        room_number: Option<&str>,
        ctx: &Context<'_>,
    ) -> CoreResult<Outcome> {
        let operation = "submit a payment";
        if self.phase != Phase::AwaitingPayment {
            return Err(self.invalid_phase(operation));
        }
        self.require_items(operation)?;

        let method = ctx
            .catalog
            .payment_method(method_id)
            .ok_or_else(|| CoreError::PaymentMethodNotFound(method_id.to_string()))?;
        if !method.is_available_to(ctx.role) {
            return Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                value: method.label.clone(),
            }
            .into());
        }
        let room_number = if method.requires_room_number {
            Some(validate_room_number(room_number)?)
        } else {
            None
        };

        let totals = compute_totals(self.cart.lines(), self.discount);
        let total = totals.total_tax_inclusive;
        let invoice_id = self.active_invoice.clone();
        let transaction = CompletedTransaction {
            id: ctx.entity_id,
            invoice_id: invoice_id.clone(),
            completed_at: ctx.now,
            lines: self.cart.snapshot(),
            seller_name: self.seller_name(),
            payment_method: method.label.clone(),
            room_number,
            discount: self.discount,
            totals,
        };

        self.ledger.record(transaction);
        self.reset_for_next_invoice();
        self.phase = Phase::Receipt {
            transaction_id: Some(ctx.entity_id),
        };

        Ok(Outcome::Paid {
            transaction_id: ctx.entity_id,
            invoice_id,
            total,
        })
    }

    // -------------------------------------------------------------------------
    // Dialogs
    // -------------------------------------------------------------------------

    fn confirm(&mut self) -> CoreResult<Outcome> {
        match self.phase {
            Phase::ConfirmCancel => {
                self.reset_ticket();
                self.phase = Phase::Building;
                Ok(Outcome::Cleared)
            }
            Phase::ConfirmVoid { transaction_id } => {
                self.phase = Phase::Building;
                match self.ledger.remove(&transaction_id) {
                    Some(transaction) => Ok(Outcome::Voided {
                        transaction: Box::new(transaction),
                    }),
                    None => Ok(Outcome::Ignored(Ignored::TransactionNotFound)),
                }
            }
            _ => Err(self.invalid_phase("confirm")),
        }
    }

    fn dismiss(&mut self) -> Outcome {
        if self.phase.is_building() {
            return Outcome::Ignored(Ignored::NothingToDismiss);
        }
        self.phase = Phase::Building;
        Outcome::Updated
    }
}

fn lookup_product(ctx: &Context<'_>, product_id: String) -> CoreResult<Arc<Product>> {
    ctx.catalog
        .product(&product_id)
        .cloned()
        .ok_or(CoreError::ProductNotFound(product_id))
}

// =============================================================================
// Unit Tests
// =============================================================================
