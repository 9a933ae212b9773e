//! Operator intent as data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::keypad::Key;
use crate::types::UserRole;

/// An action requested by the operator.
///
/// Actions are the only way to change a [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Attribute the ticket to another seller.
    SelectSeller { seller_id: String },
    /// Tap a product: select it and add the buffered quantity (or 1).
    SelectProduct { product_id: String },
    AddItem { product_id: String, quantity: i64 },
    SetQuantity { product_id: String, quantity: i64 },
    RemoveItem { product_id: String },
    /// Keypad press.
    Key { key: Key },
    /// Start a new ticket, holding the current one if it has lines.
    StartNewTicket,
    Hold,
    Retrieve { ticket_id: Uuid },
    OpenDiscount,
    ApplyDiscount { input: String },
    /// Preview the receipt of the active ticket.
    PrintReceipt,
    OpenPayment,
    SubmitPayment {
        method_id: String,
        room_number: Option<String>,
    },
    Cancel,
    Confirm,
    RequestVoid { transaction_id: Uuid },
    /// Close the open dialog without side effects.
    Dismiss,
}

impl Action {
    /// Short description used in error messages and logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Action::SelectSeller { .. } => "select a seller",
            Action::SelectProduct { .. } => "select a product",
            Action::AddItem { .. } => "add an item",
            Action::SetQuantity { .. } => "change a quantity",
            Action::RemoveItem { .. } => "remove an item",
            Action::Key { .. } => "use the keypad",
            Action::StartNewTicket => "start a new ticket",
            Action::Hold => "hold the ticket",
            Action::Retrieve { .. } => "retrieve a held ticket",
            Action::OpenDiscount => "open the discount",
            Action::ApplyDiscount { .. } => "apply a discount",
            Action::PrintReceipt => "print a receipt",
            Action::OpenPayment => "take payment",
            Action::SubmitPayment { .. } => "submit a payment",
            Action::Cancel => "cancel the ticket",
            Action::Confirm => "confirm",
            Action::RequestVoid { .. } => "void a sale",
            Action::Dismiss => "dismiss",
        }
    }

    /// Whether the action needs the ticket screen with no dialog open.
    ///
    /// Keypad presses, discount entry, payment submission and dialog
    /// answers check their own phase.
    pub fn starts_from_ticket_screen(&self) -> bool {
        !matches!(
            self,
            Action::Key { .. }
                | Action::ApplyDiscount { .. }
                | Action::SubmitPayment { .. }
                | Action::Confirm
                | Action::Dismiss
        )
    }
}

/// Everything the reducer needs besides the session itself.
///
/// Time and fresh ids come from here, never from the system, so a
/// transition can be replayed exactly.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub catalog: &'a Catalog,
    /// Role of the logged-in session user.
    pub role: UserRole,
    pub now: DateTime<Utc>,
    /// Id given to a held ticket or transaction created by this action.
    pub entity_id: Uuid,
}

impl<'a> Context<'a> {
    pub fn new(catalog: &'a Catalog, role: UserRole, now: DateTime<Utc>, entity_id: Uuid) -> Self {
        Context {
            catalog,
            role,
            now,
            entity_id,
        }
    }
}
