//! # Held Tickets
//!
//! Suspended, unpaid tickets waiting to be retrieved.
//!
//! ```text
//! Active ticket ──hold──► HeldTickets ──take (retrieve)──► Active ticket
//!                           (snapshot)      at most once
//! ```
//!
//! A held ticket is an immutable snapshot. Retrieving it consumes it: the
//! same id can never be retrieved twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::{compute_totals, Totals};
use crate::cart::{article_count, CartLineItem};
use crate::discount::Discount;
use crate::invoice::InvoiceId;

/// Snapshot of a suspended ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldTicket {
    pub id: Uuid,
    pub held_at: DateTime<Utc>,
    /// Deep copy of the cart lines at hold time.
    pub lines: Vec<CartLineItem>,
    pub seller_name: Option<String>,
    pub discount: Discount,
    pub invoice_id: InvoiceId,
}

impl HeldTicket {
    pub fn article_count(&self) -> u64 {
        article_count(&self.lines)
    }

    /// Totals the ticket would have if it were paid now.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lines, self.discount)
    }
}

/// Held tickets in the order they were held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldTickets {
    tickets: Vec<HeldTicket>,
}

impl HeldTickets {
    pub fn new() -> Self {
        HeldTickets::default()
    }

    /// Stores a snapshot.
    pub fn hold(&mut self, ticket: HeldTicket) {
        self.tickets.push(ticket);
    }

    pub fn get(&self, id: &Uuid) -> Option<&HeldTicket> {
        self.tickets.iter().find(|t| t.id == *id)
    }

    /// Removes and returns the ticket (retrieval).
    pub fn take(&mut self, id: &Uuid) -> Option<HeldTicket> {
        let index = self.tickets.iter().position(|t| t.id == *id)?;
        Some(self.tickets.remove(index))
    }

    /// Drops the ticket. Returns whether it existed.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.take(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeldTicket> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
