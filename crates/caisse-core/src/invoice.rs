//! Human-facing invoice numbers.
//!
//! ```text
//!   counter: 1 ──advance──► 2 ──advance──► 3
//!   id:      INV-0001       INV-0002       INV-0003
//! ```
//!
//! The counter only moves forward. An id that left the active slot (paid or
//! held) is never handed out again; gaps are allowed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::INVOICE_PREFIX;

/// A rendered invoice number such as `INV-0042`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Renders a counter value: prefix plus at least four digits.
    pub fn from_number(number: u64) -> Self {
        InvoiceId(format!("{}{:04}", INVOICE_PREFIX, number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The counter value this id was rendered from, if it is well formed.
    pub fn number(&self) -> Option<u64> {
        self.0.strip_prefix(INVOICE_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic invoice counter. Starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCounter {
    next: u64,
}

impl InvoiceCounter {
    pub fn new() -> Self {
        InvoiceCounter { next: 1 }
    }

    /// Current counter value.
    pub fn value(&self) -> u64 {
        self.next
    }

    /// Id for the current counter value.
    pub fn current_id(&self) -> InvoiceId {
        InvoiceId::from_number(self.next)
    }

    /// Moves to the next number and returns its id.
    pub fn advance(&mut self) -> InvoiceId {
        self.next = self.next.saturating_add(1);
        self.current_id()
    }
}

impl Default for InvoiceCounter {
    fn default() -> Self {
        Self::new()
    }
}
