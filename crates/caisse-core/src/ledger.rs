//! # Transaction Ledger
//!
//! Completed sales of the session, most recent first.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(tx @ 12:05)                                                     │
//! │                                                                         │
//! │  [ 12:10 ][ 12:05 ][ 11:58 ]   ──►   [ 12:10 ][ tx ][ 12:05 ][ 11:58 ]  │
//! │                                                                         │
//! │  Inserted before the first entry that is not strictly newer, so a       │
//! │  sale recorded at the same instant as another shows up first.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Voiding is a hard removal. The removed entry is handed back to the caller
//! so it can be logged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::Totals;
use crate::cart::{article_count, CartLineItem};
use crate::discount::Discount;
use crate::invoice::InvoiceId;

// =============================================================================
// Completed Transaction
// =============================================================================

/// An immutable record of a paid ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTransaction {
    pub id: Uuid,
    pub invoice_id: InvoiceId,
    pub completed_at: DateTime<Utc>,
    /// Deep copy of the cart lines at payment time.
    pub lines: Vec<CartLineItem>,
    pub seller_name: Option<String>,
    /// Payment method label ("Espèce", "Carte Crédit", ...).
    pub payment_method: String,
    pub room_number: Option<String>,
    pub discount: Discount,
    pub totals: Totals,
}

impl CompletedTransaction {
    /// Completion time as an RFC 3339 string.
    pub fn date_iso(&self) -> String {
        self.completed_at.to_rfc3339()
    }

    pub fn article_count(&self) -> u64 {
        article_count(&self.lines)
    }

    /// Calendar day of completion (UTC).
    pub fn date(&self) -> NaiveDate {
        self.completed_at.date_naive()
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Session-scoped list of completed transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<CompletedTransaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Records a sale, keeping the list ordered most recent first.
    pub fn record(&mut self, transaction: CompletedTransaction) {
        let index = self
            .entries
            .partition_point(|e| e.completed_at > transaction.completed_at);
        self.entries.insert(index, transaction);
    }

    pub fn get(&self, id: &Uuid) -> Option<&CompletedTransaction> {
        self.entries.iter().find(|e| e.id == *id)
    }

    pub fn find_by_invoice(&self, invoice_id: &str) -> Option<&CompletedTransaction> {
        self.entries
            .iter()
            .find(|e| e.invoice_id.as_str() == invoice_id)
    }

    /// Hard removal (void). Returns the removed entry.
    pub fn remove(&mut self, id: &Uuid) -> Option<CompletedTransaction> {
        let index = self.entries.iter().position(|e| e.id == *id)?;
        Some(self.entries.remove(index))
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &CompletedTransaction> {
        self.entries.iter()
    }

    /// The most recent sale.
    pub fn latest(&self) -> Option<&CompletedTransaction> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sales completed between two calendar days, both inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&CompletedTransaction> {
        self.entries
            .iter()
            .filter(|e| {
                let day = e.date();
                day >= start && day <= end
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tx(invoice: u64, completed_at: DateTime<Utc>) -> CompletedTransaction {
        CompletedTransaction {
            id: Uuid::new_v4(),
            invoice_id: InvoiceId::from_number(invoice),
            completed_at,
            lines: Vec::new(),
            seller_name: None,
            payment_method: "Espèce".to_string(),
            room_number: None,
            discount: Discount::NONE,
            totals: Totals::default(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_record_most_recent_first() {
        let mut ledger = Ledger::new();
        ledger.record(tx(1, at(1, 10)));
        ledger.record(tx(2, at(1, 12)));
        ledger.record(tx(3, at(1, 11)));

        let invoices: Vec<&str> = ledger.iter().map(|e| e.invoice_id.as_str()).collect();
        assert_eq!(invoices, vec!["INV-0002", "INV-0003", "INV-0001"]);
        assert_eq!(ledger.latest().map(|e| e.invoice_id.as_str()), Some("INV-0002"));
    }

    #[test]
    fn test_record_same_instant_goes_first() {
        let mut ledger = Ledger::new();
        ledger.record(tx(1, at(1, 10)));
        ledger.record(tx(2, at(1, 10)));

        assert_eq!(ledger.latest().map(|e| e.invoice_id.as_str()), Some("INV-0002"));
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut ledger = Ledger::new();
        let sale = tx(1, at(1, 10));
        let id = sale.id;
        ledger.record(sale);

        let removed = ledger.remove(&id).unwrap();
        assert_eq!(removed.invoice_id.as_str(), "INV-0001");
        assert!(ledger.remove(&id).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_find_by_invoice() {
        let mut ledger = Ledger::new();
        ledger.record(tx(5, at(1, 10)));

        assert!(ledger.find_by_invoice("INV-0005").is_some());
        assert!(ledger.find_by_invoice("INV-0006").is_none());
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut ledger = Ledger::new();
        ledger.record(tx(1, at(1, 23)));
        ledger.record(tx(2, at(2, 9)));
        ledger.record(tx(3, at(4, 9)));

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let found = ledger.between(start, end);
        let invoices: Vec<&str> = found.iter().map(|e| e.invoice_id.as_str()).collect();
        assert_eq!(invoices, vec!["INV-0002", "INV-0001"]);
    }

    #[test]
    fn test_date_iso() {
        let sale = tx(1, at(1, 10));
        assert_eq!(sale.date_iso(), "2024-03-01T10:00:00+00:00");
    }
}
