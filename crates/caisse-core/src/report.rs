//! # Financial Reports
//!
//! Period summaries built from the ledger.
//!
//! ## Report Sections
//! ```text
//! Ledger ──► between(start, end) ──┬──► main courante    (one row per sale)
//!                                  ├──► payment totals   (per method label)
//!                                  └──► product sales    (per product, by total)
//! ```
//!
//! Product sales are gross amounts (unit price × quantity, before ticket
//! discounts), so their grand total can exceed the sum of sale totals.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::invoice::InvoiceId;
use crate::ledger::{CompletedTransaction, Ledger};
use crate::money::Money;

/// Length of the short product code shown in the product report.
pub const PRODUCT_CODE_LEN: usize = 8;

// =============================================================================
// Report Rows
// =============================================================================

/// One sale in the daily journal ("main courante").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRow {
    pub transaction_id: Uuid,
    pub invoice_id: InvoiceId,
    pub room_number: Option<String>,
    pub seller_name: Option<String>,
    pub total: Money,
    pub payment_method: String,
}

impl From<&CompletedTransaction> for JournalRow {
    fn from(tx: &CompletedTransaction) -> Self {
        JournalRow {
            transaction_id: tx.id,
            invoice_id: tx.invoice_id.clone(),
            room_number: tx.room_number.clone(),
            seller_name: tx.seller_name.clone(),
            total: tx.totals.total_tax_inclusive,
            payment_method: tx.payment_method.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethodTotal {
    pub method: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: String,
    pub code: String,
    pub name: String,
    pub quantity: u64,
    /// Price of the first sale seen in the period.
    pub unit_price: Money,
    pub total: Money,
}

// =============================================================================
// Sales Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Newest first, as in the ledger.
    pub journal: Vec<JournalRow>,
    /// In order of first appearance in the journal.
    pub payment_totals: Vec<PaymentMethodTotal>,
    /// Highest gross total first.
    pub product_sales: Vec<ProductSales>,
    pub product_sales_total: Money,
}

impl SalesReport {
    /// Builds the report for the sales completed between `start` and `end`,
    /// both days included.
    pub fn for_period(ledger: &Ledger, start: NaiveDate, end: NaiveDate) -> Self {
        let sales = ledger.between(start, end);

        let journal: Vec<JournalRow> = sales.iter().copied().map(JournalRow::from).collect();
        let payment_totals = payment_totals(&journal);
        let product_sales = product_sales(&sales);
        let product_sales_total = product_sales.iter().map(|p| p.total).sum();

        SalesReport {
            start,
            end,
            journal,
            payment_totals,
            product_sales,
            product_sales_total,
        }
    }

    /// Sum of sale totals in the period.
    pub fn journal_total(&self) -> Money {
        self.journal.iter().map(|row| row.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.is_empty()
    }
}

fn payment_totals(journal: &[JournalRow]) -> Vec<PaymentMethodTotal> {
    let mut totals: Vec<PaymentMethodTotal> = Vec::new();
    for row in journal {
        match totals.iter_mut().find(|t| t.method == row.payment_method) {
            Some(entry) => entry.total += row.total,
            None => totals.push(PaymentMethodTotal {
                method: row.payment_method.clone(),
                total: row.total,
            }),
        }
    }
    totals
}

fn product_sales(sales: &[&CompletedTransaction]) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();
    for line in sales.iter().flat_map(|tx| tx.lines.iter()) {
        let product = &line.product;
        match rows.iter_mut().find(|r| r.product_id == product.id) {
            Some(row) => {
                row.quantity += u64::from(line.quantity);
                row.total += line.line_total();
            }
            None => rows.push(ProductSales {
                product_id: product.id.clone(),
                code: product_code(&product.id),
                name: product.name.clone(),
                quantity: u64::from(line.quantity),
                unit_price: product.price,
                total: line.line_total(),
            }),
        }
    }
    // Stable sort keeps first-appearance order among equal totals
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Short upper-case code derived from the product id.
pub fn product_code(product_id: &str) -> String {
    product_id
        .chars()
        .take(PRODUCT_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_totals;
    use crate::cart::CartLineItem;
    use crate::discount::Discount;
    use crate::types::{Product, TaxRate};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn line(id: &str, price_cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            Arc::new(Product::new(
                id,
                format!("Product {}", id),
                Money::from_cents(price_cents),
                TaxRate::REDUCED,
                "plats",
            )),
            quantity,
        )
    }

    fn sale(number: u64, day: u32, method: &str, lines: Vec<CartLineItem>) -> CompletedTransaction {
        let discount = Discount::NONE;
        CompletedTransaction {
            id: Uuid::new_v4(),
            invoice_id: InvoiceId::from_number(number),
            completed_at: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            totals: compute_totals(&lines, discount),
            lines,
            seller_name: Some("Marie".to_string()),
            payment_method: method.to_string(),
            room_number: None,
            discount,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.record(sale(1, 1, "Espèce", vec![line("prod_pizza_margarita", 5000, 1)]));
        ledger.record(sale(
            2,
            2,
            "Carte Crédit",
            vec![line("prod_pizza_margarita", 5000, 2), line("prod_salade", 7000, 1)],
        ));
        ledger.record(sale(3, 2, "Espèce", vec![line("prod_salade", 7000, 1)]));
        ledger.record(sale(4, 5, "Espèce", vec![line("prod_salade", 7000, 9)]));
        ledger
    }

    #[test]
    fn test_period_filters_sales() {
        let report = SalesReport::for_period(&sample_ledger(), day(1), day(2));

        assert_eq!(report.journal.len(), 3);
        assert_eq!(report.journal[0].invoice_id.as_str(), "INV-0003");
        assert_eq!(report.journal_total(), Money::from_cents(29000));
    }

    #[test]
    fn test_payment_totals_first_appearance_order() {
        let report = SalesReport::for_period(&sample_ledger(), day(1), day(2));

        let methods: Vec<&str> = report
            .payment_totals
            .iter()
            .map(|t| t.method.as_str())
            .collect();
        assert_eq!(methods, vec!["Espèce", "Carte Crédit"]);
        assert_eq!(report.payment_totals[0].total, Money::from_cents(12000));
        assert_eq!(report.payment_totals[1].total, Money::from_cents(17000));
    }

    #[test]
    fn test_product_sales_sorted_by_total() {
        let report = SalesReport::for_period(&sample_ledger(), day(1), day(2));

        let pizza = &report.product_sales[0];
        assert_eq!(pizza.code, "PROD_PIZ");
        assert_eq!(pizza.quantity, 3);
        assert_eq!(pizza.unit_price, Money::from_cents(5000));
        assert_eq!(pizza.total, Money::from_cents(15000));

        let salad = &report.product_sales[1];
        assert_eq!(salad.quantity, 2);
        assert_eq!(salad.total, Money::from_cents(14000));

        assert_eq!(report.product_sales_total, Money::from_cents(29000));
    }

    #[test]
    fn test_empty_period() {
        let report = SalesReport::for_period(&sample_ledger(), day(20), day(21));
        assert!(report.is_empty());
        assert!(report.product_sales.is_empty());
        assert!(report.product_sales_total.is_zero());
    }

    #[test]
    fn test_product_code_short_id() {
        assert_eq!(product_code("ab1"), "AB1");
    }
}
