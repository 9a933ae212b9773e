//! # Ticket Calculator
//!
//! Turns cart lines and the ticket discount into totals with a per-rate VAT
//! breakdown.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal        = Σ unit_price × quantity           (TTC)           │
//! │  2. discount_amount = subtotal × d / 100                                │
//! │  3. per line:                                                           │
//! │       discounted    = line_total × (1 − d/100)                          │
//! │       tax_exclusive = discounted / (1 + vat_rate)       (HT)            │
//! │       tax           = discounted − tax_exclusive        (TVA)           │
//! │  4. vat_breakdown[rate key] += (HT, TVA)                                │
//! │  5. total_ttc = subtotal − discount_amount                              │
//! │     total_ht  = Σ HT                                                    │
//! │     total_tva = total_ttc − total_ht                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here rounds. Every amount keeps full `Decimal` precision so
//! `HT + TVA` always adds back up to the TTC total; rounding belongs to the
//! receipt/report presentation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;
use crate::discount::Discount;
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Result Types
// =============================================================================

/// Pricing of a single line after the ticket discount is distributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePricing {
    pub product_id: String,
    pub vat_rate: TaxRate,
    /// Unit price × quantity, before discount.
    pub gross: Money,
    /// Gross with the ticket discount applied.
    pub discounted: Money,
    pub tax_exclusive: Money,
    pub tax: Money,
}

/// HT and TVA accumulated for one VAT rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatBreakdownEntry {
    #[serde(rename = "ht")]
    pub tax_exclusive: Money,
    #[serde(rename = "tva")]
    pub tax: Money,
}

impl VatBreakdownEntry {
    /// HT + TVA for this rate.
    pub fn tax_inclusive(&self) -> Money {
        self.tax_exclusive + self.tax
    }
}

/// Derived ticket totals. Never stored on the active ticket, only on
/// completed transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal_tax_inclusive: Money,
    pub discount_amount: Money,
    pub total_tax_inclusive: Money,
    pub total_tax_exclusive: Money,
    pub total_tax: Money,
    /// Keyed by [`TaxRate::breakdown_key`] (`"10.0"`, `"20.0"`).
    pub vat_breakdown: BTreeMap<String, VatBreakdownEntry>,
}

impl Totals {
    /// Breakdown entry for a rate, if any line uses it.
    pub fn breakdown_for(&self, rate: TaxRate) -> Option<&VatBreakdownEntry> {
        self.vat_breakdown.get(&rate.breakdown_key())
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Prices every line with the discount distributed into it.
pub fn price_lines(lines: &[CartLineItem], discount: Discount) -> Vec<LinePricing> {
    let factor = discount.remaining_factor();

    lines
        .iter()
        .map(|line| {
            let gross = line.line_total();
            let discounted = if discount.is_zero() {
                gross
            } else {
                gross.scale(factor)
            };
            let vat_rate = line.product.vat_rate;
            let tax_exclusive = discounted.exclude_tax(vat_rate);

            LinePricing {
                product_id: line.product_id().to_string(),
                vat_rate,
                gross,
                discounted,
                tax_exclusive,
                tax: discounted - tax_exclusive,
            }
        })
        .collect()
}

/// Computes the ticket totals.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use caisse_core::calculator::compute_totals;
/// use caisse_core::cart::CartLineItem;
/// use caisse_core::discount::Discount;
/// use caisse_core::money::Money;
/// use caisse_core::types::{Product, TaxRate};
///
/// let tea = Arc::new(Product::new("tea", "Thé", Money::from_cents(1500), TaxRate::STANDARD, "boissons"));
/// let totals = compute_totals(&[CartLineItem::new(tea, 3)], Discount::NONE);
///
/// assert_eq!(totals.total_tax_inclusive, Money::from_cents(4500));
/// assert_eq!(totals.total_tax_exclusive, Money::from_cents(3750));
/// assert_eq!(totals.total_tax, Money::from_cents(750));
/// ```
pub fn compute_totals(lines: &[CartLineItem], discount: Discount) -> Totals {
    let priced = price_lines(lines, discount);

    let subtotal: Money = priced.iter().map(|p| p.gross).sum();
    let discount_amount = if discount.is_zero() {
        Money::ZERO
    } else {
        subtotal.percentage(discount.value())
    };

    let mut vat_breakdown: BTreeMap<String, VatBreakdownEntry> = BTreeMap::new();
    for line in &priced {
        let entry = vat_breakdown.entry(line.vat_rate.breakdown_key()).or_default();
        entry.tax_exclusive += line.tax_exclusive;
        entry.tax += line.tax;
    }

    let total_tax_inclusive = subtotal - discount_amount;
    let total_tax_exclusive: Money = priced.iter().map(|p| p.tax_exclusive).sum();

    Totals {
        subtotal_tax_inclusive: subtotal,
        discount_amount,
        total_tax_inclusive,
        total_tax_exclusive,
        total_tax: total_tax_inclusive - total_tax_exclusive,
        vat_breakdown,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use std::sync::Arc;

    fn line(id: &str, price_cents: i64, vat: TaxRate, qty: u32) -> CartLineItem {
        let product = Product::new(id, id, Money::from_cents(price_cents), vat, "plats");
        CartLineItem::new(Arc::new(product), qty)
    }

    #[test]
    fn test_empty_ticket_is_all_zero() {
        let totals = compute_totals(&[], Discount::parse("25").unwrap());
        assert_eq!(totals, Totals::default());
        assert!(totals.vat_breakdown.is_empty());
    }

    #[test]
    fn test_mixed_rates_with_discount() {
        let lines = vec![
            line("a", 7000, TaxRate::REDUCED, 2),
            line("b", 5000, TaxRate::STANDARD, 1),
        ];
        let totals = compute_totals(&lines, Discount::parse("10").unwrap());

        assert_eq!(totals.subtotal_tax_inclusive, Money::from_cents(19000));
        assert_eq!(totals.discount_amount, Money::from_cents(1900));
        assert_eq!(totals.total_tax_inclusive, Money::from_cents(17100));

        let reduced = totals.breakdown_for(TaxRate::REDUCED).unwrap();
        assert_eq!(reduced.tax_exclusive.rounded(), Money::from_cents(11455));
        assert_eq!(reduced.tax.rounded(), Money::from_cents(1145));

        let standard = totals.breakdown_for(TaxRate::STANDARD).unwrap();
        assert_eq!(standard.tax_exclusive, Money::from_cents(3750));
        assert_eq!(standard.tax, Money::from_cents(750));
    }

    #[test]
    fn test_lines_add_back_to_total() {
        let lines = vec![
            line("a", 1990, TaxRate::REDUCED, 1),
            line("b", 333, TaxRate::STANDARD, 7),
            line("c", 1250, TaxRate::from_bps(550), 1),
        ];
        let discount = Discount::parse("12.5").unwrap();
        let totals = compute_totals(&lines, discount);

        let line_sum: Money = price_lines(&lines, discount)
            .iter()
            .map(|p| p.tax_exclusive + p.tax)
            .sum();
        assert_eq!(line_sum, totals.total_tax_inclusive);

        let breakdown_sum: Money = totals
            .vat_breakdown
            .values()
            .map(VatBreakdownEntry::tax_inclusive)
            .sum();
        assert_eq!(breakdown_sum, totals.total_tax_inclusive);
        assert_eq!(
            totals.total_tax_exclusive + totals.total_tax,
            totals.total_tax_inclusive
        );
    }

    #[test]
    fn test_zero_discount_matches_undiscounted_prices() {
        let lines = vec![line("a", 1500, TaxRate::REDUCED, 2)];
        let priced = price_lines(&lines, Discount::NONE);

        assert_eq!(priced[0].gross, priced[0].discounted);
        let totals = compute_totals(&lines, Discount::NONE);
        assert!(totals.discount_amount.is_zero());
        assert_eq!(totals.total_tax_inclusive, totals.subtotal_tax_inclusive);
    }

    #[test]
    fn test_full_discount() {
        let lines = vec![line("a", 1500, TaxRate::REDUCED, 2)];
        let totals = compute_totals(&lines, Discount::parse("100").unwrap());

        assert!(totals.total_tax_inclusive.is_zero());
        assert!(totals.total_tax_exclusive.is_zero());
        assert!(totals.total_tax.is_zero());
    }

    #[test]
    fn test_breakdown_serializes_ht_tva() {
        let lines = vec![line("b", 4500, TaxRate::STANDARD, 1)];
        let totals = compute_totals(&lines, Discount::NONE);
        let json = serde_json::to_value(&totals).unwrap();

        let entry = &json["vat_breakdown"]["20.0"];
        assert!(entry.get("ht").is_some());
        assert!(entry.get("tva").is_some());
        assert!(entry.get("tax_exclusive").is_none());
    }
}
