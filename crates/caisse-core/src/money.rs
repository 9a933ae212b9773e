//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE TAX-INCLUSIVE PROBLEM                                              │
//! │                                                                         │
//! │  Catalog prices are TTC (tax included). The HT part of a line is        │
//! │    126.00 / 1.10 = 114.545454...                                        │
//! │                                                                         │
//! │  Rounding that to cents per line, then summing, drifts away from the    │
//! │  ticket total. Floating point drifts on its own (0.1 + 0.2).            │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal with 28 significant digits               │
//! │    Every intermediate amount keeps full precision.                      │
//! │    Rounding to 2 decimals happens ONLY for presentation.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caisse_core::money::Money;
//!
//! // Create from cents (exact)
//! let price = Money::from_cents(7000); // 70.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = doubled + Money::from_cents(5000);
//! assert_eq!(total.to_string(), "190.00");
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::{Currency, TaxRate};

/// Number of decimals used when an amount is shown or printed.
const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the establishment currency, kept at full precision.
///
/// ## Design Decisions
/// - **Decimal**: exact base-10 arithmetic, no binary float drift
/// - **Single field tuple struct**: zero-cost wrapper, serialized transparently
/// - **No implicit rounding**: `rounded()` / `Display` are presentation only
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartLineItem gross ──► discounted line ──► HT + TVA
///                                                   │
///                                                   ▼
///                         Totals ──► Receipt ──► CompletedTransaction
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_DECIMALS))
    }

    /// Wraps an existing decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the full-precision amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount in cents, rounded half away from zero.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    /// use caisse_core::types::TaxRate;
    ///
    /// let ht = Money::from_cents(12600).exclude_tax(TaxRate::from_bps(1000));
    /// assert_eq!(ht.cents(), 11455);
    /// ```
    pub fn cents(&self) -> i64 {
        (self.rounded().0 * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or_default()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money::ZERO
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let line = Money::from_cents(7000).multiply_quantity(2);
    /// assert_eq!(line, Money::from_cents(14000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies the amount by an arbitrary factor without rounding.
    #[inline]
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Returns `percent` % of this amount (e.g. the discount amount).
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let discount = Money::from_cents(19000).percentage(Decimal::TEN);
    /// assert_eq!(discount, Money::from_cents(1900));
    /// ```
    #[inline]
    pub fn percentage(&self, percent: Decimal) -> Self {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Extracts the tax-exclusive (HT) part of a tax-inclusive (TTC) amount.
    ///
    /// `ht = ttc / (1 + rate)`, kept at full precision.
    pub fn exclude_tax(&self, rate: TaxRate) -> Self {
        Money(self.0 / (Decimal::ONE + rate.fraction()))
    }

    /// Rounds to two decimals, half away from zero. Presentation only.
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Formats the amount the way receipts print it: comma decimal separator
    /// followed by the currency symbol.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    /// use caisse_core::types::Currency;
    ///
    /// let eur = Currency::new("EUR", "€");
    /// assert_eq!(Money::from_cents(17100).format_with(&eur), "171,00 €");
    /// ```
    pub fn format_with(&self, currency: &Currency) -> String {
        format!("{} {}", self.to_string().replace('.', ","), currency.symbol)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to two decimals, without currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.rounded().0;
        if shown.is_zero() {
            shown = Decimal::ZERO;
        }
        shown.rescale(DISPLAY_DECIMALS);
        write!(f, "{}", shown)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
