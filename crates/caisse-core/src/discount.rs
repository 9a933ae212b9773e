//! Ticket-wide percentage discount.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{parse_discount, ValidationResult};

/// A percentage in `0..=100` applied to the whole ticket.
///
/// The discount is distributed into every line before VAT is extracted,
/// so the breakdown always reflects what the customer actually pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Discount = Discount(Decimal::ZERO);

    /// Creates a discount, rejecting values outside `0..=100`.
    pub fn percent(value: Decimal) -> ValidationResult<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Discount(value))
    }

    /// Parses keypad or command input (see [`parse_discount`]).
    pub fn parse(input: &str) -> ValidationResult<Self> {
        parse_discount(input).map(Discount)
    }

    /// The percentage value (`10` for 10 %).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Share of the price that remains to pay: `1 - d/100`.
    pub fn remaining_factor(&self) -> Decimal {
        Decimal::ONE - self.0 / Decimal::ONE_HUNDRED
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::NONE
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_bounds() {
        assert!(Discount::percent(Decimal::ZERO).is_ok());
        assert!(Discount::percent(Decimal::ONE_HUNDRED).is_ok());
        assert!(Discount::percent(Decimal::new(-1, 0)).is_err());
        assert!(Discount::percent(Decimal::new(1001, 1)).is_err());
    }

    #[test]
    fn test_remaining_factor() {
        let discount = Discount::parse("10").unwrap();
        assert_eq!(discount.remaining_factor(), Decimal::new(9, 1));
        assert_eq!(Discount::NONE.remaining_factor(), Decimal::ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Discount::parse("12.50").unwrap().to_string(), "12.5%");
        assert_eq!(Discount::NONE.to_string(), "0%");
    }
}
