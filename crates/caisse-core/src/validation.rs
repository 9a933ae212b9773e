//! # Validation Module
//!
//! Input validation utilities for Caisse POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register commands                                             │
//! │  ├── Token parsing (numbers, ids)                                       │
//! │  └── Immediate operator feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ticket reducer                                                │
//! │  ├── Phase and guard checks                                             │
//! │  └── THIS MODULE: value rules (quantity, discount, room number)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / calculator                                             │
//! │  └── Only ever sees validated values                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caisse_core::validation::{parse_discount, validate_quantity};
//!
//! assert_eq!(validate_quantity(5).unwrap(), 5);
//! assert!(parse_discount("150").is_err());
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Highest tax rate in basis points (100 %).
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results of the category)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates the room number of a room-transfer payment.
///
/// ## Rules
/// - Must be present and non-blank
/// - Surrounding whitespace is dropped
///
/// ## Example
/// ```rust
/// use caisse_core::validation::validate_room_number;
///
/// assert_eq!(validate_room_number(Some(" 204 ")).unwrap(), "204");
/// assert!(validate_room_number(Some("   ")).is_err());
/// assert!(validate_room_number(None).is_err());
/// ```
pub fn validate_room_number(room: Option<&str>) -> ValidationResult<String> {
    match room.map(str::trim) {
        Some(room) if !room.is_empty() => Ok(room.to_string()),
        _ => Err(ValidationError::Required {
            field: "room number".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit a cart line quantity
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Operator enters quantity: 5                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       └── OK → cart.add_item(product, 5)                                │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(qty).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::from(u32::MAX),
    })
}

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use caisse_core::money::Money;
/// use caisse_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: i64::from(MAX_TAX_RATE_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// Keypad Input Parsers
// =============================================================================

/// Parses a ticket discount percentage typed on the keypad.
///
/// ## Rules
/// - A lone trailing point is ignored (`"12."` is 12)
/// - A leading point is read as a fraction (`".5"` is 0.5)
/// - The value must be within 0..=100
///
/// ## Example
/// ```rust
/// use caisse_core::validation::parse_discount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_discount("12.5").unwrap(), Decimal::new(125, 1));
/// assert_eq!(parse_discount(".5").unwrap(), Decimal::new(5, 1));
/// assert!(parse_discount("").is_err());
/// assert!(parse_discount("101").is_err());
/// ```
pub fn parse_discount(input: &str) -> ValidationResult<Decimal> {
    let mut text = input.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "discount".to_string(),
        });
    }

    if let Some(stripped) = text.strip_suffix('.') {
        text = stripped;
    }

    let normalized = if text.starts_with('.') {
        format!("0{}", text)
    } else {
        text.to_string()
    };

    let value = Decimal::from_str(&normalized).map_err(|_| ValidationError::InvalidFormat {
        field: "discount".to_string(),
        reason: format!("'{}' is not a number", input.trim()),
    })?;

    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(value.normalize())
}

/// Reads the quantity held in the numeric entry buffer.
///
/// Only the leading run of digits counts (`"3.7"` reads as 3). Returns
/// `None` when there are no leading digits or the value is zero.
///
/// ```rust
/// use caisse_core::validation::parse_quantity_entry;
///
/// assert_eq!(parse_quantity_entry("12"), Some(12));
/// assert_eq!(parse_quantity_entry("3.7"), Some(3));
/// assert_eq!(parse_quantity_entry(".5"), None);
/// assert_eq!(parse_quantity_entry("0"), None);
/// ```
pub fn parse_quantity_entry(buffer: &str) -> Option<u32> {
    let trimmed = buffer.trim_start();
    let digits_len = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_len]
        .parse::<u32>()
        .ok()
        .filter(|qty| *qty > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================
