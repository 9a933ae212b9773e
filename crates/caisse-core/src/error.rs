//! # Error Types
//!
//! Domain-specific error types for caisse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caisse-core errors (this file)                                         │
//! │  ├── CoreError        - Guard violations, lookups, storage              │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  Register app errors                                                    │
//! │  ├── ConfigError      - Unreadable configuration (fatal at startup)     │
//! │  └── ApiError         - What the operator sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Terminal                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, operation, phase)
//! 3. Errors are enum variants, never String
//! 4. A rejected action never changes the session
//!
//! Lookups that silently do nothing (retrieving an unknown held ticket,
//! voiding an unknown transaction) are not errors: the reducer reports them
//! as `Outcome::Ignored`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Seller cannot be found among catalog users.
    #[error("Seller not found: {0}")]
    SellerNotFound(String),

    /// Payment method cannot be found in the catalog.
    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(String),

    /// The operation needs at least one line on the ticket.
    ///
    /// ## When This Occurs
    /// - Holding, discounting, printing or paying an empty ticket
    #[error("Cannot {operation}: the ticket is empty")]
    EmptyCart { operation: &'static str },

    /// Retrieving a held ticket while the active ticket has lines.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: 2 lines
    ///      │
    ///      ▼
    /// Retrieve held ticket
    ///      │
    ///      ▼
    /// CartNotEmpty (cart and held store untouched)
    ///      │
    ///      ▼
    /// Operator holds or finishes the current ticket first
    /// ```
    #[error("The current ticket must be empty before retrieving a held ticket")]
    CartNotEmpty,

    /// The session role may not perform this operation.
    #[error("Only an admin or manager may {operation}")]
    NotPrivileged { operation: &'static str },

    /// The ticket is not in a phase that allows the operation.
    ///
    /// ## When This Occurs
    /// - Adding items while the payment dialog is open
    /// - Submitting a payment that was never opened
    /// - Confirming when nothing asked for confirmation
    #[error("Cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: String,
    },

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a discount that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value exists but the session user may not use it.
    #[error("{field} '{value}' is not available to this user")]
    NotAllowed { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EmptyCart { operation: "hold" };
        assert_eq!(err.to_string(), "Cannot hold: the ticket is empty");

        let err = CoreError::InvalidPhase {
            operation: "add an item",
            phase: "awaiting payment".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot add an item while awaiting payment");

        let err = CoreError::NotPrivileged {
            operation: "void a sale",
        };
        assert_eq!(err.to_string(), "Only an admin or manager may void a sale");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "room number".to_string(),
        };
        assert_eq!(err.to_string(), "room number is required");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
