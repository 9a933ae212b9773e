//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  stdin line                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  parse ── CommandError ─────────────────────────────┐                   │
//! │      │                                              │                   │
//! │      ▼                                              ▼                   │
//! │  dispatch ── CoreError (guard, lookup, input) ──► ApiError ──► printed  │
//! │      │                                              ▲                   │
//! │      ▼                                              │                   │
//! │  startup ── ConfigError ────────────────────────────┘  (fatal)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected command never ends the session; the operator sees
//! `[CODE] message` and keeps going.

use serde::Serialize;

use caisse_core::{CoreError, ValidationError};

use crate::commands::CommandError;
use crate::config::ConfigError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "GUARD_VIOLATION",
///   "message": "Cannot hold the ticket: the ticket is empty"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Action not allowed in the current ticket state
    GuardViolation,

    /// Product, seller, payment method or sale not found
    NotFound,

    /// Rule of the business refused the action
    BusinessLogic,

    /// Configuration could not be loaded
    ConfigError,

    /// Unexpected failure
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::GuardViolation => "GUARD_VIOLATION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::SellerNotFound(id) => ApiError::not_found("Seller", &id),
            CoreError::PaymentMethodNotFound(id) => ApiError::not_found("Payment method", &id),
            err @ (CoreError::EmptyCart { .. }
            | CoreError::CartNotEmpty
            | CoreError::InvalidPhase { .. }
            | CoreError::NotPrivileged { .. }) => {
                ApiError::new(ErrorCode::GuardViolation, err.to_string())
            }
            CoreError::Validation(e @ ValidationError::NotAllowed { .. }) => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::Storage(e) => {
                tracing::error!("Session storage failed: {}", e);
                ApiError::internal("Session storage failed")
            }
        }
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON export failed: {}", err);
        ApiError::internal("Export failed")
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(format!("I/O error: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors() {
        let err = ApiError::from(CoreError::EmptyCart {
            operation: "hold the ticket",
        });
        assert_eq!(err.code, ErrorCode::GuardViolation);
        assert_eq!(
            err.to_string(),
            "[GUARD_VIOLATION] Cannot hold the ticket: the ticket is empty"
        );

        let err = ApiError::from(CoreError::NotPrivileged {
            operation: "void a sale",
        });
        assert_eq!(err.code, ErrorCode::GuardViolation);
    }

    #[test]
    fn test_lookup_errors() {
        let err = ApiError::from(CoreError::ProductNotFound("prod_x".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: prod_x");
    }

    #[test]
    fn test_validation_errors() {
        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "room number".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = ApiError::from(CoreError::Validation(ValidationError::NotAllowed {
            field: "payment method".to_string(),
            value: "Gratuité".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_config_error() {
        let err = ApiError::from(ConfigError::UnknownCurrency("XYZ".to_string()));
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
