//! # Domain Types
//!
//! Core domain types consumed by the ticket engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │  PaymentMethod  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  label          │       │
//! │  │  price (TTC)    │   │  role           │   │  room number?   │       │
//! │  │  vat_rate       │   └─────────────────┘   │  privileged?    │       │
//! │  └─────────────────┘                          └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    UserRole     │   │  Establishment  │       │
//! │  │  bps (u32)      │   │  Admin          │   │  receipt header │       │
//! │  │  1000 = 10 %    │   │  Manager        │   │  and footer     │       │
//! │  └─────────────────┘   │  Cashier        │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are owned by the catalog and session collaborators; the
//! ticket engine only reads them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10 % (reduced rate), 2000 bps = 20 % (standard rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Reduced VAT rate (10 %).
    pub const REDUCED: TaxRate = TaxRate(1000);

    /// Standard VAT rate (20 %).
    pub const STANDARD: TaxRate = TaxRate(2000);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (`0.20` for 20 %).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Key used in VAT breakdowns: the percentage with one decimal.
    ///
    /// ```rust
    /// use caisse_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_bps(2000).breakdown_key(), "20.0");
    /// assert_eq!(TaxRate::from_bps(550).breakdown_key(), "5.5");
    /// ```
    pub fn breakdown_key(&self) -> String {
        // Tenths of a percent, rounded half up
        let tenths = (self.0 + 5) / 10;
        format!("{}.{}", tenths / 10, tenths % 10)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A product available for sale.
///
/// Prices are tax-inclusive (TTC). Stock is informational only: sales do not
/// decrement it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price, tax included.
    pub price: Money,

    /// VAT rate applied to this product.
    pub vat_rate: TaxRate,

    /// Category this product is listed under.
    pub category_id: String,

    /// Units on hand.
    pub stock: i64,
}

impl Product {
    /// Convenience constructor used by the built-in catalog and tests.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        vat_rate: TaxRate,
        category_id: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            vat_rate,
            category_id: category_id.into(),
            stock: 0,
        }
    }

    /// Sets the informational stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display color hint for the category pill.
    pub color: String,
}

// =============================================================================
// Users
// =============================================================================

/// Role of a POS user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Cashier,
}

impl UserRole {
    /// Admins and managers may void sales and offer free tickets.
    #[inline]
    pub const fn is_privileged(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Cashier => write!(f, "cashier"),
        }
    }
}

/// A POS user. Users double as sellers attributed on tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Seller attribution carried by the active ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub name: String,
}

impl From<&User> for Seller {
    fn from(user: &User) -> Self {
        Seller {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// A way of settling a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,

    /// Label recorded on the transaction and shown in reports.
    pub label: String,

    /// Charging a hotel room needs the room number.
    #[serde(default)]
    pub requires_room_number: bool,

    /// Only admins and managers may use it (free tickets).
    #[serde(default)]
    pub privileged_only: bool,
}

impl PaymentMethod {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        PaymentMethod {
            id: id.into(),
            label: label.into(),
            requires_room_number: false,
            privileged_only: false,
        }
    }

    pub fn requiring_room_number(mut self) -> Self {
        self.requires_room_number = true;
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged_only = true;
        self
    }

    /// Whether a session with `role` may settle with this method.
    pub fn is_available_to(&self, role: UserRole) -> bool {
        !self.privileged_only || role.is_privileged()
    }
}

// =============================================================================
// Establishment
// =============================================================================

/// Display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Self {
        Currency {
            code: code.into(),
            symbol: symbol.into(),
        }
    }
}

/// Establishment metadata printed on receipts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstablishmentDetails {
    pub name: String,
    /// Logo as a data URL; empty when none.
    pub logo_url: String,
    pub address1: String,
    pub address2: String,
    pub tel: String,
    pub tva_number: String,
    pub ice_number: String,
    pub point_of_sale_name: String,
    pub currency: Currency,
    pub welcome_message: String,
    pub thank_you_message: String,
    pub footer_note1: String,
    pub footer_note2: String,
}

impl Default for EstablishmentDetails {
    fn default() -> Self {
        EstablishmentDetails {
            name: "Votre Établissement".to_string(),
            logo_url: String::new(),
            address1: "Votre Adresse, Ligne 1".to_string(),
            address2: "Ville, Code Postal".to_string(),
            tel: "+212 0 00 00 00 00".to_string(),
            tva_number: "TVA N°".to_string(),
            ice_number: "ICE N°".to_string(),
            point_of_sale_name: "CAISSE PRINCIPALE".to_string(),
            currency: Currency::new("EUR", "€"),
            welcome_message: "Bienvenue !".to_string(),
            thank_you_message: "Merci de votre visite !".to_string(),
            footer_note1: "Conservez ce ticket.".to_string(),
            footer_note2: "A bientot !".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_fraction() {
        assert_eq!(TaxRate::from_bps(2000).fraction(), Decimal::new(20, 2));
        assert_eq!(TaxRate::REDUCED.fraction(), Decimal::new(1, 1));
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_breakdown_key() {
        assert_eq!(TaxRate::REDUCED.breakdown_key(), "10.0");
        assert_eq!(TaxRate::STANDARD.breakdown_key(), "20.0");
        assert_eq!(TaxRate::from_bps(550).breakdown_key(), "5.5");
        assert_eq!(TaxRate::zero().breakdown_key(), "0.0");
        assert_eq!(TaxRate::from_bps(825).breakdown_key(), "8.3");
    }

    #[test]
    fn test_privileged_roles() {
        assert!(UserRole::Admin.is_privileged());
        assert!(UserRole::Manager.is_privileged());
        assert!(!UserRole::Cashier.is_privileged());
    }

    #[test]
    fn test_payment_method_availability() {
        let free = PaymentMethod::new("gratuit", "Gratuité").privileged();
        assert!(free.is_available_to(UserRole::Manager));
        assert!(!free.is_available_to(UserRole::Cashier));

        let cash = PaymentMethod::new("cash", "Espèce");
        assert!(cash.is_available_to(UserRole::Cashier));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&UserRole::Cashier).unwrap();
        assert_eq!(json, "\"cashier\"");
    }
}
