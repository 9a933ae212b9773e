//! # caisse-core: Ticket Engine for Caisse POS
//!
//! This crate holds the ticket lifecycle of the register: cart math, VAT
//! breakdowns, discounts, holding and retrieving tickets, payment and the
//! ledger of completed sales. It does no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caisse POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    caisse-register (binary)                     │   │
//! │  │    stdin commands ──► Action ──► dispatch ──► text view         │   │
//! │  │    config (TOML + env) · tracing · ApiError                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ apply(&Session, Action, &Context)      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caisse-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  ticket   │  │   cart    │  │calculator │  │  ledger   │  │   │
//! │  │   │  Session  │  │   Cart    │  │  Totals   │  │   held    │  │   │
//! │  │   │  Action   │  │ LineItem  │  │ VAT table │  │  invoice  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  receipt  │  │  report   │  │  catalog  │  │   store   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE TRANSITIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ticket`] - Session state and the action reducer
//! - [`cart`] - Ticket lines
//! - [`calculator`] - Totals and per-rate VAT breakdown
//! - [`money`] - Full-precision money amounts
//! - [`discount`] - Whole-ticket percentage discount
//! - [`keypad`] - Numeric keypad buffers
//! - [`held`] - Suspended tickets
//! - [`invoice`] - Invoice numbering
//! - [`ledger`] - Completed sales
//! - [`receipt`] - Printable ticket data
//! - [`report`] - Sales reports over a period
//! - [`catalog`] - Products, users and payment methods
//! - [`store`] - Session storage seam
//! - [`types`] - Domain types (Product, TaxRate, User, ...)
//! - [`error`] / [`validation`] - Errors and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use caisse_core::calculator::compute_totals;
//! use caisse_core::cart::Cart;
//! use caisse_core::discount::Discount;
//! use caisse_core::money::Money;
//! use caisse_core::types::{Product, TaxRate};
//!
//! let mut cart = Cart::new();
//! let plate = Product::new("a", "Plat", Money::from_cents(7000), TaxRate::REDUCED, "plats");
//! let wine = Product::new("b", "Vin", Money::from_cents(5000), TaxRate::STANDARD, "boissons");
//! cart.add_item(Arc::new(plate), 2).unwrap();
//! cart.add_item(Arc::new(wine), 1).unwrap();
//!
//! let totals = compute_totals(cart.lines(), Discount::parse("10").unwrap());
//! assert_eq!(totals.total_tax_inclusive, Money::from_cents(17100));
//! assert_eq!(totals.discount_amount, Money::from_cents(1900));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod cart;
pub mod catalog;
pub mod discount;
pub mod error;
pub mod held;
pub mod invoice;
pub mod keypad;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod report;
pub mod store;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{compute_totals, Totals, VatBreakdownEntry};
pub use cart::{Cart, CartLineItem};
pub use catalog::Catalog;
pub use discount::Discount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{InvoiceCounter, InvoiceId};
pub use ledger::{CompletedTransaction, Ledger};
pub use money::Money;
pub use receipt::Receipt;
pub use report::SalesReport;
pub use store::{MemoryStore, SessionStore};
pub use ticket::{apply, Action, Context, Outcome, Phase, Session, Transition};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every invoice id (`INV-0001`).
pub const INVOICE_PREFIX: &str = "INV-";
