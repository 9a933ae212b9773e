//! # Cart
//!
//! The ordered lines of the active ticket.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Ticket Action            Cart Method             Line Change           │
//! │  ─────────────            ───────────             ───────────           │
//! │                                                                         │
//! │  Select Product ─────────► add_item() ──────────► qty += n or push      │
//! │                                                                         │
//! │  Qty + Enter ────────────► put_quantity() ──────► qty = n or push       │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ──────► qty = n (0 removes)   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► line dropped          │
//! │                                                                         │
//! │  Hold / Pay ─────────────► snapshot() ──────────► deep copy out         │
//! │                                                                         │
//! │  Retrieve ───────────────► Cart::from_lines() ──► snapshot moved in     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product sums quantities)
//! - Every line quantity is > 0 (setting 0 removes the line)
//! - Line order is insertion order

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_quantity, ValidationResult};

// =============================================================================
// Cart Line
// =============================================================================

/// One product on the ticket with its quantity.
///
/// The product is shared with the catalog while the ticket is active.
/// Held tickets and completed transactions get their own copy through
/// [`Cart::snapshot`], so later catalog edits never reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Arc<Product>,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(product: Arc<Product>, quantity: u32) -> Self {
        CartLineItem { product, quantity }
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// Unit price × quantity, tax included, before discount.
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Copies the line together with its product.
    pub fn deep_copy(&self) -> Self {
        CartLineItem {
            product: Arc::new(Product::clone(&self.product)),
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart of the active ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from snapshot lines (retrieving a held ticket).
    pub fn from_lines(lines: Vec<CartLineItem>) -> Self {
        Cart { lines }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: quantities are summed
    /// - If product not in cart: a line is appended
    /// - Non-positive quantity: rejected, cart unchanged
    pub fn add_item(&mut self, product: Arc<Product>, quantity: i64) -> ValidationResult<()> {
        let quantity = validate_quantity(quantity)?;

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(());
        }

        self.lines.push(CartLineItem::new(product, quantity));
        Ok(())
    }

    /// Overwrites the quantity of the product's line, or appends a new line.
    pub fn put_quantity(&mut self, product: Arc<Product>, quantity: u32) {
        if quantity == 0 {
            self.remove_item(&product.id);
            return;
        }

        match self.line_mut(&product.id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLineItem::new(product, quantity)),
        }
    }

    /// Updates the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - Negative quantities clamp to 0
    /// - If quantity is 0: removes the line
    /// - If product not in cart: no-op
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Removes the product's line. Silent when absent.
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|l| l.product_id() == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|l| l.product_id() == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.line(product_id).is_some()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the number of articles (sum of quantities).
    pub fn article_count(&self) -> u64 {
        article_count(&self.lines)
    }

    /// Gross subtotal, tax included, before discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Deep copy of the lines, detached from the catalog.
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.lines.iter().map(CartLineItem::deep_copy).collect()
    }
}

/// Sum of quantities over a set of lines.
pub fn article_count(lines: &[CartLineItem]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity)).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;

    fn test_product(id: &str, price_cents: i64) -> Arc<Product> {
        Arc::new(Product::new(
            id,
            format!("Product {}", id),
            Money::from_cents(price_cents),
            TaxRate::REDUCED,
            "plats",
        ))
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add_item(test_product("1", 999), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.article_count(), 2);
        assert_eq!(cart.subtotal(), Money::from_cents(1998));
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_item(product.clone(), 2).unwrap();
        cart.add_item(product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("1").map(|l| l.quantity), Some(5));
    }

    #[test]
    fn test_cart_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_item(test_product("1", 999), 1).unwrap();

        assert!(cart.add_item(test_product("1", 999), 0).is_err());
        assert!(cart.add_item(test_product("2", 500), -3).is_err());
        assert_eq!(cart.article_count(), 1);
        assert!(!cart.contains("2"));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_item(test_product("1", 999), 2).unwrap();
        cart.add_item(test_product("2", 500), 1).unwrap();

        cart.set_quantity("1", 7);
        assert_eq!(cart.line("1").map(|l| l.quantity), Some(7));

        cart.set_quantity("1", 0);
        assert!(!cart.contains("1"));

        cart.set_quantity("2", -4);
        assert!(cart.is_empty());

        // Unknown product is a no-op
        cart.set_quantity("missing", 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_put_quantity_overwrites_or_appends() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.put_quantity(product.clone(), 4);
        assert_eq!(cart.line("1").map(|l| l.quantity), Some(4));

        cart.put_quantity(product, 2);
        assert_eq!(cart.line("1").map(|l| l.quantity), Some(2));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_remove_item_is_silent_when_absent() {
        let mut cart = Cart::new();
        cart.add_item(test_product("1", 999), 1).unwrap();

        assert!(cart.remove_item("2").is_none());
        assert!(cart.remove_item("1").is_some());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(test_product("b", 100), 1).unwrap();
        cart.add_item(test_product("a", 100), 1).unwrap();
        cart.add_item(test_product("b", 100), 1).unwrap();

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);
        cart.add_item(product.clone(), 2).unwrap();

        let snapshot = cart.snapshot();
        assert!(!Arc::ptr_eq(&snapshot[0].product, &product));
        assert_eq!(*snapshot[0].product, *product);

        cart.clear();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 2);
    }
}
