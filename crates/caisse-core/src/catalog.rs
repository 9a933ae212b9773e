//! # Catalog
//!
//! Read-only reference data the ticket engine consults: products,
//! categories, users (who double as sellers) and payment methods.
//!
//! ## Built-in Menu
//! ```text
//! ┌──────────────────────┬──────────┬─────────────────────────────────────┐
//! │ Category             │ Products │ Price range (TTC, VAT 10 %)         │
//! ├──────────────────────┼──────────┼─────────────────────────────────────┤
//! │ NOS SALADES          │    2     │ 70.00                               │
//! │ NOS GRILLADES        │    8     │ 60.00 - 120.00                      │
//! │ NOS SANDWICHS        │    3     │ 40.00 - 60.00                       │
//! │ NOS PIZZAS           │    5     │ 50.00 - 70.00                       │
//! │ NOS PANINIS          │    4     │ 40.00 - 50.00                       │
//! │ NOS DESSERTS         │    3     │ 30.00 - 35.00                       │
//! │ MENU ENFANTS         │    1     │ 70.00                               │
//! └──────────────────────┴──────────┴─────────────────────────────────────┘
//! ```
//!
//! Catalog maintenance screens live outside this crate; here the catalog is
//! only ever read.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Category, Currency, PaymentMethod, Product, TaxRate, User, UserRole};
use crate::validation::{
    validate_price, validate_search_query, validate_tax_rate_bps, ValidationResult,
};

/// Stock level given to every built-in product.
const DEFAULT_STOCK: i64 = 50;

// =============================================================================
// Catalog
// =============================================================================

/// Products, categories, users and payment methods of the establishment.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Arc<Product>>,
    users: Vec<User>,
    payment_methods: Vec<PaymentMethod>,
    currencies: Vec<Currency>,
}

impl Catalog {
    /// Builds a catalog, validating every product.
    ///
    /// ## Rules
    /// - Product ids are unique
    /// - Prices are non-negative
    /// - VAT rates are at most 100 %
    pub fn new(
        categories: Vec<Category>,
        products: Vec<Product>,
        users: Vec<User>,
        payment_methods: Vec<PaymentMethod>,
    ) -> ValidationResult<Self> {
        for (index, product) in products.iter().enumerate() {
            validate_price(product.price)?;
            validate_tax_rate_bps(product.vat_rate.bps())?;

            if product.id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "product id".to_string(),
                });
            }
            if products[..index].iter().any(|p| p.id == product.id) {
                return Err(ValidationError::InvalidFormat {
                    field: "product id".to_string(),
                    reason: format!("'{}' is used more than once", product.id),
                });
            }
        }

        Ok(Catalog {
            categories,
            products: products.into_iter().map(Arc::new).collect(),
            users,
            payment_methods,
            currencies: builtin_currencies(),
        })
    }

    /// The built-in restaurant menu, users and payment methods.
    pub fn builtin() -> Self {
        Catalog {
            categories: builtin_categories(),
            products: builtin_products().into_iter().map(Arc::new).collect(),
            users: builtin_users(),
            payment_methods: builtin_payment_methods(),
            currencies: builtin_currencies(),
        }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Filters products by category, then by case-insensitive name match.
    ///
    /// ## Example
    /// ```rust
    /// use caisse_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::builtin();
    /// let pizzas = catalog.search(Some("cat_pizzas"), "").unwrap();
    /// assert_eq!(pizzas.len(), 5);
    ///
    /// let found = catalog.search(None, "POULET").unwrap();
    /// assert!(found.iter().all(|p| p.name.to_lowercase().contains("poulet")));
    /// ```
    pub fn search(
        &self,
        category_id: Option<&str>,
        query: &str,
    ) -> ValidationResult<Vec<&Arc<Product>>> {
        let query = validate_search_query(query)?.to_lowercase();

        Ok(self
            .products
            .iter()
            .filter(|p| category_id.map_or(true, |c| p.category_id == c))
            .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn seller(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Sellers on held tickets are recorded by name.
    pub fn seller_by_name(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Session user when none is configured: the first admin, else the
    /// first user.
    pub fn default_session_user(&self) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.role == UserRole::Admin)
            .or_else(|| self.users.first())
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.id == id)
    }

    /// Methods the role may settle with (free tickets are privileged).
    pub fn payment_methods_for(&self, role: UserRole) -> Vec<&PaymentMethod> {
        self.payment_methods
            .iter()
            .filter(|m| m.is_available_to(role))
            .collect()
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

// =============================================================================
// Built-in Data
// =============================================================================

fn builtin_categories() -> Vec<Category> {
    [
        ("cat_salades", "NOS SALADES", "green"),
        ("cat_grillades", "NOS GRILLADES", "red"),
        ("cat_sandwichs", "NOS SANDWICHS", "yellow"),
        ("cat_pizzas", "NOS PIZZAS", "orange"),
        ("cat_paninis", "NOS PANINIS", "amber"),
        ("cat_desserts", "NOS DESSERTS", "pink"),
        ("cat_menu_enfants", "MENU ENFANTS", "purple"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

fn builtin_products() -> Vec<Product> {
    [
        ("prod_salade_fes_inn", "Salade FES INN", 7000, "cat_salades"),
        ("prod_salade_quinoa", "Salade Quinoa (Avocat/Mangue)", 7000, "cat_salades"),
        ("prod_filet_boeuf", "Filet de Bœuf", 12000, "cat_grillades"),
        ("prod_entrecote", "Entrecôte Grillée", 9000, "cat_grillades"),
        ("prod_broch_viande", "Brochettes Viande Hachée", 7000, "cat_grillades"),
        ("prod_saucisses_grillees", "Saucisses Viande Grillées", 8000, "cat_grillades"),
        ("prod_cuisse_poulet", "Cuisse de Poulet", 6000, "cat_grillades"),
        ("prod_pilons_poulet", "Pilons de Poulet", 6000, "cat_grillades"),
        ("prod_broch_volaille", "Brochettes de Volaille", 6000, "cat_grillades"),
        ("prod_filet_poulet_marine", "Filet de Poulet Mariné", 6000, "cat_grillades"),
        ("prod_sand_volaille", "Sandwich de Volaille", 6000, "cat_sandwichs"),
        ("prod_sand_fromage", "Sandwich de Fromage", 4000, "cat_sandwichs"),
        ("prod_sand_thon", "Sandwich au Thon", 6000, "cat_sandwichs"),
        ("prod_pizza_margarita", "Pizza Margarita", 5000, "cat_pizzas"),
        ("prod_pizza_quatre_saisons", "Pizza Quatre Saisons", 7000, "cat_pizzas"),
        ("prod_pizza_fruits_mer", "Pizza Fruits de Mer", 7000, "cat_pizzas"),
        ("prod_pizza_bolognaise", "Pizza Bolognaise", 6000, "cat_pizzas"),
        ("prod_pizza_vegetarienne", "Pizza Végétarienne", 5500, "cat_pizzas"),
        ("prod_panini_viande", "Panini Viande Hachée", 4000, "cat_paninis"),
        ("prod_panini_poulet", "Panini Poulet", 4000, "cat_paninis"),
        ("prod_panini_mixte", "Panini Mixte", 5000, "cat_paninis"),
        ("prod_panini_charcuterie", "Panini Charcuterie", 5000, "cat_paninis"),
        ("prod_salade_fruits", "Salade de Fruits", 3000, "cat_desserts"),
        ("prod_coupe_glace", "Coupe de Glace", 3500, "cat_desserts"),
        ("prod_creme_caramel", "Crème Caramel", 3000, "cat_desserts"),
        ("prod_menu_enfant_burger", "Menu Enfant (Burger/Nuggets)", 7000, "cat_menu_enfants"),
    ]
    .into_iter()
    .map(|(id, name, cents, category)| {
        Product::new(id, name, Money::from_cents(cents), TaxRate::REDUCED, category)
            .with_stock(DEFAULT_STOCK)
    })
    .collect()
}

fn builtin_users() -> Vec<User> {
    vec![
        User {
            id: "user_admin_01".to_string(),
            name: "Admin".to_string(),
            email: "admin@pos.com".to_string(),
            role: UserRole::Admin,
        },
        User {
            id: "user_cashier_01".to_string(),
            name: "Marie".to_string(),
            email: "marie@pos.com".to_string(),
            role: UserRole::Cashier,
        },
    ]
}

fn builtin_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod::new("cash", "Espèce"),
        PaymentMethod::new("room_transfer", "Transfert Chambre").requiring_room_number(),
        PaymentMethod::new("card", "Carte Crédit"),
        PaymentMethod::new("gratuit", "Gratuité").privileged(),
        PaymentMethod::new("cheque", "Chèque"),
    ]
}

fn builtin_currencies() -> Vec<Currency> {
    vec![
        Currency::new("MAD", "DH"),
        Currency::new("EUR", "€"),
        Currency::new("USD", "$"),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
