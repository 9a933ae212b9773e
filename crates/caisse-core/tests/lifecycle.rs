//! End-to-end ticket lifecycle through the public API.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use caisse_core::calculator::{compute_totals, price_lines};
use caisse_core::ticket::Ignored;
use caisse_core::{
    apply, Action, Cart, CartLineItem, Catalog, Context, CoreError, Discount, Money, Outcome,
    Product, Receipt, SalesReport, Session, TaxRate, UserRole,
};

fn context(catalog: &Catalog) -> Context<'_> {
    Context::new(
        catalog,
        UserRole::Admin,
        Utc.with_ymd_and_hms(2024, 7, 14, 18, 45, 0).unwrap(),
        Uuid::new_v4(),
    )
}

fn run(session: &Session, catalog: &Catalog, actions: Vec<Action>) -> Session {
    actions.into_iter().fold(session.clone(), |s, action| {
        apply(&s, action, &context(catalog)).unwrap().session
    })
}

fn add(product_id: &str, quantity: i64) -> Action {
    Action::AddItem {
        product_id: product_id.to_string(),
        quantity,
    }
}

fn worked_example_lines() -> Vec<CartLineItem> {
    let a = Product::new("a", "A", Money::from_cents(7000), TaxRate::REDUCED, "plats");
    let b = Product::new("b", "B", Money::from_cents(5000), TaxRate::STANDARD, "boissons");
    let mut cart = Cart::new();
    cart.add_item(Arc::new(a), 2).unwrap();
    cart.add_item(Arc::new(b), 1).unwrap();
    cart.snapshot()
}

// =============================================================================
// Pricing
// =============================================================================

#[test]
fn worked_example_totals() {
    let totals = compute_totals(&worked_example_lines(), Discount::parse("10").unwrap());

    assert_eq!(totals.subtotal_tax_inclusive, Money::from_cents(19000));
    assert_eq!(totals.discount_amount, Money::from_cents(1900));
    assert_eq!(totals.total_tax_inclusive, Money::from_cents(17100));

    let reduced = totals.breakdown_for(TaxRate::REDUCED).unwrap();
    assert_eq!(reduced.tax_exclusive.rounded(), Money::from_cents(11455));
    assert_eq!(reduced.tax.rounded(), Money::from_cents(1145));

    let standard = totals.breakdown_for(TaxRate::STANDARD).unwrap();
    assert_eq!(standard.tax_exclusive.rounded(), Money::from_cents(3750));
    assert_eq!(standard.tax.rounded(), Money::from_cents(750));

    assert!(totals.vat_breakdown.contains_key("10.0"));
    assert!(totals.vat_breakdown.contains_key("20.0"));
}

#[test]
fn line_and_breakdown_sums_match_total() {
    let lines = worked_example_lines();
    for input in ["0", "10", "33.3", "100"] {
        let discount = Discount::parse(input).unwrap();
        let totals = compute_totals(&lines, discount);

        let from_lines: Money = price_lines(&lines, discount)
            .iter()
            .map(|l| l.tax_exclusive + l.tax)
            .sum();
        let from_breakdown: Money = totals
            .vat_breakdown
            .values()
            .map(|e| e.tax_inclusive())
            .sum();

        let tolerance = Decimal::new(1, 10);
        assert!((from_lines - totals.total_tax_inclusive).amount().abs() < tolerance);
        assert!((from_breakdown - totals.total_tax_inclusive).amount().abs() < tolerance);
    }
}

#[test]
fn zero_discount_matches_undiscounted() {
    let lines = worked_example_lines();
    let totals = compute_totals(&lines, Discount::NONE);
    assert_eq!(totals, compute_totals(&lines, Discount::parse("0").unwrap()));
    assert_eq!(totals.total_tax_inclusive, totals.subtotal_tax_inclusive);
    assert!(totals.discount_amount.is_zero());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn adding_twice_sums_quantities() {
    let catalog = Catalog::builtin();
    let session = run(
        &Session::new(),
        &catalog,
        vec![add("prod_pizza_margarita", 2), add("prod_pizza_margarita", 3)],
    );
    assert_eq!(session.cart().line_count(), 1);
    assert_eq!(session.cart().article_count(), 5);
}

#[test]
fn zero_quantity_removes_line() {
    let catalog = Catalog::builtin();
    let session = run(
        &Session::new(),
        &catalog,
        vec![
            add("prod_pizza_margarita", 2),
            Action::SetQuantity {
                product_id: "prod_pizza_margarita".to_string(),
                quantity: 0,
            },
        ],
    );
    assert!(session.cart().is_empty());
}

#[test]
fn hold_and_retrieve_round_trip() {
    let catalog = Catalog::builtin();
    let ctx = context(&catalog);
    let session = run(
        &Session::new(),
        &catalog,
        vec![
            Action::SelectSeller {
                seller_id: "user_cashier_01".to_string(),
            },
            add("prod_entrecote", 1),
            Action::ApplyDiscount {
                input: "5".to_string(),
            },
        ],
    );
    let before = session.clone();

    let held = apply(&session, Action::Hold, &ctx).unwrap().session;
    let ticket_id = ctx.entity_id;
    assert!(held.cart().is_empty());

    let restored = apply(&held, Action::Retrieve { ticket_id }, &context(&catalog))
        .unwrap()
        .session;
    assert_eq!(restored.cart().lines(), before.cart().lines());
    assert_eq!(restored.discount(), before.discount());
    assert_eq!(restored.active_invoice(), before.active_invoice());
    assert_eq!(restored.seller(), before.seller());

    // Idempotent: the ticket left the store
    let cleared = run(&restored, &catalog, vec![Action::Cancel, Action::Confirm]);
    let again = apply(&cleared, Action::Retrieve { ticket_id }, &context(&catalog)).unwrap();
    assert_eq!(again.outcome, Outcome::Ignored(Ignored::HeldTicketNotFound));
    assert_eq!(again.session, cleared);
}

#[test]
fn retrieve_into_busy_cart_is_rejected() {
    let catalog = Catalog::builtin();
    let ctx = context(&catalog);
    let session = run(&Session::new(), &catalog, vec![add("prod_entrecote", 1)]);
    let held = apply(&session, Action::Hold, &ctx).unwrap().session;
    let busy = run(&held, &catalog, vec![add("prod_pizza_margarita", 1)]);

    let result = apply(
        &busy,
        Action::Retrieve {
            ticket_id: ctx.entity_id,
        },
        &context(&catalog),
    );
    assert!(matches!(result, Err(CoreError::CartNotEmpty)));
    assert_eq!(busy.held().len(), 1);
    assert_eq!(busy.cart().article_count(), 1);
}

#[test]
fn payment_records_one_transaction() {
    let catalog = Catalog::builtin();
    let ctx = context(&catalog);
    let ready = run(
        &Session::new(),
        &catalog,
        vec![add("prod_pizza_margarita", 2), Action::OpenPayment],
    );
    let counter_before = ready.invoice_counter().value();

    let paid = apply(
        &ready,
        Action::SubmitPayment {
            method_id: "card".to_string(),
            room_number: None,
        },
        &ctx,
    )
    .unwrap()
    .session;

    assert_eq!(paid.ledger().len(), 1);
    assert_eq!(paid.ledger().latest().map(|t| t.id), Some(ctx.entity_id));
    assert!(paid.cart().is_empty());
    assert_eq!(paid.invoice_counter().value(), counter_before + 1);

    // Next sale goes in front
    let second = run(
        &run(&paid, &catalog, vec![Action::Dismiss]),
        &catalog,
        vec![
            add("prod_pizza_margarita", 1),
            Action::OpenPayment,
            Action::SubmitPayment {
                method_id: "cash".to_string(),
                room_number: None,
            },
        ],
    );
    assert_eq!(second.ledger().len(), 2);
    assert_eq!(
        second.ledger().latest().map(|t| t.invoice_id.as_str()),
        Some("INV-0002")
    );
}

#[test]
fn invoice_ids_never_repeat() {
    let catalog = Catalog::builtin();
    let session = run(
        &Session::new(),
        &catalog,
        vec![
            add("prod_pizza_margarita", 1),
            Action::Hold,
            add("prod_entrecote", 1),
            Action::StartNewTicket,
            add("prod_pizza_margarita", 1),
            Action::OpenPayment,
            Action::SubmitPayment {
                method_id: "cash".to_string(),
                room_number: None,
            },
        ],
    );

    let mut ids: Vec<String> = session
        .held()
        .iter()
        .map(|t| t.invoice_id.to_string())
        .chain(session.ledger().iter().map(|t| t.invoice_id.to_string()))
        .collect();
    ids.push(session.active_invoice().to_string());
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(session.active_invoice().as_str(), "INV-0004");
}

#[test]
fn receipt_and_report_from_ledger() {
    let catalog = Catalog::builtin();
    let ctx = context(&catalog);
    let session = run(
        &Session::new(),
        &catalog,
        vec![add("prod_pizza_margarita", 2), Action::OpenPayment],
    );
    let paid = apply(
        &session,
        Action::SubmitPayment {
            method_id: "cash".to_string(),
            room_number: None,
        },
        &ctx,
    )
    .unwrap()
    .session;
    let sale = paid.ledger().latest().unwrap();

    let receipt = Receipt::for_transaction(sale, &Default::default());
    assert_eq!(receipt.article_count, 2);
    assert_eq!(receipt.seller_name, "N/A");

    let day = ctx.now.date_naive();
    let report = SalesReport::for_period(paid.ledger(), day, day);
    assert_eq!(report.journal.len(), 1);
    assert_eq!(report.payment_totals[0].method, "Espèce");
    assert_eq!(report.product_sales[0].code, "PROD_PIZ");
}
