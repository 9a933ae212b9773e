//! Plain-text rendering for the terminal.

use std::sync::Arc;

use caisse_core::held::HeldTickets;
use caisse_core::report::SalesReport;
use caisse_core::{
    Currency, Ledger, Outcome, PaymentMethod, Phase, Product, Receipt, Session, Totals,
    User,
};

/// Width of the receipt and ticket columns.
const WIDTH: usize = 42;

pub const HELP: &str = "\
Ticket
  add <product> [qty]        add a product (quantities sum)
  select <product>           tap a product (uses the keypad quantity)
  qty <product> <n>          set a line quantity (0 removes)
  remove <product>           remove a line
  key <k>...                 keypad: 0-9 . qty enter back clear
  discount [percent]         open the discount dialog, or apply a value
  new | hold | held          new ticket, hold it, list held tickets
  retrieve <n|id>            bring back a held ticket
  pay [method [room]]        open payment, or pay with a method
  receipt [invoice]          preview the ticket, or reprint a sale
  cancel | confirm | dismiss
Back office
  void <invoice|id>          remove a sale (admin/manager)
  ledger | export            list sales, or dump them as JSON
  report [from] [to]         sales report, dates as YYYY-MM-DD
  products [@category] [q]   search the catalog
  seller [id]                list sellers, or attribute the ticket
  totals | help | quit";

/// Left text and right-aligned amount on one line.
fn row(left: &str, right: &str) -> String {
    let pad = WIDTH.saturating_sub(left.chars().count() + right.chars().count());
    format!("{}{}{}", left, " ".repeat(pad.max(1)), right)
}

fn rule() -> String {
    "-".repeat(WIDTH)
}

fn centered(text: &str) -> String {
    let pad = WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

// =============================================================================
// Ticket
// =============================================================================

/// The ticket being built, with its totals.
pub fn ticket(session: &Session, currency: &Currency) -> String {
    let seller = session.seller_name().unwrap_or_else(|| "-".to_string());
    let mut lines = vec![format!("{}  ·  {}", session.active_invoice(), seller)];

    if session.cart().is_empty() {
        lines.push("(empty ticket)".to_string());
    }
    for line in session.cart().lines() {
        lines.push(row(
            &format!("{} x {}", line.quantity, line.product.name),
            &line.line_total().format_with(currency),
        ));
    }

    if !session.entry().is_empty() || session.entry().is_quantity_mode() {
        let mode = if session.entry().is_quantity_mode() { "qty" } else { "keypad" };
        lines.push(format!("[{}] {}", mode, session.entry().buffer()));
    }

    if !session.cart().is_empty() {
        lines.push(rule());
        lines.push(totals(&session.totals(), currency));
        if !session.discount().is_zero() {
            lines.push(format!("Remise {}", session.discount()));
        }
    }
    lines.join("\n")
}

/// Totals block with the per-rate VAT table.
pub fn totals(totals: &Totals, currency: &Currency) -> String {
    let mut lines = vec![row(
        "Sous-total TTC",
        &totals.subtotal_tax_inclusive.format_with(currency),
    )];
    if !totals.discount_amount.is_zero() {
        lines.push(row(
            "Remise",
            &format!("-{}", totals.discount_amount.format_with(currency)),
        ));
    }
    for (rate, entry) in &totals.vat_breakdown {
        lines.push(row(
            &format!("TVA {}%  HT {}", rate, entry.tax_exclusive.format_with(currency)),
            &entry.tax.format_with(currency),
        ));
    }
    lines.push(row("Total HT", &totals.total_tax_exclusive.format_with(currency)));
    lines.push(row("Total TVA", &totals.total_tax.format_with(currency)));
    lines.push(row("TOTAL TTC", &totals.total_tax_inclusive.format_with(currency)));
    lines.join("\n")
}

// =============================================================================
// Dialogs
// =============================================================================

/// Prompt for dialogs that replace the ticket view.
pub fn phase_prompt(phase: &Phase) -> Option<String> {
    match phase {
        Phase::Discount { input } => Some(format!(
            "Remise (%): {}_   [key 0-9 . back clear enter | dismiss]",
            input.as_str()
        )),
        Phase::ConfirmCancel => Some("Annuler le ticket en cours ? [confirm | dismiss]".to_string()),
        Phase::ConfirmVoid { transaction_id } => Some(format!(
            "Supprimer la vente {} ? Action irréversible. [confirm | dismiss]",
            transaction_id
        )),
        _ => None,
    }
}

pub fn payment_prompt(
    session: &Session,
    methods: Vec<&PaymentMethod>,
    currency: &Currency,
) -> String {
    let mut lines = vec![row(
        "A payer",
        &session.totals().total_tax_inclusive.format_with(currency),
    )];
    for method in methods {
        let room = if method.requires_room_number { " <room>" } else { "" };
        lines.push(format!("  pay {}{}   ({})", method.id, room, method.label));
    }
    lines.push("  dismiss".to_string());
    lines.join("\n")
}

/// One-line feedback for an accepted action.
pub fn outcome(outcome: &Outcome, currency: &Currency) -> String {
    match outcome {
        Outcome::Updated => String::new(),
        Outcome::Held { invoice_id, .. } => format!("Ticket {} mis en attente", invoice_id),
        Outcome::Retrieved { invoice_id, .. } => format!("Ticket {} repris", invoice_id),
        Outcome::NewTicket {
            invoice_id,
            auto_held: Some(_),
        } => format!("Ticket précédent mis en attente, nouveau ticket {}", invoice_id),
        Outcome::NewTicket { invoice_id, .. } => format!("Nouveau ticket {}", invoice_id),
        Outcome::Paid {
            invoice_id, total, ..
        } => format!("Ticket {} payé: {}", invoice_id, total.format_with(currency)),
        Outcome::Cleared => "Ticket annulé".to_string(),
        Outcome::Voided { transaction } => format!(
            "Vente {} supprimée ({})",
            transaction.invoice_id,
            transaction.totals.total_tax_inclusive.format_with(currency)
        ),
        Outcome::Ignored(reason) => format!("Rien à faire ({:?})", reason),
    }
}

// =============================================================================
// Receipt
// =============================================================================

pub fn receipt(receipt: &Receipt) -> String {
    let shop = &receipt.establishment;
    let currency = &shop.currency;
    let name = shop.name.to_uppercase();
    let mut lines = Vec::new();

    for header in [
        name.as_str(),
        shop.address1.as_str(),
        shop.address2.as_str(),
        shop.tel.as_str(),
        shop.tva_number.as_str(),
        shop.ice_number.as_str(),
    ] {
        if !header.is_empty() {
            lines.push(centered(header));
        }
    }
    lines.push(centered(&shop.point_of_sale_name));
    lines.push(centered(&shop.welcome_message));
    lines.push(rule());

    lines.push(row("Facture", receipt.invoice_id.as_str()));
    lines.push(row(
        "Date",
        &receipt.issued_at.format("%d/%m/%Y %H:%M").to_string(),
    ));
    lines.push(row("Vendeur", &receipt.seller_name));
    lines.push(rule());

    for line in &receipt.lines {
        lines.push(line.name.clone());
        lines.push(row(
            &format!("  {} x {}", line.quantity, line.unit_price.format_with(currency)),
            &line.line_total.format_with(currency),
        ));
    }
    lines.push(rule());
    lines.push(row("Articles", &receipt.article_count.to_string()));
    lines.push(totals(&receipt.totals, currency));

    match &receipt.payment {
        Some(payment) => {
            lines.push(row("Paiement", &payment.method));
            if let Some(room) = &payment.room_number {
                lines.push(row("Chambre", room));
            }
        }
        None => lines.push(centered("*** APERCU ***")),
    }

    lines.push(rule());
    for footer in [
        &shop.thank_you_message,
        &shop.footer_note1,
        &shop.footer_note2,
    ] {
        if !footer.is_empty() {
            lines.push(centered(footer));
        }
    }
    lines.join("\n")
}

// =============================================================================
// Lists
// =============================================================================

pub fn held(held: &HeldTickets, currency: &Currency) -> String {
    if held.is_empty() {
        return "Aucun ticket en attente".to_string();
    }
    held.iter()
        .enumerate()
        .map(|(i, ticket)| {
            row(
                &format!(
                    "{}. {}  {}  {} art.  {}",
                    i + 1,
                    ticket.invoice_id,
                    ticket.held_at.format("%H:%M"),
                    ticket.article_count(),
                    ticket.seller_name.as_deref().unwrap_or("-"),
                ),
                &ticket.totals().total_tax_inclusive.format_with(currency),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn ledger(ledger: &Ledger, currency: &Currency) -> String {
    if ledger.is_empty() {
        return "Aucune vente".to_string();
    }
    ledger
        .iter()
        .map(|tx| {
            row(
                &format!(
                    "{}  {}  {}",
                    tx.invoice_id,
                    tx.completed_at.format("%d/%m %H:%M"),
                    tx.payment_method
                ),
                &tx.totals.total_tax_inclusive.format_with(currency),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn report(report: &SalesReport, currency: &Currency) -> String {
    let mut lines = vec![
        format!("MAIN COURANTE {} → {}", report.start, report.end),
        rule(),
    ];

    if report.is_empty() {
        lines.push("Aucune vente.".to_string());
    }
    for row_data in &report.journal {
        lines.push(row(
            &format!(
                "{}  ch.{}  {}  {}",
                row_data.invoice_id,
                row_data.room_number.as_deref().unwrap_or("-"),
                row_data.seller_name.as_deref().unwrap_or("-"),
                row_data.payment_method
            ),
            &row_data.total.format_with(currency),
        ));
    }
    lines.push(rule());
    for total in &report.payment_totals {
        lines.push(row(&total.method, &total.total.format_with(currency)));
    }
    lines.push(row("TOTAL", &report.journal_total().format_with(currency)));

    lines.push(String::new());
    lines.push("VENTES PAR PRODUIT".to_string());
    lines.push(rule());
    for product in &report.product_sales {
        lines.push(row(
            &format!(
                "{} {} x{} @{}",
                product.code,
                product.name,
                product.quantity,
                product.unit_price.format_with(currency)
            ),
            &product.total.format_with(currency),
        ));
    }
    lines.push(row(
        "TOTAL VENTES",
        &report.product_sales_total.format_with(currency),
    ));
    lines.join("\n")
}

pub fn products(products: &[&Arc<Product>], currency: &Currency) -> String {
    if products.is_empty() {
        return "Aucun produit".to_string();
    }
    products
        .iter()
        .map(|p| row(&format!("{}  {}", p.id, p.name), &p.price.format_with(currency)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sellers(users: &[User]) -> String {
    users
        .iter()
        .map(|u| format!("{}  {} ({})", u.id, u.name, u.role))
        .collect::<Vec<_>>()
        .join("\n")
}
