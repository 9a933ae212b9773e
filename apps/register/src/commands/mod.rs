//! # Commands Module
//!
//! The register prompt: one command per line.
//!
//! ## Command Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Register Commands                                    │
//! │                                                                         │
//! │  Ticket (→ Action)        Lookups (read only)      Session              │
//! │  ─────────────────        ───────────────────      ───────              │
//! │  add, select, qty         held, ledger             help                 │
//! │  remove, key              report, export           quit                 │
//! │  new, hold, retrieve      products, seller                              │
//! │  discount, pay            totals, receipt                               │
//! │  cancel, confirm                                                        │
//! │  dismiss, void                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing is in [`parse`], text output in [`view`]; this module resolves
//! references (held ticket positions, invoice ids) and runs actions.

mod parse;
pub mod view;

pub use parse::parse_line;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use caisse_core::keypad::{Key, UnknownKey};
use caisse_core::{Action, Outcome, Phase};

use crate::error::ApiError;
use crate::state::RegisterState;

// =============================================================================
// Command Types
// =============================================================================

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nothing,
    /// A single reducer action.
    Action(Action),
    /// Keypad presses, applied in order.
    Keys(Vec<Key>),
    Retrieve(TicketRef),
    /// Request a void by invoice id or transaction id.
    Void(String),
    /// Show the receipt of the current phase, of an invoice, or preview.
    Receipt(Option<String>),
    Held,
    Ledger,
    Report {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Export,
    Products {
        category: Option<String>,
        query: String,
    },
    Sellers,
    Totals,
    Help,
    Quit,
}

/// How the operator names a held ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketRef {
    Id(Uuid),
    /// 1-based position in the `held` listing.
    Position(usize),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("Not a date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Not a held ticket number or id: {0}")]
    InvalidTicketRef(String),

    #[error(transparent)]
    Key(#[from] UnknownKey),
}

/// What the prompt prints after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

// =============================================================================
// Execution
// =============================================================================

/// Runs a parsed command against the register.
pub fn execute(state: &RegisterState, command: Command) -> Result<Reply, ApiError> {
    let currency = &state.establishment().currency;

    let text = match command {
        Command::Nothing => String::new(),
        Command::Quit => return Ok(Reply::Quit),
        Command::Help => view::HELP.to_string(),
        Command::Action(action) => {
            let outcome = state.dispatch(action)?;
            after_action(state, &outcome)?
        }
        Command::Keys(keys) => {
            let mut outcome = Outcome::Updated;
            for key in keys {
                outcome = state.dispatch(Action::Key { key })?;
            }
            after_action(state, &outcome)?
        }
        Command::Retrieve(reference) => {
            let ticket_id = resolve_held(state, reference)?;
            let outcome = state.dispatch(Action::Retrieve { ticket_id })?;
            after_action(state, &outcome)?
        }
        Command::Void(reference) => {
            let transaction_id = resolve_sale(state, &reference)?;
            let outcome = state.dispatch(Action::RequestVoid { transaction_id })?;
            after_action(state, &outcome)?
        }
        Command::Receipt(Some(invoice_id)) => {
            view::receipt(&state.receipt_for_invoice(&invoice_id)?)
        }
        Command::Receipt(None) => {
            if state.current_receipt()?.is_none() {
                state.dispatch(Action::PrintReceipt)?;
            }
            match state.current_receipt()? {
                Some(receipt) => view::receipt(&receipt),
                None => String::new(),
            }
        }
        Command::Held => state.with_session(|s| view::held(s.held(), currency))?,
        Command::Ledger => state.with_session(|s| view::ledger(s.ledger(), currency))?,
        Command::Report { start, end } => {
            let today = Utc::now().date_naive();
            let start = start.unwrap_or(today);
            let report = state.report(start, end.unwrap_or(start.max(today)))?;
            view::report(&report, currency)
        }
        Command::Export => state.export_ledger()?,
        Command::Products { category, query } => {
            let products = state
                .catalog()
                .search(category.as_deref(), &query)
                .map_err(|e| ApiError::validation(e.to_string()))?;
            view::products(&products, currency)
        }
        Command::Sellers => view::sellers(state.catalog().users()),
        Command::Totals => state.with_session(|s| view::ticket(s, currency))?,
    };
    Ok(Reply::Text(text))
}

/// What to show once an action went through.
fn after_action(state: &RegisterState, outcome: &Outcome) -> Result<String, ApiError> {
    let currency = &state.establishment().currency;
    let session = state.session()?;

    let mut text = view::outcome(outcome, currency);
    let screen = match session.phase() {
        Phase::Receipt { .. } => state
            .current_receipt()?
            .map(|r| view::receipt(&r))
            .unwrap_or_default(),
        Phase::AwaitingPayment => view::payment_prompt(
            &session,
            session.available_payment_methods(state.catalog(), state.user().role),
            currency,
        ),
        phase => view::phase_prompt(phase).unwrap_or_else(|| view::ticket(&session, currency)),
    };

    if !text.is_empty() && !screen.is_empty() {
        text.push('\n');
    }
    text.push_str(&screen);
    Ok(text)
}

fn resolve_held(state: &RegisterState, reference: TicketRef) -> Result<Uuid, ApiError> {
    match reference {
        TicketRef::Id(id) => Ok(id),
        TicketRef::Position(n) => state
            .with_session(|s| s.held().iter().nth(n - 1).map(|t| t.id))?
            .ok_or_else(|| ApiError::not_found("Held ticket", &n.to_string())),
    }
}

fn resolve_sale(state: &RegisterState, reference: &str) -> Result<Uuid, ApiError> {
    if let Ok(id) = Uuid::parse_str(reference) {
        return Ok(id);
    }
    state
        .with_session(|s| s.ledger().find_by_invoice(reference).map(|t| t.id))?
        .ok_or_else(|| ApiError::not_found("Sale", reference))
}
