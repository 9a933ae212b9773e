//! # Register State
//!
//! Owns the session and is the only place that calls the reducer.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use caisse_core::store::SessionStore;
use caisse_core::ticket::Ignored;
use caisse_core::{
    apply, Action, Catalog, Context, EstablishmentDetails, Outcome, Phase, Receipt, SalesReport,
    Seller, Session, Transition, User,
};

use crate::error::ApiError;

/// Register state shared by all commands.
pub struct RegisterState {
    catalog: Catalog,
    user: User,
    establishment: EstablishmentDetails,
    store: Box<dyn SessionStore>,
}

impl RegisterState {
    /// Creates the state, starting a session attributed to `user` unless the
    /// store already holds one.
    pub fn new(
        catalog: Catalog,
        user: User,
        establishment: EstablishmentDetails,
        store: Box<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        if store.load()?.is_none() {
            store.save(&Session::with_seller(Seller::from(&user)))?;
        }
        Ok(RegisterState {
            catalog,
            user,
            establishment,
            store,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The logged-in session user.
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn establishment(&self) -> &EstablishmentDetails {
        &self.establishment
    }

    /// Current session snapshot.
    pub fn session(&self) -> Result<Session, ApiError> {
        self.store
            .load()?
            .ok_or_else(|| ApiError::internal("No session in store"))
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session()?;
        Ok(f(&session))
    }

    /// Runs one action through the reducer and stores the new session.
    ///
    /// A rejected action leaves the stored session untouched.
    pub fn dispatch(&self, action: Action) -> Result<Outcome, ApiError> {
        self.dispatch_at(action, Utc::now(), Uuid::new_v4())
    }

    fn dispatch_at(
        &self,
        action: Action,
        now: DateTime<Utc>,
        entity_id: Uuid,
    ) -> Result<Outcome, ApiError> {
        let session = self.session()?;
        let ctx = Context::new(&self.catalog, self.user.role, now, entity_id);
        let operation = action.operation();
        debug!(?action, user = %self.user.id, "Dispatching action");

        match apply(&session, action, &ctx) {
            Ok(Transition {
                session: next,
                outcome,
            }) => {
                log_outcome(&outcome, &next);
                self.store.save(&next)?;
                Ok(outcome)
            }
            Err(err) => {
                warn!(operation, phase = %session.phase(), error = %err, "Action rejected");
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Read Models
    // =========================================================================

    /// Receipt shown by the current phase, if any.
    pub fn current_receipt(&self) -> Result<Option<Receipt>, ApiError> {
        let session = self.session()?;
        let receipt = match session.phase() {
            Phase::Receipt {
                transaction_id: None,
            } => Some(Receipt::preview(&session, &self.establishment, Utc::now())),
            Phase::Receipt {
                transaction_id: Some(id),
            } => session
                .ledger()
                .get(id)
                .map(|tx| Receipt::for_transaction(tx, &self.establishment)),
            _ => None,
        };
        Ok(receipt)
    }

    /// Receipt of a recorded sale, by invoice id.
    pub fn receipt_for_invoice(&self, invoice_id: &str) -> Result<Receipt, ApiError> {
        self.session()?
            .ledger()
            .find_by_invoice(invoice_id)
            .map(|tx| Receipt::for_transaction(tx, &self.establishment))
            .ok_or_else(|| ApiError::not_found("Sale", invoice_id))
    }

    pub fn report(&self, start: NaiveDate, end: NaiveDate) -> Result<SalesReport, ApiError> {
        self.with_session(|s| SalesReport::for_period(s.ledger(), start, end))
    }

    /// The ledger as pretty JSON.
    pub fn export_ledger(&self) -> Result<String, ApiError> {
        let session = self.session()?;
        Ok(serde_json::to_string_pretty(session.ledger())?)
    }
}

fn log_outcome(outcome: &Outcome, session: &Session) {
    match outcome {
        Outcome::Held {
            ticket_id,
            invoice_id,
        } => info!(%invoice_id, %ticket_id, held = session.held().len(), "Ticket held"),
        Outcome::Retrieved {
            ticket_id,
            invoice_id,
        } => info!(
            %invoice_id,
            %ticket_id,
            total = %session.totals().total_tax_inclusive,
            "Ticket retrieved"
        ),
        Outcome::NewTicket {
            invoice_id,
            auto_held: Some(ticket_id),
        } => info!(%invoice_id, held_ticket = %ticket_id, "New ticket, previous one held"),
        Outcome::NewTicket { invoice_id, .. } => debug!(%invoice_id, "New ticket"),
        Outcome::Paid {
            transaction_id,
            invoice_id,
            total,
        } => info!(%invoice_id, %transaction_id, %total, "Ticket paid"),
        Outcome::Voided { transaction } => info!(
            invoice_id = %transaction.invoice_id,
            transaction_id = %transaction.id,
            total = %transaction.totals.total_tax_inclusive,
            method = %transaction.payment_method,
            "Sale voided"
        ),
        Outcome::Cleared => debug!(invoice_id = %session.active_invoice(), "Ticket cleared"),
        Outcome::Ignored(reason @ (Ignored::HeldTicketNotFound | Ignored::TransactionNotFound)) => {
            warn!(?reason, "Nothing to act on")
        }
        Outcome::Ignored(reason) => debug!(?reason, "Action ignored"),
        Outcome::Updated => {}
    }
}
