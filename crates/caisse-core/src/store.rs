//! # Session Storage
//!
//! The register keeps its session behind [`SessionStore`] so a durable
//! backend can replace [`MemoryStore`] without touching the reducer.

use std::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::ticket::Session;

// =============================================================================
// Store Trait
// =============================================================================

/// Where the register session lives between actions.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or `None` when nothing was saved yet.
    fn load(&self) -> CoreResult<Option<Session>>;

    /// Replaces the stored session.
    fn save(&self, session: &Session) -> CoreResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Keeps the session in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> CoreResult<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> CoreResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }
}
