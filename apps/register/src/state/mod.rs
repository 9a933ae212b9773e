//! # State Module
//!
//! Everything the register keeps between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RegisterState                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │   Catalog    │  │ Session user │  │ Establishment│  │SessionStore │ │
//! │  │  (read-only) │  │  (id, role)  │  │  (receipts)  │  │ (Session)   │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │                                                                         │
//! │  dispatch(action):                                                      │
//! │    load ──► apply(&session, action, &Context{now, new id}) ──► save     │
//! │    (rejected actions save nothing)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod register;

pub use register::RegisterState;
