//! # Caisse Register Library
//!
//! Terminal front-end of Caisse POS: reads one command per line, runs it
//! through the ticket engine and prints the result.
//!
//! ## Module Organization
//! ```text
//! caisse_register/
//! ├── lib.rs          ◄─── You are here (startup & prompt loop)
//! ├── config.rs       ◄─── register.toml + CAISSE_* environment
//! ├── error.rs        ◄─── ApiError returned by commands
//! ├── state/
//! │   ├── mod.rs      ◄─── State exports
//! │   └── register.rs ◄─── Session store, dispatch, logging
//! └── commands/
//!     ├── mod.rs      ◄─── Command types & execution
//!     ├── parse.rs    ◄─── Line parser
//!     └── view.rs     ◄─── Text rendering
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use caisse_core::{Catalog, MemoryStore};

use commands::{execute, parse_line, Reply};
use config::RegisterConfig;
use error::ApiError;
use state::RegisterState;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,caisse=debug";

/// Command-line flags.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Caisse POS terminal register", long_about = None)]
pub struct Cli {
    /// Path to register.toml. Defaults to the platform config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// User id to run the session as (overrides the config file).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Log filter, e.g. "debug" or "caisse_register=trace".
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Runs the register on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging ─── RUST_LOG, else --log-filter, else default    │
/// │  2. Load Configuration ─── defaults → register.toml → CAISSE_* env      │
/// │  3. Resolve Catalog Refs ─ currency code, session user                  │
/// │  4. Create State ───────── RegisterState over a MemoryStore             │
/// │  5. Prompt Loop ────────── parse ► execute ► print, until quit / EOF    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// # Errors
///
/// Only startup fails: a missing or invalid config, an unknown currency or
/// user, or a broken terminal. Rejected commands are printed and the loop
/// goes on.
pub fn run(cli: Cli) -> Result<(), ApiError> {
    init_tracing(cli.log_filter.as_deref());

    info!("Starting Caisse register");

    let config = RegisterConfig::load(cli.config)?;
    let catalog = Catalog::builtin();
    let establishment = config.resolve_establishment(&catalog)?;
    let user = config.resolve_user(&catalog, cli.user.as_deref())?;
    info!(user = %user.id, role = %user.role, pos = %establishment.point_of_sale_name, "Session opened");

    let state = RegisterState::new(catalog, user, establishment, Box::new(MemoryStore::new()))?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    prompt_loop(&state, stdin.lock(), &mut stdout)?;

    info!("Register closed");
    Ok(())
}

/// Reads commands until `quit` or end of input.
pub fn prompt_loop(
    state: &RegisterState,
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<(), ApiError> {
    writeln!(output, "Caisse POS · {} (type 'help')", state.user().name)?;

    for line in input.lines() {
        let line = line?;
        let result = parse_line(&line)
            .map_err(ApiError::from)
            .and_then(|command| execute(state, command));

        match result {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => writeln!(output, "{}", text)?,
            Err(err) => writeln!(output, "{}", err)?,
        }
        output.flush()?;
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `--log-filter caisse_register=trace` - Used when `RUST_LOG` is unset
/// - Default: `info,caisse=debug`
///
/// Logs go to stderr so they never mix with the prompt output.
fn init_tracing(cli_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli_filter.unwrap_or(DEFAULT_LOG_FILTER)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
