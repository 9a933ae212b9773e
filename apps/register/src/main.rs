//! # Caisse Register Entry Point
//!
//! ```text
//! $ caisse-register --user user_cashier_01
//! Caisse POS · Marie (type 'help')
//! add prod_pizza_margarita 2
//! INV-0001  ·  Marie
//! 2 x Pizza Margarita                100,00 €
//! ...
//! ```

use clap::Parser;

use caisse_register::Cli;

fn main() {
    // Startup and the prompt loop live in lib.rs
    if let Err(err) = caisse_register::run(Cli::parse()) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
