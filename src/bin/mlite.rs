//! mlite command-line host
//!
//! Lexes, parses and runs workflow scripts. Set `RUST_LOG=info` to see backend
//! script output and `RUST_LOG=debug` for assignments and branch decisions.

use mlite_core::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
