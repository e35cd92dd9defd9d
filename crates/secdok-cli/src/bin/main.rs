//! secdok CLI binary entry point
//!
//! Installs the diagnostics subscriber and calls the library's `run_cli()`.

use anyhow::Result;
use secdok_cli::run_cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
