//! `encounter` binary entry point.
//!
//! Parses command-line arguments with clap, prepares logging for the chosen
//! command, and dispatches via [`Cli::run`].

mod cli;
mod logging;
mod narrate;
mod script;
mod tui;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (log_dir, session) = cli.log_context();

    // Best effort, before tracing is initialized.
    logging::cleanup_old_logs(&log_dir);

    let _guard = logging::init_tracing(&log_dir, session.as_deref())?;

    cli.run().await
}
