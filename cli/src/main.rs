//! `ventasimple`: command-line console for a Venta Simple account.
//!
//! Usage:
//!   ventasimple login --email owner@example.com
//!   ventasimple license show
//!   ventasimple export create --format pdf --wait
//!
//! The session token and device id live under the data directory, so
//! separate invocations share one signed-in session.

use anyhow::Result;
use clap::Parser;
use ventasimple_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
