//! Library half of the `ventasimple` binary: argument definitions and
//! command dispatch.

mod app;
pub mod args;
mod commands;
mod output;

pub use app::App;
pub use args::Cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "VENTASIMPLE_LOG";

/// Installs the log subscriber. `verbose` forces debug output; otherwise
/// `VENTASIMPLE_LOG` is read, defaulting to warnings only.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let app = App::init(&cli)?;
    commands::dispatch(&app, cli.command).await
}
