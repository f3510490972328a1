//! One handler per subcommand.

mod account;
mod cameras;
mod data;
mod license;
mod stats;

use crate::app::App;
use crate::args::Command;
use anyhow::Result;

pub async fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login(creds) => account::login(app, &creds).await,
        Command::Register(creds) => account::register(app, &creds).await,
        Command::Logout => account::logout(app),
        Command::Whoami => account::whoami(app).await,
        Command::License(cmd) => license::run(app, cmd).await,
        Command::Business(cmd) => data::business(app, cmd).await,
        Command::Retention(cmd) => data::retention(app, cmd).await,
        Command::Tables(cmd) => data::tables(app, cmd).await,
        Command::Export(cmd) => data::export(app, cmd).await,
        Command::Stats(cmd) => stats::run(app, cmd).await,
        Command::Cameras(cmd) => cameras::run(app, cmd).await,
    }
}
