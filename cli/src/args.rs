//! Command-line definition.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use ventasimple_types::{Bucket, DateRange, ExportFormat, LicensePlan};

// ── CLI definition ───────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ventasimple", about = "Venta Simple account console", version)]
pub struct Cli {
    /// Backend URL
    #[arg(long, env = "VENTASIMPLE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the session token and device id
    #[arg(long, env = "VENTASIMPLE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login(Credentials),
    /// Create an account and sign in
    Register(Credentials),
    /// Forget the session token
    Logout,
    /// Show the session, device and license owner
    Whoami,
    /// License and subscription
    #[command(subcommand)]
    License(LicenseCommand),
    /// Business profile
    #[command(subcommand)]
    Business(BusinessCommand),
    /// Data retention policy and cleanup
    #[command(subcommand)]
    Retention(RetentionCommand),
    /// Table maintenance
    #[command(subcommand)]
    Tables(TablesCommand),
    /// Exports of data outside the retention window
    #[command(subcommand)]
    Export(ExportCommand),
    /// Sales statistics
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Camera monitoring (beta)
    #[command(subcommand)]
    Cameras(CamerasCommand),
}

/// The password is prompted for when neither `--password` nor
/// `VENTASIMPLE_PASSWORD` is given, which keeps it out of shell history.
#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    /// Prefer the prompt or VENTASIMPLE_PASSWORD; flags show up in process listings
    #[arg(long, env = "VENTASIMPLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LicenseCommand {
    /// Show the license
    Show,
    /// Re-check the subscription with the payment provider
    Refresh,
    /// Link this device to the license
    Attach,
    /// Unlink a device
    Detach { device_id: String },
    /// Pause the subscription
    Pause,
    /// Resume a paused subscription
    Resume,
    /// Cancel the subscription
    Cancel {
        #[arg(long)]
        yes: bool,
    },
    /// Re-link the payment method; prints a checkout URL
    ChangeMethod {
        /// Mercado Pago account email (defaults to the license owner)
        #[arg(long)]
        mp_email: Option<String>,
        #[arg(long)]
        plan: Option<LicensePlan>,
    },
    /// Start a subscription; prints a checkout URL
    Subscribe {
        plan: LicensePlan,
        #[arg(long)]
        mp_email: Option<String>,
    },
    /// List plans and prices
    Plans,
}

#[derive(Subcommand, Debug)]
pub enum BusinessCommand {
    Show,
    /// Update the given fields, keeping the rest
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cuit: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RetentionCommand {
    Show,
    /// Update the given settings, keeping the rest
    Set {
        /// Days to keep (1-60)
        #[arg(long)]
        days: Option<u32>,
        /// Export a PDF before deleting
        #[arg(long)]
        auto_export_pdf: Option<bool>,
        /// Cleanup schedule, e.g. weekly
        #[arg(long)]
        frequency: Option<String>,
    },
    /// Count what a cleanup would delete
    Preview,
    /// Delete everything outside the retention window
    Run {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    List,
    Info {
        table: String,
    },
    Vacuum {
        table: String,
    },
    /// Delete every row of a table
    Truncate {
        table: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Queue an export of data outside the retention window
    Create {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Poll until the export finishes
        #[arg(long)]
        wait: bool,
    },
    List,
    Status {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    Summary(RangeArgs),
    /// Best-selling products
    Top {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    /// Units sold per category
    Categories(RangeArgs),
    /// Sales over time
    Series {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "day")]
        bucket: Bucket,
    },
    /// Compare with the previous period
    Compare(RangeArgs),
    /// Sales by weekday and hour
    Heatmap(RangeArgs),
}

/// `--from`/`--to` in `YYYY-MM-DD`. Defaults to the last 30 days.
#[derive(Args, Debug, Default)]
pub struct RangeArgs {
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    /// Resolves the bounds; a missing `--from` means 30 days before `to`.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange> {
        let to = match &self.to {
            Some(raw) => parse_date("--to", raw)?,
            None => today,
        };
        let from = match &self.from {
            Some(raw) => parse_date("--from", raw)?,
            None => DateRange::last_days(30, to).from,
        };
        if from > to {
            bail!("--from must not be after --to");
        }
        Ok(DateRange::new(from, to))
    }

    pub fn resolve_today(&self) -> Result<DateRange> {
        self.resolve(Local::now().date_naive())
    }
}

fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("{flag} expects YYYY-MM-DD, got {raw:?}"))
}

#[derive(Subcommand, Debug)]
pub enum CamerasCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rtsp_url: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rtsp_url: Option<String>,
    },
    /// Enable or disable a camera
    Toggle {
        id: String,
    },
    /// Probe a camera's stream
    Test {
        id: String,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Ask for the camera service to be enabled
    RequestActivation,
    /// Recent detections
    Events {
        #[arg(long)]
        camera: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long, default_value_t = 200)]
        limit: u32,
    },
}
