//! Export job polling.
//!
//! An export runs asynchronously on the backend. [`ExportPoller`] requests
//! one and then checks its status on a timer until it is `ready` or
//! `error`, refreshing the export list and reporting a single notice when
//! it finishes.

mod config;
mod poller;

pub use config::{PollerConfig, DEFAULT_POLL_INTERVAL};
pub use poller::{ExportPoller, PollerState};
