//! License and subscription synchronization.
//!
//! The backend owns the license. This crate keeps a cached copy and the
//! actions that change it (pause, resume, cancel, payment-method change,
//! device attach and detach).
//!
//! # Protocol
//!
//! Every mutating action:
//! 1. marks its busy flag (cleared on every exit path),
//! 2. calls the backend with the token captured at call time,
//! 3. on success re-fetches `GET /license` and replaces the cache wholesale,
//! 4. reports the result as a [`Notice`](ventasimple_types::Notice).
//!
//! The cache is never mutated optimistically. Actions whose guards fail
//! are inert: no network call is made.

mod busy;
mod outcome;
mod synchronizer;

pub use busy::{Action, BusySnapshot};
pub use outcome::{ActionOutcome, InertReason};
pub use synchronizer::LicenseSynchronizer;
