//! Core type definitions for the Venta Simple console.
//!
//! This crate defines the types shared by every other crate in the
//! workspace:
//! - License records, plan limits and status normalization
//! - Export jobs and their lifecycle states
//! - Business profile, retention and table-maintenance payloads
//! - Sales statistics and the client-side shaping applied before charting
//! - Camera (beta) records and events
//! - User-facing notices
//!
//! Every wire type decodes leniently. The backend owns the schema, so a
//! missing or malformed field degrades to `None`/default instead of failing
//! the whole record.

mod business;
mod camera;
mod de;
mod export;
mod format;
mod ids;
mod license;
mod notice;
mod stats;
mod wire;

pub use business::{
    BusinessProfile, CleanupReport, RetentionSettings, RowCount, TableInfo, TableSummary,
    FALLBACK_RETENTION_DAYS, MAX_RETENTION_DAYS,
};
pub use camera::{Camera, CameraEvent, CameraInput, CameraList, CameraTestResult, EventFilter};
pub use export::{ExportFormat, ExportJob, ExportRequest, ExportStatus, OLDER_THAN_RETENTION};
pub use format::{days_left, format_bytes, format_money};
pub use ids::{DeviceId, RemoteId};
pub use license::{License, LicensePlan, LicenseStatus};
pub use notice::{Notice, NoticeKind, NoticeLog, Notifier};
pub use stats::{
    category_shares, Bucket, CategoryLeader, CategorySlice, DateRange, SalesSeries, SeriesPoint,
    StatsSummary, TopProduct,
};
pub use wire::{ActionAck, CheckoutResponse, LoginResponse};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid {kind}: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),
}
