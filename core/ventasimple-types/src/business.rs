//! Business profile, retention policy and table maintenance payloads.

use crate::de;
use crate::format::format_bytes;
use serde::{Deserialize, Serialize};

/// Longest retention window the backend accepts, in days.
pub const MAX_RETENTION_DAYS: u32 = 60;

/// Retention used when the configured value is missing or zero.
pub const FALLBACK_RETENTION_DAYS: u32 = 30;

/// Business metadata printed on exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::lenient")]
    pub name: Option<String>,
    /// Tax identifier.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::lenient")]
    pub cuit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::lenient")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de::lenient")]
    pub phone: Option<String>,
}

/// Data retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSettings {
    #[serde(default, deserialize_with = "de::lenient")]
    pub days: Option<u32>,
    /// Export a PDF of expiring records before they are deleted.
    #[serde(default, deserialize_with = "de::lenient")]
    pub auto_export_pdf: Option<bool>,
    /// Cleanup schedule, e.g. `weekly`.
    #[serde(default, deserialize_with = "de::lenient")]
    pub frequency: Option<String>,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            days: Some(MAX_RETENTION_DAYS),
            auto_export_pdf: Some(true),
            frequency: Some("weekly".to_string()),
        }
    }
}

impl RetentionSettings {
    /// Retention window after clamping to `1..=MAX_RETENTION_DAYS`.
    #[must_use]
    pub fn effective_days(&self) -> u32 {
        match self.days {
            None | Some(0) => FALLBACK_RETENTION_DAYS,
            Some(days) => days.min(MAX_RETENTION_DAYS),
        }
    }

    /// Returns a copy with `days` clamped, ready to be saved.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            days: Some(self.effective_days()),
            ..self.clone()
        }
    }
}

/// Row count for one table in a cleanup report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCount {
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub count: Option<u64>,
}

/// Result of `POST /retention/run`, either a preview or an execution.
///
/// Keys mirror the backend's table names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    #[serde(rename = "DetalleVenta", default, deserialize_with = "de::lenient")]
    pub sale_lines: Option<RowCount>,
    #[serde(rename = "Venta", default, deserialize_with = "de::lenient")]
    pub sales: Option<RowCount>,
    /// Rows removed by an executed cleanup.
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub deleted: Option<u64>,
}

impl CleanupReport {
    /// Sale line rows that a preview would delete.
    #[must_use]
    pub fn sale_lines_count(&self) -> u64 {
        self.sale_lines.and_then(|r| r.count).unwrap_or(0)
    }

    /// Sale rows that a preview would delete.
    #[must_use]
    pub fn sales_count(&self) -> u64 {
        self.sales.and_then(|r| r.count).unwrap_or(0)
    }

    /// One-line summary of a preview.
    #[must_use]
    pub fn preview_summary(&self) -> String {
        format!(
            "Would delete {} sale lines and {} sales (and related rows).",
            self.sale_lines_count(),
            self.sales_count()
        )
    }
}

/// Entry of `GET /data/tables`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    #[serde(default)]
    pub name: String,
}

/// Detail of `GET /data/tables/:t`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub rows: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient_count")]
    pub size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub size_human: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub last_vacuum: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub last_analyze: Option<String>,
}

impl TableInfo {
    /// The backend's size label, or one computed from `size_bytes`.
    #[must_use]
    pub fn size_label(&self) -> String {
        match &self.size_human {
            Some(label) => label.clone(),
            None => format_bytes(self.size_bytes.unwrap_or(0)),
        }
    }
}
