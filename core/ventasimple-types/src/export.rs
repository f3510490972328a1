//! Export jobs (`/data/export`).

use crate::de;
use crate::ids::RemoteId;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Export range covering every record outside the retention window.
pub const OLDER_THAN_RETENTION: &str = "olderThanRetention";

/// Output format of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Csv,
}

impl ExportFormat {
    /// Wire name of the format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }

    /// Upper-case label used in listings and notices.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::InvalidValue {
                kind: "export format",
                value: s.to_string(),
            }),
        }
    }
}

/// Lifecycle state of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportStatus {
    Processing,
    Ready,
    Error,
    /// Missing or unrecognized status. Treated as still running.
    #[default]
    Unknown,
}

impl ExportStatus {
    /// Parses a status string case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "processing" => Self::Processing,
            "ready" => Self::Ready,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Returns true once the job will not change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = de::lenient(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unknown, Self::parse))
    }
}

/// One export job as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    #[serde(default, deserialize_with = "de::lenient")]
    pub id: Option<RemoteId>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub format: Option<ExportFormat>,
    #[serde(default)]
    pub status: ExportStatus,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub download_url: Option<String>,
}

impl ExportJob {
    /// Download link, only once the job is ready.
    #[must_use]
    pub fn download_link(&self) -> Option<&str> {
        match self.status {
            ExportStatus::Ready => self.download_url.as_deref(),
            _ => None,
        }
    }
}

/// Body of `POST /data/export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub range: String,
}

impl ExportRequest {
    /// Exports everything outside the retention window.
    #[must_use]
    pub fn older_than_retention(format: ExportFormat) -> Self {
        Self {
            format,
            range: OLDER_THAN_RETENTION.to_string(),
        }
    }
}
