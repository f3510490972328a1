//! Camera monitoring (beta) records.

use crate::de;
use crate::ids::RemoteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /ai/cameras`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraList {
    /// Whether the service is enabled for this account.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub enabled: bool,
    /// Whether activation has already been requested.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub requested: bool,
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub items: Vec<Camera>,
}

impl CameraList {
    /// Looks up a camera name by ID.
    #[must_use]
    pub fn name_of(&self, id: &RemoteId) -> Option<&str> {
        self.items
            .iter()
            .find(|c| c.id.as_ref() == Some(id))
            .map(|c| c.name.as_str())
    }
}

/// A registered camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(default, deserialize_with = "de::lenient")]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rtsp_url: String,
    #[serde(default, deserialize_with = "de::lenient")]
    pub status: Option<String>,
}

impl Camera {
    /// Returns true if the camera is enabled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// Body of camera create/update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraInput {
    pub name: String,
    pub rtsp_url: String,
}

/// `POST /ai/cameras/:id/test`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraTestResult {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub ok: bool,
    #[serde(default, deserialize_with = "de::lenient")]
    pub message: Option<String>,
}

/// A detection reported by a camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraEvent {
    #[serde(default, deserialize_with = "de::lenient")]
    pub id: Option<RemoteId>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub camera_id: Option<RemoteId>,
    #[serde(rename = "type", default, deserialize_with = "de::lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_number")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub snapshot_url: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CameraEvent {
    /// When the event happened, falling back to when it was stored.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.occurred_at.or(self.created_at)
    }

    /// Confidence as a whole percentage, e.g. `87%`.
    #[must_use]
    pub fn confidence_label(&self) -> Option<String> {
        self.confidence
            .filter(|c| *c > 0.0)
            .map(|c| format!("{:.0}%", c * 100.0))
    }
}

/// Query of `GET /ai/events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub camera_id: Option<String>,
    pub kind: Option<String>,
    pub limit: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            camera_id: None,
            kind: None,
            limit: 200,
        }
    }
}

impl EventFilter {
    /// Query-string pairs; empty filters are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(id) = self.camera_id.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("cameraId", id.to_string()));
        }
        if let Some(kind) = self.kind.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("type", kind.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}
