//! License records as served by `GET /license`.
//!
//! The backend (and the payment provider behind it) owns every field here.
//! Status strings arrive in several spellings, so they are folded into
//! [`LicenseStatus`] before anything branches on them.

use crate::de;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicensePlan {
    /// One device.
    Single,
    /// Up to three devices.
    Multi,
}

impl LicensePlan {
    /// All plans, in the order they are offered.
    pub const ALL: [Self; 2] = [Self::Single, Self::Multi];

    /// Returns the maximum number of devices for this plan.
    #[must_use]
    pub fn max_devices(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Multi => 3,
        }
    }

    /// Returns the wire name of the plan.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }

    /// Returns the advertised monthly price.
    #[must_use]
    pub fn monthly_price(&self) -> &'static str {
        match self {
            Self::Single => "$2.999 ARS/mes",
            Self::Multi => "$4.499 ARS/mes",
        }
    }
}

impl fmt::Display for LicensePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicensePlan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(Error::InvalidValue {
                kind: "plan",
                value: s.to_string(),
            }),
        }
    }
}

/// The normalized subscription status.
///
/// [`LicenseStatus::normalize`] is total: every input maps to exactly one
/// variant, and input that matches no known spelling maps to
/// [`LicenseStatus::Unknown`] rather than to some arbitrary default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LicenseStatus {
    Active,
    Paused,
    Cancelled,
    PastDue,
    Trial,
    OnHold,
    Expired,
    Pending,
    /// No status, or a spelling this client does not recognize.
    #[default]
    Unknown,
}

impl LicenseStatus {
    /// Every variant, `Unknown` last.
    pub const ALL: [Self; 9] = [
        Self::Active,
        Self::Paused,
        Self::Cancelled,
        Self::PastDue,
        Self::Trial,
        Self::OnHold,
        Self::Expired,
        Self::Pending,
        Self::Unknown,
    ];

    /// Folds a backend status string into the closed set.
    ///
    /// Matching is case-insensitive, ignores surrounding whitespace and
    /// treats `-`, `_` and inner spaces as the same separator.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let folded: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match folded.as_str() {
            "active" | "authorized" => Self::Active,
            "paused" => Self::Paused,
            "cancelled" | "canceled" => Self::Cancelled,
            "past_due" | "pastdue" => Self::PastDue,
            "trial" | "trialing" | "trial_period" => Self::Trial,
            "on_hold" | "onhold" => Self::OnHold,
            "expired" => Self::Expired,
            "pending" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical wire spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::PastDue => "past_due",
            Self::Trial => "trial",
            Self::OnHold => "on_hold",
            Self::Expired => "expired",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }

    /// Returns a short human label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Cancelled => "CANCELLED",
            Self::PastDue => "PAYMENT OVERDUE",
            Self::Trial => "TRIAL",
            Self::OnHold => "UNDER REVIEW",
            Self::Expired => "EXPIRED",
            Self::Pending => "PENDING",
            Self::Unknown => "NO STATUS",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl Serialize for LicenseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LicenseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = de::lenient(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unknown, Self::normalize))
    }
}

/// The client's cached view of the backend license record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default)]
    pub status: LicenseStatus,
    #[serde(default, deserialize_with = "de::lenient")]
    pub plan: Option<LicensePlan>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::lenient_list")]
    pub devices: Vec<String>,
    /// License token handed to the point-of-sale app.
    #[serde(default, deserialize_with = "de::lenient")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub user_email: Option<String>,
}

impl License {
    /// Plan used for limits; a missing plan counts as single.
    #[must_use]
    pub fn effective_plan(&self) -> LicensePlan {
        self.plan.unwrap_or(LicensePlan::Single)
    }

    /// Returns the maximum number of attached devices.
    #[must_use]
    pub fn device_limit(&self) -> usize {
        self.effective_plan().max_devices()
    }

    /// Returns true if `device_id` is already attached.
    #[must_use]
    pub fn has_device(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d == device_id)
    }

    /// Returns true if another device can be attached.
    #[must_use]
    pub fn has_free_seat(&self) -> bool {
        self.devices.len() < self.device_limit()
    }

    /// Whole days until expiry (rounded up, never negative).
    #[must_use]
    pub fn days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|end| crate::days_left(end, now))
    }
}
