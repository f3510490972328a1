//! Small response envelopes shared by several endpoints.

use crate::de;
use serde::{Deserialize, Serialize};

/// Acknowledgement returned by subscription lifecycle and maintenance
/// calls. Success is signalled only by `ok: true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub ok: bool,
    #[serde(default, deserialize_with = "de::lenient")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub message: Option<String>,
}

/// Response of `/subscribe` and `/subscription/change-method`.
///
/// A present `init_point` is the payment provider's checkout URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default, deserialize_with = "de::lenient")]
    pub init_point: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub error: Option<String>,
}

/// Response of `/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "de::lenient")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub error: Option<String>,
}
