//! The persisted device identifier.

use crate::storage::{KeyValueStorage, Origin};
use tracing::{info, warn};
use ventasimple_types::DeviceId;

/// Storage key of the device identifier.
pub const DEVICE_ID_KEY: &str = "deviceId";

/// Loads a [`DeviceId`] from storage, creating it on first use.
pub trait PersistedDeviceId: Sized {
    /// Returns the stored identifier, generating and persisting one if
    /// none exists. A storage failure yields a fresh, unpersisted ID.
    fn get_or_create(storage: &dyn KeyValueStorage) -> Self;
}

impl PersistedDeviceId for DeviceId {
    fn get_or_create(storage: &dyn KeyValueStorage) -> Self {
        match storage.get(DEVICE_ID_KEY) {
            Ok(Some(existing)) if !existing.trim().is_empty() => {
                return DeviceId::from_string(existing.trim().to_string());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to read device id"),
        }

        let id = DeviceId::generate();
        match storage.set(DEVICE_ID_KEY, id.as_str(), Origin::next()) {
            Ok(()) => info!(device = id.short(), "generated device id"),
            Err(e) => warn!(error = %e, "failed to persist device id"),
        }
        id
    }
}
