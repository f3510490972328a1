//! Client session state for the Venta Simple console.
//!
//! - [`KeyValueStorage`]: durable key-value storage with change
//!   notifications ([`MemoryStorage`], [`FileStorage`])
//! - [`SessionStore`]: the bearer token, cached in memory and kept in sync
//!   with storage and with other stores sharing it
//! - [`PersistedDeviceId`]: the stable per-device identifier
//! - [`auth`]: login, registration and logout

/// Login, registration and logout.
pub mod auth;
mod device;
mod error;
mod session;
mod storage;

pub use auth::AuthError;
pub use device::{PersistedDeviceId, DEVICE_ID_KEY};
pub use error::{StorageError, StorageResult};
pub use session::{SessionStore, TOKEN_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, Origin, StorageEvent};
