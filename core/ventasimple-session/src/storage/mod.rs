//! Durable key-value storage shared by session stores.
//!
//! Several stores ("tabs") may share one storage. Every write is broadcast
//! as a [`StorageEvent`] tagged with the writer's [`Origin`], so a store can
//! ignore its own writes and re-read on everyone else's.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageResult;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Capacity of each storage's change channel.
pub(crate) const EVENT_CAPACITY: usize = 64;

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Identifies the writer of a storage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin(u64);

impl Origin {
    /// Changes detected on disk, made by another process.
    pub const EXTERNAL: Origin = Origin(0);

    /// Allocates a process-unique origin.
    pub fn next() -> Self {
        Origin(NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed))
    }
}

/// A key changed (set or removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// The store that made the change, or [`Origin::EXTERNAL`].
    pub origin: Origin,
}

/// Durable string storage with change notifications.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str, origin: Origin) -> StorageResult<()>;

    fn remove(&self, key: &str, origin: Origin) -> StorageResult<()>;

    /// Receives an event for every change, including the caller's own.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
