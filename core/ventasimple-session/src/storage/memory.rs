//! In-process storage.

use super::{KeyValueStorage, Origin, StorageEvent, EVENT_CAPACITY};
use crate::error::StorageResult;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// A shared in-memory map. Clones share the same data and channel.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

struct Inner {
    values: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                values: RwLock::new(HashMap::new()),
                events,
            }),
        }
    }

    fn notify(&self, key: &str, origin: Origin) {
        // No subscribers is fine.
        let _ = self.inner.events.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str, origin: Origin) -> StorageResult<()> {
        self.inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.notify(key, origin);
        Ok(())
    }

    fn remove(&self, key: &str, origin: Origin) -> StorageResult<()> {
        let removed = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if removed.is_some() {
            self.notify(key, origin);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.inner.events.subscribe()
    }
}
