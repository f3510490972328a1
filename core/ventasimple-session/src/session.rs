//! The bearer-token session store.

use crate::auth::AuthError;
use crate::storage::{KeyValueStorage, Origin, StorageEvent};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// One "tab": an in-memory copy of the token backed by durable storage.
///
/// Durable storage is authoritative. Writes made through other stores
/// sharing the same storage are picked up by a listener task, which
/// re-reads storage and updates this store's copy. Must be opened inside a
/// Tokio runtime.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    origin: Origin,
    token: Arc<watch::Sender<Option<String>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Reads the current token and starts listening for changes made
    /// elsewhere.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let origin = Origin::next();
        let events = storage.subscribe();
        let (tx, _) = watch::channel(read_token(storage.as_ref()));
        let token = Arc::new(tx);

        let listener = tokio::spawn(listen(
            Arc::clone(&storage),
            events,
            origin,
            Arc::clone(&token),
        ));

        Self {
            storage,
            origin,
            token,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// The current token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Returns true if a token is held.
    pub fn is_signed_in(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// The token, or [`AuthError::NotSignedIn`].
    pub fn require_token(&self) -> Result<String, AuthError> {
        self.token().ok_or(AuthError::NotSignedIn)
    }

    /// Persists `token` and notifies same-tab subscribers. A blank token
    /// signs out, the same way other tabs read it.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            self.clear_token();
            return;
        }
        if let Err(e) = self.storage.set(TOKEN_KEY, &token, self.origin) {
            warn!(error = %e, "failed to persist session token");
        }
        self.token.send_replace(Some(token));
    }

    /// Removes the token from storage and memory.
    pub fn clear_token(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY, self.origin) {
            warn!(error = %e, "failed to remove session token");
        }
        self.token.send_replace(None);
    }

    /// Watches the in-memory token.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }

    /// The storage backing this store.
    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    /// Stops listening for changes from other stores. Idempotent.
    pub fn close(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("session listener stopped");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_token(storage: &dyn KeyValueStorage) -> Option<String> {
    match storage.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.trim().is_empty()),
        Err(e) => {
            warn!(error = %e, "failed to read session token");
            None
        }
    }
}

async fn listen(
    storage: Arc<dyn KeyValueStorage>,
    mut events: broadcast::Receiver<StorageEvent>,
    origin: Origin,
    token: Arc<watch::Sender<Option<String>>>,
) {
    loop {
        match events.recv().await {
            Ok(event) if event.key == TOKEN_KEY && event.origin != origin => {}
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "session listener lagged; re-reading token");
            }
            Err(RecvError::Closed) => break,
        }
        let fresh = read_token(storage.as_ref());
        token.send_if_modified(|current| {
            if *current == fresh {
                false
            } else {
                *current = fresh;
                true
            }
        });
    }
}
