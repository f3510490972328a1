//! File-backed storage: one file per key under a data directory.
//!
//! Two processes pointed at the same directory behave like two tabs once
//! each runs [`FileStorage::watch`]. Change detection compares each file's
//! modification time and size against the last state this process saw.

use super::{KeyValueStorage, Origin, StorageEvent, EVENT_CAPACITY};
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const APP_DIR: &str = "ventasimple";
const TEMP_PREFIX: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileState {
    modified_at: SystemTime,
    size: u64,
}

/// One file per key under a data directory. Clones share state.
#[derive(Clone)]
pub struct FileStorage {
    inner: Arc<Inner>,
}

struct Inner {
    dir: PathBuf,
    events: broadcast::Sender<StorageEvent>,
    /// Last seen state per key, for change detection.
    states: Mutex<HashMap<String, FileState>>,
}

impl FileStorage {
    /// `<data dir>/ventasimple`, e.g. `~/.local/share/ventasimple` on Linux.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR))
    }

    /// Opens [`default_dir`](Self::default_dir).
    pub fn open_default() -> StorageResult<Self> {
        let dir = Self::default_dir().ok_or(StorageError::NoDataDir)?;
        Self::open(dir)
    }

    /// Opens (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!(dir = %dir.display(), "created storage directory");
        }
        let states = scan(&dir)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                dir,
                events,
                states: Mutex::new(states),
            }),
        })
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.inner.dir.join(urlencoding::encode(key).as_ref())
    }

    fn states(&self) -> std::sync::MutexGuard<'_, HashMap<String, FileState>> {
        self.inner
            .states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, key: &str, origin: Origin) {
        let _ = self.inner.events.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
    }

    /// Rescans the directory and emits an [`Origin::EXTERNAL`] event for
    /// every key whose file appeared, changed or disappeared since the last
    /// scan or write. Returns the changed keys.
    pub fn poll_changes(&self) -> StorageResult<Vec<String>> {
        let current = scan(&self.inner.dir)?;
        let changed = {
            let mut states = self.states();
            let mut changed: Vec<String> = current
                .iter()
                .filter(|(key, state)| states.get(*key) != Some(state))
                .map(|(key, _)| key.clone())
                .collect();
            changed.extend(
                states
                    .keys()
                    .filter(|key| !current.contains_key(*key))
                    .cloned(),
            );
            *states = current;
            changed
        };

        for key in &changed {
            debug!(%key, "external storage change");
            self.notify(key, Origin::EXTERNAL);
        }
        Ok(changed)
    }

    /// Spawns a task that calls [`poll_changes`](Self::poll_changes) every
    /// `every`. The task ends when the last handle to this storage is
    /// dropped, or when the returned handle is aborted.
    pub fn watch(&self, every: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = (FileStorage { inner }).poll_changes() {
                    warn!(error = %e, "storage change scan failed");
                }
            }
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::Encoding {
                    key: key.to_string(),
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str, origin: Origin) -> StorageResult<()> {
        let path = self.path_for(key);
        let tmp = self
            .inner
            .dir
            .join(format!("{TEMP_PREFIX}{}.tmp", urlencoding::encode(key)));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        if let Some(state) = file_state(&path) {
            self.states().insert(key.to_string(), state);
        }
        self.notify(key, origin);
        Ok(())
    }

    fn remove(&self, key: &str, origin: Origin) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }
        self.states().remove(key);
        self.notify(key, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.inner.events.subscribe()
    }
}

fn file_state(path: &Path) -> Option<FileState> {
    let metadata = fs::metadata(path).ok()?;
    Some(FileState {
        modified_at: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        size: metadata.len(),
    })
}

/// Current state of every key file in `dir`. Temp files are skipped.
fn scan(dir: &Path) -> StorageResult<HashMap<String, FileState>> {
    let mut states = HashMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(TEMP_PREFIX) {
            continue;
        }
        let Ok(key) = urlencoding::decode(name) else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(state) = file_state(&path) {
            states.insert(key.into_owned(), state);
        }
    }
    Ok(states)
}
