//! Wiring shared by every command.

use crate::args::Cli;
use crate::output;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use ventasimple_client::{ApiClient, ClientConfig};
use ventasimple_export::{ExportPoller, PollerConfig};
use ventasimple_license::LicenseSynchronizer;
use ventasimple_session::{FileStorage, KeyValueStorage, PersistedDeviceId, SessionStore};
use ventasimple_types::{DeviceId, Notice, Notifier};

/// How often the data directory is rescanned for changes made by other
/// processes.
const STORAGE_SCAN_INTERVAL: Duration = Duration::from_secs(1);

pub struct App {
    pub client: ApiClient,
    pub session: Arc<SessionStore>,
    pub device_id: DeviceId,
    pub notifier: Arc<dyn Notifier>,
    pub json: bool,
    watcher: JoinHandle<()>,
}

impl App {
    /// Builds the client, opens the data directory and loads the session.
    /// Must be called inside a Tokio runtime.
    pub fn init(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &cli.api_url {
            config.base_url = url.clone();
        }
        let client = ApiClient::new(&config).context("failed to build the HTTP client")?;
        debug!(base_url = client.gateway().base_url(), "api client ready");

        let storage = match &cli.data_dir {
            Some(dir) => FileStorage::open(dir),
            None => FileStorage::open_default(),
        }
        .context("failed to open the data directory")?;
        debug!(dir = %storage.dir().display(), "storage opened");

        let watcher = storage.watch(STORAGE_SCAN_INTERVAL);
        let storage: Arc<dyn KeyValueStorage> = Arc::new(storage);
        let device_id = DeviceId::get_or_create(storage.as_ref());
        let session = Arc::new(SessionStore::open(storage));

        let notifier: Arc<dyn Notifier> = Arc::new(|notice: Notice| output::notice(&notice));

        Ok(Self {
            client,
            session,
            device_id,
            notifier,
            json: cli.json,
            watcher,
        })
    }

    /// The session token, or an error telling the user to sign in.
    pub fn token(&self) -> Result<String> {
        self.session
            .require_token()
            .map_err(|_| anyhow!("not signed in; run `ventasimple login` first"))
    }

    pub fn synchronizer(&self) -> LicenseSynchronizer {
        LicenseSynchronizer::new(
            self.client.clone(),
            Arc::clone(&self.session),
            self.device_id.clone(),
            Arc::clone(&self.notifier),
        )
    }

    pub fn poller(&self) -> ExportPoller {
        ExportPoller::new(
            self.client.clone(),
            Arc::clone(&self.session),
            Arc::clone(&self.notifier),
            PollerConfig::default(),
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.watcher.abort();
        self.session.close();
    }
}
