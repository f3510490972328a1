//! The `idle -> polling -> idle` state machine.

use crate::config::PollerConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use ventasimple_client::{ApiClient, ApiError};
use ventasimple_session::SessionStore;
use ventasimple_types::{
    ExportFormat, ExportJob, ExportRequest, ExportStatus, Notice, Notifier, RemoteId,
};

/// Whether an export job is being polled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollerState {
    /// No job is being polled.
    #[default]
    Idle,
    /// `job_id` is checked every interval.
    Polling { job_id: RemoteId },
}

impl PollerState {
    /// Returns true while a job is being polled.
    pub fn is_polling(&self) -> bool {
        matches!(self, PollerState::Polling { .. })
    }
}

/// Polls one export job at a time.
///
/// Starting a new poll tears down the previous one. Dropping the poller
/// aborts any running poll.
pub struct ExportPoller {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    client: ApiClient,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    config: PollerConfig,
    state: watch::Sender<PollerState>,
    exports: watch::Sender<Vec<ExportJob>>,
    /// Bumped on every start/stop; a task only acts while it holds the
    /// current value.
    generation: AtomicU64,
}

impl ExportPoller {
    /// Creates an idle poller.
    pub fn new(
        client: ApiClient,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        config: PollerConfig,
    ) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        let (exports, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                client,
                session,
                notifier,
                config,
                state,
                exports,
                generation: AtomicU64::new(0),
            }),
            task: Mutex::new(None),
        }
    }

    /// Current state.
    pub fn state(&self) -> PollerState {
        self.shared.state.borrow().clone()
    }

    /// Watches the state; `Idle` is sent when a poll ends.
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.shared.state.subscribe()
    }

    /// The export list as of the last refresh.
    pub fn exports(&self) -> Vec<ExportJob> {
        self.shared.exports.borrow().clone()
    }

    /// Returns true if any cached job is still processing.
    pub fn has_processing(&self) -> bool {
        self.shared
            .exports
            .borrow()
            .iter()
            .any(|job| job.status == ExportStatus::Processing)
    }

    /// Re-fetches the export list. Returns false if nothing was fetched.
    pub async fn refresh_exports(&self) -> bool {
        match self.shared.session.token() {
            Some(token) => self.shared.reload_exports(&token).await,
            None => false,
        }
    }

    /// Queues an export of everything outside the retention window and
    /// starts polling it. Outcomes are reported as notices.
    pub async fn request_export(&self, format: ExportFormat) -> Option<ExportJob> {
        let Some(token) = self.shared.session.token() else {
            self.shared.notifier.notify(Notice::error("Sign in to request an export."));
            return None;
        };

        let request = ExportRequest::older_than_retention(format);
        match self.shared.client.create_export(&token, &request).await {
            Ok(job) => {
                self.shared.reload_exports(&token).await;
                self.shared
                    .notifier
                    .notify(Notice::success(format!("{} export queued.", format.label())));
                if let Some(id) = job.id.clone() {
                    self.start(id);
                }
                Some(job)
            }
            Err(e) => {
                let message = match e {
                    ApiError::Request(req) => req.message,
                    _ => "Could not create the export.".to_string(),
                };
                warn!(%message, "export request failed");
                self.shared.notifier.notify(Notice::error(message));
                None
            }
        }
    }

    /// Starts polling `job_id`, replacing any poll in progress.
    pub fn start(&self, job_id: RemoteId) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let generation = self.shared.advance(PollerState::Polling {
            job_id: job_id.clone(),
        });
        info!(job = %job_id, "polling export");
        *task = Some(tokio::spawn(poll(Arc::clone(&self.shared), generation, job_id)));
    }

    /// Stops polling without a notice.
    pub fn stop(&self) {
        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
            self.shared.advance(PollerState::Idle);
            debug!("export poll stopped");
        }
    }
}

impl Drop for ExportPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Bumps the generation and moves to `next` under the state lock.
    /// Returns the new generation.
    fn advance(&self, next: PollerState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = next;
        });
        generation
    }

    /// Goes idle if `generation` is still current. The check and the
    /// write happen under the state lock, so a concurrent `start` either
    /// sees this task's `Idle` or makes it a no-op.
    fn finish(&self, generation: u64) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }
            *state = PollerState::Idle;
            true
        })
    }

    async fn reload_exports(&self, token: &str) -> bool {
        match self.client.list_exports(token).await {
            Ok(jobs) => {
                self.exports.send_replace(jobs);
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to list exports");
                false
            }
        }
    }
}

async fn poll(shared: Arc<Shared>, generation: u64, job_id: RemoteId) {
    let every = shared.config.interval;
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !shared.is_current(generation) {
            return;
        }
        let Some(token) = shared.session.token() else {
            debug!(job = %job_id, "signed out; export poll stopped");
            shared.finish(generation);
            return;
        };

        let job = match shared.client.export_status(&token, &job_id).await {
            Ok(job) => job,
            Err(e) => {
                debug!(job = %job_id, error = %e, "export status check failed; retrying");
                continue;
            }
        };

        let notice = match job.status {
            ExportStatus::Ready => Notice::success("Export ready."),
            ExportStatus::Error => Notice::error("Export failed."),
            ExportStatus::Processing | ExportStatus::Unknown => {
                debug!(job = %job_id, status = job.status.as_str(), "export still running");
                continue;
            }
        };

        shared.reload_exports(&token).await;
        if shared.finish(generation) {
            info!(job = %job_id, status = job.status.as_str(), "export finished");
            shared.notifier.notify(notice);
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventasimple_client::ClientConfig;
    use ventasimple_session::MemoryStorage;
    use ventasimple_types::NoticeLog;

    fn poller() -> ExportPoller {
        let client = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let session = Arc::new(SessionStore::open(Arc::new(MemoryStorage::new())));
        ExportPoller::new(
            client,
            session,
            Arc::new(NoticeLog::new()),
            PollerConfig::with_interval(std::time::Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn stale_finish_leaves_the_new_poll_alone() {
        let poller = poller();
        let stale = poller.shared.advance(PollerState::Polling {
            job_id: RemoteId::new("1"),
        });
        poller.start(RemoteId::new("2"));

        assert!(!poller.shared.finish(stale));
        assert_eq!(
            poller.state(),
            PollerState::Polling {
                job_id: RemoteId::new("2")
            }
        );
    }

    #[tokio::test]
    async fn current_finish_goes_idle() {
        let poller = poller();
        let current = poller.shared.advance(PollerState::Polling {
            job_id: RemoteId::new("1"),
        });

        assert!(poller.shared.finish(current));
        assert_eq!(poller.state(), PollerState::Idle);
        assert!(!poller.shared.finish(current + 1));
    }
}
