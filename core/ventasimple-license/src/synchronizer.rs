//! The license synchronizer.

use crate::busy::{Action, BusyFlags, BusyGuard, BusySnapshot};
use crate::outcome::{ActionOutcome, InertReason};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use ventasimple_client::{ApiClient, ApiError, ApiResult};
use ventasimple_session::SessionStore;
use ventasimple_types::{
    ActionAck, CheckoutResponse, DeviceId, License, LicensePlan, LicenseStatus, Notice, Notifier,
};

/// Cached license plus the actions that change it.
///
/// Concurrent refreshes are not ordered: whichever response lands last
/// replaces the cache.
pub struct LicenseSynchronizer {
    client: ApiClient,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    device_id: DeviceId,
    license: watch::Sender<Option<License>>,
    busy: BusyFlags,
}

impl LicenseSynchronizer {
    /// Creates a synchronizer with an empty cache. Call [`load`](Self::load)
    /// before relying on the guards.
    pub fn new(
        client: ApiClient,
        session: Arc<SessionStore>,
        device_id: DeviceId,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (license, _) = watch::channel(None);
        Self {
            client,
            session,
            notifier,
            device_id,
            license,
            busy: BusyFlags::default(),
        }
    }

    // ── Snapshots ────────────────────────────────────────────────

    /// The cached license, `None` before the first load.
    pub fn license(&self) -> Option<License> {
        self.license.borrow().clone()
    }

    /// Normalized status of the cached license; `Unknown` before a load.
    pub fn status(&self) -> LicenseStatus {
        self.license
            .borrow()
            .as_ref()
            .map(|l| l.status)
            .unwrap_or_default()
    }

    /// Which actions are in flight.
    pub fn busy(&self) -> BusySnapshot {
        self.busy.snapshot()
    }

    /// This device's identifier, used by [`attach_this_device`](Self::attach_this_device).
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Watches the cached license.
    pub fn watch(&self) -> watch::Receiver<Option<License>> {
        self.license.subscribe()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Initial fetch. Failures are logged and leave the cache as is.
    pub async fn load(&self) -> Option<License> {
        let token = self.session.token()?;
        match self.client.license(&token).await {
            Ok(license) => {
                self.replace(license);
                self.license()
            }
            Err(e) => {
                warn!(error = %e, "failed to load license");
                None
            }
        }
    }

    /// Asks the backend to re-check the subscription and caches the result.
    pub async fn refresh(&self) -> ActionOutcome {
        let (token, _busy) = match self.begin(Action::Refresh) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Refresh, reason),
        };
        match self.client.refresh_license(&token).await {
            Ok(license) => {
                self.replace(license);
                self.notify(Notice::success("License updated."));
                ActionOutcome::Applied(())
            }
            Err(e) => self.reject(&e, "Could not refresh the license."),
        }
    }

    // ── Subscription lifecycle ───────────────────────────────────

    /// Pauses the subscription. Inert when it is cancelled or already paused.
    pub async fn pause(&self) -> ActionOutcome {
        match self.status() {
            LicenseStatus::Cancelled => {
                return self.inert(Action::Pause, InertReason::AlreadyCancelled);
            }
            LicenseStatus::Paused => return self.inert(Action::Pause, InertReason::AlreadyPaused),
            _ => {}
        }
        let (token, _busy) = match self.begin(Action::Pause) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Pause, reason),
        };
        let result = self.client.pause_subscription(&token).await;
        self.settle_ack(&token, result, "Subscription paused.", "Could not pause.")
            .await
    }

    /// Resumes a paused subscription.
    pub async fn resume(&self) -> ActionOutcome {
        let (token, _busy) = match self.begin(Action::Resume) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Resume, reason),
        };
        let result = self.client.resume_subscription(&token).await;
        self.settle_ack(&token, result, "Subscription resumed.", "Could not resume.")
            .await
    }

    /// Cancels the subscription. Inert when it is already cancelled.
    pub async fn cancel(&self) -> ActionOutcome {
        if self.status() == LicenseStatus::Cancelled {
            return self.inert(Action::Cancel, InertReason::AlreadyCancelled);
        }
        let (token, _busy) = match self.begin(Action::Cancel) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Cancel, reason),
        };
        let result = self.client.cancel_subscription(&token).await;
        self.settle_ack(&token, result, "Subscription cancelled.", "Could not cancel.")
            .await
    }

    /// Starts a checkout to re-link the payment method. `mp_email` and
    /// `plan` default to the cached license's. Returns the checkout URL.
    pub async fn change_payment_method(
        &self,
        mp_email: Option<&str>,
        plan: Option<LicensePlan>,
    ) -> ActionOutcome<String> {
        let (token, _busy) = match self.begin(Action::ChangePaymentMethod) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::ChangePaymentMethod, reason),
        };
        let cached = self.license();
        let email = mp_email
            .map(str::to_string)
            .or_else(|| cached.as_ref().and_then(|l| l.user_email.clone()));
        let plan = plan.or_else(|| cached.as_ref().and_then(|l| l.plan));

        let result = self
            .client
            .change_payment_method(&token, email.as_deref(), plan)
            .await;
        match checkout_url(result, "Could not start the payment method change.") {
            Ok(url) => {
                self.reload(&token).await;
                self.notify(Notice::success(
                    "Open the checkout link to re-link your payment method.",
                ));
                ActionOutcome::Applied(url)
            }
            Err(message) => self.rejected(message),
        }
    }

    /// Starts a new subscription checkout. Returns the checkout URL; the
    /// license only changes once the payment provider confirms.
    pub async fn subscribe(&self, plan: LicensePlan, mp_email: Option<&str>) -> ActionOutcome<String> {
        let (token, _busy) = match self.begin(Action::Subscribe) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Subscribe, reason),
        };
        let result = self.client.subscribe(&token, plan, mp_email).await;
        match checkout_url(result, "Could not start the subscription.") {
            Ok(url) => {
                info!(plan = plan.as_str(), "subscription checkout created");
                self.notify(Notice::info("Open the checkout link to finish subscribing."));
                ActionOutcome::Applied(url)
            }
            Err(message) => self.rejected(message),
        }
    }

    // ── Devices ──────────────────────────────────────────────────

    /// Links this device, unless it already is or the plan is full.
    pub async fn attach_this_device(&self) -> ActionOutcome {
        if let Some(license) = self.license() {
            if license.has_device(self.device_id.as_str()) {
                return self.inert(Action::Attach, InertReason::AlreadyAttached);
            }
            if !license.has_free_seat() {
                let limit = license.device_limit();
                return self.inert(Action::Attach, InertReason::DeviceLimitReached { limit });
            }
        }
        let (token, _busy) = match self.begin(Action::Attach) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Attach, reason),
        };
        match self
            .client
            .attach_device(&token, self.device_id.as_str())
            .await
        {
            Ok(_) => {
                self.reload(&token).await;
                self.notify(Notice::success("Device linked."));
                ActionOutcome::Applied(())
            }
            Err(e) => self.reject(&e, "Could not link the device."),
        }
    }

    /// Unlinks `device_id`. Inert for an empty id.
    pub async fn detach(&self, device_id: &str) -> ActionOutcome {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return self.inert(Action::Detach, InertReason::EmptyDeviceId);
        }
        let (token, _busy) = match self.begin(Action::Detach) {
            Ok(started) => started,
            Err(reason) => return self.inert(Action::Detach, reason),
        };
        match self.client.detach_device(&token, device_id).await {
            Ok(_) => {
                self.reload(&token).await;
                self.notify(Notice::success("Device unlinked."));
                ActionOutcome::Applied(())
            }
            Err(e) => self.reject(&e, "Could not unlink the device."),
        }
    }

    // ── Internals ────────────────────────────────────────────────

    /// Captures the token and marks `action` busy.
    fn begin(&self, action: Action) -> Result<(String, BusyGuard<'_>), InertReason> {
        let token = self.session.token().ok_or(InertReason::NotSignedIn)?;
        let guard = self.busy.begin(action).ok_or(InertReason::Busy)?;
        debug!(%action, "license action started");
        Ok((token, guard))
    }

    fn inert<T>(&self, action: Action, reason: InertReason) -> ActionOutcome<T> {
        debug!(%action, %reason, "license action skipped");
        ActionOutcome::Inert(reason)
    }

    fn replace(&self, license: License) {
        debug!(status = %license.status, devices = license.devices.len(), "license cached");
        self.license.send_replace(Some(license));
    }

    /// Re-fetches the license after a successful action. A failed
    /// re-fetch keeps the previous copy.
    async fn reload(&self, token: &str) {
        match self.client.license(token).await {
            Ok(license) => self.replace(license),
            Err(e) => warn!(error = %e, "license re-fetch failed"),
        }
    }

    async fn settle_ack(
        &self,
        token: &str,
        result: ApiResult<ActionAck>,
        success: &str,
        fallback: &str,
    ) -> ActionOutcome {
        match result {
            Ok(ack) if ack.ok => {
                self.reload(token).await;
                self.notify(Notice::success(success));
                ActionOutcome::Applied(())
            }
            Ok(ack) => {
                let message = ack
                    .error
                    .or(ack.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                self.rejected(message)
            }
            Err(e) => self.reject(&e, fallback),
        }
    }

    fn reject<T>(&self, error: &ApiError, fallback: &str) -> ActionOutcome<T> {
        self.rejected(error_message(error, fallback))
    }

    fn rejected<T>(&self, message: String) -> ActionOutcome<T> {
        warn!(%message, "license action rejected");
        self.notify(Notice::error(message.clone()));
        ActionOutcome::Rejected(message)
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }
}

fn error_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Request(req) => req.message.clone(),
        _ => fallback.to_string(),
    }
}

/// The checkout URL of a successful checkout response, or the message
/// to report.
fn checkout_url(result: ApiResult<CheckoutResponse>, fallback: &str) -> Result<String, String> {
    match result {
        Ok(CheckoutResponse {
            init_point: Some(url),
            ..
        }) if !url.is_empty() => Ok(url),
        Ok(resp) => Err(resp
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())),
        Err(e) => Err(error_message(&e, fallback)),
    }
}
