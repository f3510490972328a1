//! Authentication, license and subscription endpoints.

use super::ApiClient;
use crate::error::ApiResult;
use crate::gateway::RequestOptions;
use serde_json::{json, Value};
use ventasimple_types::{ActionAck, CheckoutResponse, License, LicensePlan, LoginResponse};

impl ApiClient {
    /// `POST /login`.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = json!({ "email": email, "password": password });
        self.fetch("/login", RequestOptions::post().json(body)).await
    }

    /// `POST /register`. The body is passed through as-is.
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<Value> {
        let body = json!({ "email": email, "password": password });
        Ok(self
            .call("/register", RequestOptions::post().json(body))
            .await?
            .into_json())
    }

    /// `GET /license`.
    pub async fn license(&self, token: &str) -> ApiResult<License> {
        self.fetch("/license", RequestOptions::get().bearer(token)).await
    }

    /// Asks the backend to re-check the subscription with the payment
    /// provider and returns the updated license.
    pub async fn refresh_license(&self, token: &str) -> ApiResult<License> {
        self.fetch("/license/refresh", RequestOptions::post().bearer(token))
            .await
    }

    /// Links `device_id` to the license. Body `{deviceId}`.
    pub async fn attach_device(&self, token: &str, device_id: &str) -> ApiResult<License> {
        let body = json!({ "deviceId": device_id });
        self.fetch(
            "/license/devices/attach",
            RequestOptions::post().bearer(token).json(body),
        )
        .await
    }

    /// Unlinks `device_id` from the license. Body `{deviceId}`.
    pub async fn detach_device(&self, token: &str, device_id: &str) -> ApiResult<License> {
        let body = json!({ "deviceId": device_id });
        self.fetch(
            "/license/devices/detach",
            RequestOptions::post().bearer(token).json(body),
        )
        .await
    }

    /// `POST /subscribe`; the checkout URL comes back as `init_point`.
    pub async fn subscribe(
        &self,
        token: &str,
        plan: LicensePlan,
        mp_email: Option<&str>,
    ) -> ApiResult<CheckoutResponse> {
        let body = json!({ "plan": plan.as_str(), "mpEmail": mp_email });
        self.fetch("/subscribe", RequestOptions::post().bearer(token).json(body))
            .await
    }

    /// `POST /subscription/cancel`.
    pub async fn cancel_subscription(&self, token: &str) -> ApiResult<ActionAck> {
        self.fetch("/subscription/cancel", RequestOptions::post().bearer(token))
            .await
    }

    /// `POST /subscription/pause`.
    pub async fn pause_subscription(&self, token: &str) -> ApiResult<ActionAck> {
        self.fetch("/subscription/pause", RequestOptions::post().bearer(token))
            .await
    }

    /// `POST /subscription/resume`.
    pub async fn resume_subscription(&self, token: &str) -> ApiResult<ActionAck> {
        self.fetch("/subscription/resume", RequestOptions::post().bearer(token))
            .await
    }

    /// `POST /subscription/change-method` with `{mpEmail, plan}`; the new
    /// checkout URL comes back as `init_point`.
    pub async fn change_payment_method(
        &self,
        token: &str,
        mp_email: Option<&str>,
        plan: Option<LicensePlan>,
    ) -> ApiResult<CheckoutResponse> {
        let body = json!({ "mpEmail": mp_email, "plan": plan.map(|p| p.as_str()) });
        self.fetch(
            "/subscription/change-method",
            RequestOptions::post().bearer(token).json(body),
        )
        .await
    }
}
