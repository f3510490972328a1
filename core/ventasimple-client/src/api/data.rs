//! Business profile, retention, table maintenance and export endpoints.

use super::{segment, ApiClient};
use crate::error::ApiResult;
use crate::gateway::RequestOptions;
use serde_json::{json, Value};
use ventasimple_types::{
    BusinessProfile, CleanupReport, ExportJob, ExportRequest, RemoteId, RetentionSettings,
    TableInfo, TableSummary,
};

impl ApiClient {
    /// `GET /business/profile`.
    pub async fn business_profile(&self, token: &str) -> ApiResult<BusinessProfile> {
        self.fetch("/business/profile", RequestOptions::get().bearer(token))
            .await
    }

    /// Saves the business profile and returns the stored copy.
    pub async fn update_business_profile(
        &self,
        token: &str,
        profile: &BusinessProfile,
    ) -> ApiResult<BusinessProfile> {
        let body = serde_json::to_value(profile)?;
        self.fetch(
            "/business/profile",
            RequestOptions::post().bearer(token).json(body),
        )
        .await
    }

    /// `GET /retention/settings`.
    pub async fn retention_settings(&self, token: &str) -> ApiResult<RetentionSettings> {
        self.fetch("/retention/settings", RequestOptions::get().bearer(token))
            .await
    }

    /// Saves retention settings with `days` clamped first.
    pub async fn update_retention_settings(
        &self,
        token: &str,
        settings: &RetentionSettings,
    ) -> ApiResult<RetentionSettings> {
        let body = serde_json::to_value(settings.normalized())?;
        self.fetch(
            "/retention/settings",
            RequestOptions::post().bearer(token).json(body),
        )
        .await
    }

    /// `POST /retention/run`. With `preview` nothing is deleted and the
    /// report carries the row counts that would be.
    pub async fn run_cleanup(&self, token: &str, preview: bool) -> ApiResult<CleanupReport> {
        let body = json!({ "preview": preview });
        self.fetch("/retention/run", RequestOptions::post().bearer(token).json(body))
            .await
    }

    /// Names of the tables open to maintenance.
    pub async fn list_tables(&self, token: &str) -> ApiResult<Vec<TableSummary>> {
        self.fetch_list("/data/tables", RequestOptions::get().bearer(token))
            .await
    }

    /// Row count, size and maintenance timestamps of `table`.
    pub async fn table_info(&self, token: &str, table: &str) -> ApiResult<TableInfo> {
        let path = format!("/data/tables/{}", segment(table));
        self.fetch(&path, RequestOptions::get().bearer(token)).await
    }

    /// Runs `VACUUM` on `table`.
    pub async fn vacuum_table(&self, token: &str, table: &str) -> ApiResult<Value> {
        let path = format!("/data/tables/{}/vacuum", segment(table));
        Ok(self
            .call(&path, RequestOptions::post().bearer(token))
            .await?
            .into_json())
    }

    /// Deletes every row of `table`.
    pub async fn truncate_table(&self, token: &str, table: &str) -> ApiResult<Value> {
        let path = format!("/data/tables/{}/truncate", segment(table));
        Ok(self
            .call(&path, RequestOptions::post().bearer(token))
            .await?
            .into_json())
    }

    /// Queues an export job.
    pub async fn create_export(&self, token: &str, request: &ExportRequest) -> ApiResult<ExportJob> {
        let body = serde_json::to_value(request)?;
        self.fetch("/data/export", RequestOptions::post().bearer(token).json(body))
            .await
    }

    /// Every export job, in the order the backend sends them.
    pub async fn list_exports(&self, token: &str) -> ApiResult<Vec<ExportJob>> {
        self.fetch_list("/data/export", RequestOptions::get().bearer(token))
            .await
    }

    /// Current state of one export job.
    pub async fn export_status(&self, token: &str, id: &RemoteId) -> ApiResult<ExportJob> {
        let path = format!("/data/export/{}", segment(id.as_str()));
        self.fetch(&path, RequestOptions::get().bearer(token)).await
    }
}
