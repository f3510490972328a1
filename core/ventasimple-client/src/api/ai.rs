//! Camera monitoring (beta) endpoints.

use super::{segment, with_query, ApiClient};
use crate::error::ApiResult;
use crate::gateway::RequestOptions;
use serde_json::Value;
use ventasimple_types::{
    Camera, CameraEvent, CameraInput, CameraList, CameraTestResult, EventFilter, RemoteId,
};

impl ApiClient {
    /// Asks for camera monitoring to be enabled on the account.
    pub async fn request_ai_activation(&self, token: &str) -> ApiResult<Value> {
        Ok(self
            .call("/ai/request-activation", RequestOptions::post().bearer(token))
            .await?
            .into_json())
    }

    /// Cameras plus the account's activation state.
    pub async fn list_cameras(&self, token: &str) -> ApiResult<CameraList> {
        self.fetch("/ai/cameras", RequestOptions::get().bearer(token))
            .await
    }

    /// Registers a camera.
    pub async fn create_camera(&self, token: &str, input: &CameraInput) -> ApiResult<Camera> {
        let body = serde_json::to_value(input)?;
        self.fetch("/ai/cameras", RequestOptions::post().bearer(token).json(body))
            .await
    }

    /// Renames a camera or changes its stream URL.
    pub async fn update_camera(
        &self,
        token: &str,
        id: &RemoteId,
        input: &CameraInput,
    ) -> ApiResult<Camera> {
        let body = serde_json::to_value(input)?;
        let path = format!("/ai/cameras/{}", segment(id.as_str()));
        self.fetch(&path, RequestOptions::patch().bearer(token).json(body))
            .await
    }

    /// Enables or disables a camera.
    pub async fn toggle_camera(&self, token: &str, id: &RemoteId) -> ApiResult<Camera> {
        let path = format!("/ai/cameras/{}/toggle", segment(id.as_str()));
        self.fetch(&path, RequestOptions::post().bearer(token)).await
    }

    /// Asks the backend to probe the camera's RTSP stream.
    pub async fn test_camera(&self, token: &str, id: &RemoteId) -> ApiResult<CameraTestResult> {
        let path = format!("/ai/cameras/{}/test", segment(id.as_str()));
        self.fetch(&path, RequestOptions::post().bearer(token)).await
    }

    /// Removes a camera.
    pub async fn delete_camera(&self, token: &str, id: &RemoteId) -> ApiResult<Value> {
        let path = format!("/ai/cameras/{}", segment(id.as_str()));
        Ok(self
            .call(&path, RequestOptions::delete().bearer(token))
            .await?
            .into_json())
    }

    /// Recent detections, filtered by camera and type.
    pub async fn list_camera_events(
        &self,
        token: &str,
        filter: &EventFilter,
    ) -> ApiResult<Vec<CameraEvent>> {
        let path = with_query("/ai/events", &filter.query_pairs());
        self.fetch_list(&path, RequestOptions::get().bearer(token))
            .await
    }
}
