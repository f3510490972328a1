use pretty_assertions::assert_eq;
use serde_json::json;
use ventasimple_client::{ApiClient, ClientConfig};
use ventasimple_types::{
    Bucket, CameraInput, DateRange, EventFilter, ExportFormat, ExportRequest, ExportStatus,
    LicensePlan, LicenseStatus, RemoteId, RetentionSettings,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-abc";

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri())).unwrap()
}

fn range() -> DateRange {
    DateRange::parse("2026-09-01", "2026-09-30").unwrap()
}

// ── Account ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_posts_credentials_without_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t1" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server).login("a@b.com", "pw").await.unwrap();
    assert_eq!(resp.token.as_deref(), Some("t1"));
}

#[tokio::test]
async fn license_decodes_with_normalized_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/license"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "canceled",
            "plan": "single",
            "devices": []
        })))
        .mount(&server)
        .await;

    let license = client_for(&server).license(TOKEN).await.unwrap();
    assert_eq!(license.status, LicenseStatus::Cancelled);
    assert_eq!(license.plan, Some(LicensePlan::Single));
}

#[tokio::test]
async fn change_payment_method_sends_email_and_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/change-method"))
        .and(body_json(json!({ "mpEmail": "pay@b.com", "plan": "multi" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "init_point": "https://pay/x" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .change_payment_method(TOKEN, Some("pay@b.com"), Some(LicensePlan::Multi))
        .await
        .unwrap();
    assert_eq!(resp.init_point.as_deref(), Some("https://pay/x"));
}

#[tokio::test]
async fn attach_device_sends_device_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/license/devices/attach"))
        .and(body_json(json!({ "deviceId": "dev-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": ["dev-1"] })))
        .expect(1)
        .mount(&server)
        .await;

    let license = client_for(&server).attach_device(TOKEN, "dev-1").await.unwrap();
    assert_eq!(license.devices, vec!["dev-1".to_string()]);
}

// ── Data administration ──────────────────────────────────────────

#[tokio::test]
async fn retention_update_sends_clamped_days() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retention/settings"))
        .and(body_json(json!({ "days": 60, "autoExportPdf": false, "frequency": "daily" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "days": 60 })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = RetentionSettings {
        days: Some(400),
        auto_export_pdf: Some(false),
        frequency: Some("daily".into()),
    };
    let saved = client_for(&server)
        .update_retention_settings(TOKEN, &settings)
        .await
        .unwrap();
    assert_eq!(saved.days, Some(60));
}

#[tokio::test]
async fn table_names_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/tables/Detalle%20Venta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client_for(&server)
        .table_info(TOKEN, "Detalle Venta")
        .await
        .unwrap();
    assert_eq!(info.rows, Some(12));
}

#[tokio::test]
async fn export_lifecycle_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data/export"))
        .and(body_json(json!({ "format": "csv", "range": "olderThanRetention" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "status": "processing" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/export/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "status": "ready" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "status": "ready" },
            "garbage",
            { "id": 6, "status": "error" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let job = client
        .create_export(TOKEN, &ExportRequest::older_than_retention(ExportFormat::Csv))
        .await
        .unwrap();
    assert_eq!(job.id, Some(RemoteId::new("7")));

    let status = client.export_status(TOKEN, &RemoteId::new("7")).await.unwrap();
    assert_eq!(status.status, ExportStatus::Ready);

    let list = client.list_exports(TOKEN).await.unwrap();
    assert_eq!(list.len(), 2);
}

#[tokio::test]
async fn list_endpoint_with_object_body_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tables": [] })))
        .mount(&server)
        .await;

    assert!(client_for(&server).list_tables(TOKEN).await.unwrap().is_empty());
}

// ── Stats ────────────────────────────────────────────────────────

#[tokio::test]
async fn top_products_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/top-products"))
        .and(query_param("from", "2026-09-01"))
        .and(query_param("to", "2026-09-30"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Yerba 1kg", "qty": "42" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let top = client_for(&server).top_products(TOKEN, &range(), 5).await.unwrap();
    assert_eq!(top[0].name, "Yerba 1kg");
    assert_eq!(top[0].qty, Some(42.0));
}

#[tokio::test]
async fn sales_series_sends_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/sales-series"))
        .and(query_param("bucket", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "ts": "2026-09-01", "amount": 10, "tickets": 1 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server)
        .sales_series(TOKEN, &range(), Bucket::Week)
        .await
        .unwrap();
    assert_eq!(series.totals(), (10.0, 1));
}

// ── Cameras ──────────────────────────────────────────────────────

#[tokio::test]
async fn camera_update_uses_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/ai/cameras/3"))
        .and(body_json(json!({ "name": "Caja", "rtspUrl": "rtsp://cam/3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "name": "Caja" })))
        .expect(1)
        .mount(&server)
        .await;

    let input = CameraInput {
        name: "Caja".into(),
        rtsp_url: "rtsp://cam/3".into(),
    };
    let camera = client_for(&server)
        .update_camera(TOKEN, &RemoteId::new("3"), &input)
        .await
        .unwrap();
    assert_eq!(camera.name, "Caja");
}

#[tokio::test]
async fn camera_events_filter_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ai/events"))
        .and(query_param("cameraId", "3"))
        .and(query_param("type", "person"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "cameraId": 3, "type": "person", "confidence": 0.9 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = EventFilter {
        camera_id: Some("3".into()),
        kind: Some("person".into()),
        limit: 50,
    };
    let events = client_for(&server)
        .list_camera_events(TOKEN, &filter)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].camera_id, Some(RemoteId::new("3")));
}
