use pretty_assertions::assert_eq;
use serde_json::json;
use ventasimple_types::{
    ActionAck, CameraEvent, CameraList, CheckoutResponse, CleanupReport, ExportFormat, ExportJob,
    ExportRequest, ExportStatus, RemoteId, RetentionSettings, TableInfo,
};

// ── Export jobs ──────────────────────────────────────────────────

#[test]
fn export_job_accepts_numeric_id() {
    let job: ExportJob = serde_json::from_value(json!({
        "id": 42,
        "format": "csv",
        "status": "READY",
        "createdAt": "2026-10-01T10:00:00Z",
        "downloadUrl": "https://files.example.com/42.csv"
    }))
    .unwrap();

    assert_eq!(job.id, Some(RemoteId::new("42")));
    assert_eq!(job.format, Some(ExportFormat::Csv));
    assert_eq!(job.status, ExportStatus::Ready);
    assert_eq!(job.download_link(), Some("https://files.example.com/42.csv"));
}

#[test]
fn export_download_link_hidden_until_ready() {
    let job: ExportJob = serde_json::from_value(json!({
        "id": "job-1",
        "status": "processing",
        "downloadUrl": "https://files.example.com/partial"
    }))
    .unwrap();
    assert_eq!(job.download_link(), None);
}

#[test]
fn export_status_terminal_states() {
    assert!(ExportStatus::Ready.is_terminal());
    assert!(ExportStatus::Error.is_terminal());
    assert!(!ExportStatus::Processing.is_terminal());
    assert!(!ExportStatus::parse("queued").is_terminal());
}

#[test]
fn export_request_body() {
    let body = serde_json::to_value(ExportRequest::older_than_retention(ExportFormat::Pdf)).unwrap();
    assert_eq!(body, json!({ "format": "pdf", "range": "olderThanRetention" }));
}

// ── Acks ─────────────────────────────────────────────────────────

#[test]
fn ack_requires_literal_true() {
    let ack: ActionAck = serde_json::from_value(json!({ "ok": "yes" })).unwrap();
    assert!(!ack.ok);
    let ack: ActionAck = serde_json::from_value(json!({ "ok": true })).unwrap();
    assert!(ack.ok);
}

#[test]
fn checkout_response_uses_snake_case_init_point() {
    let resp: CheckoutResponse =
        serde_json::from_value(json!({ "init_point": "https://pay.example.com/c/1" })).unwrap();
    assert_eq!(resp.init_point.as_deref(), Some("https://pay.example.com/c/1"));
}

// ── Retention ────────────────────────────────────────────────────

#[test]
fn retention_days_are_clamped() {
    let cases = [(None, 30), (Some(0), 30), (Some(1), 1), (Some(45), 45), (Some(365), 60)];
    for (days, expected) in cases {
        let settings = RetentionSettings {
            days,
            ..Default::default()
        };
        assert_eq!(settings.normalized().days, Some(expected), "days {days:?}");
    }
}

#[test]
fn retention_serializes_camel_case() {
    let value = serde_json::to_value(RetentionSettings::default()).unwrap();
    assert_eq!(
        value,
        json!({ "days": 60, "autoExportPdf": true, "frequency": "weekly" })
    );
}

#[test]
fn cleanup_preview_counts() {
    let report: CleanupReport = serde_json::from_value(json!({
        "DetalleVenta": { "count": 120 },
        "Venta": { "count": "40" }
    }))
    .unwrap();
    assert_eq!(report.sale_lines_count(), 120);
    assert_eq!(report.sales_count(), 40);
    assert!(report.preview_summary().contains("120 sale lines"));
}

#[test]
fn table_size_label_falls_back_to_bytes() {
    let info: TableInfo = serde_json::from_value(json!({ "rows": 10, "sizeBytes": 2048 })).unwrap();
    assert_eq!(info.size_label(), "2.0 KB");
    let info: TableInfo = serde_json::from_value(json!({ "sizeHuman": "16 kB" })).unwrap();
    assert_eq!(info.size_label(), "16 kB");
}

// ── Cameras ──────────────────────────────────────────────────────

#[test]
fn camera_list_decodes() {
    let list: CameraList = serde_json::from_value(json!({
        "enabled": true,
        "items": [
            { "id": 1, "name": "Caja", "rtspUrl": "rtsp://10.0.0.2/stream", "status": "active" },
            { "id": 2, "name": "Depósito", "rtspUrl": "rtsp://10.0.0.3/stream", "status": "inactive" }
        ]
    }))
    .unwrap();

    assert!(list.enabled);
    assert!(!list.requested);
    assert!(list.items[0].is_active());
    assert!(!list.items[1].is_active());
    assert_eq!(list.name_of(&RemoteId::new("2")), Some("Depósito"));
}

#[test]
fn camera_event_timestamp_falls_back_to_created_at() {
    let event: CameraEvent = serde_json::from_value(json!({
        "type": "person",
        "confidence": 0.873,
        "createdAt": "2026-10-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(event.kind.as_deref(), Some("person"));
    assert_eq!(event.timestamp(), event.created_at);
    assert_eq!(event.confidence_label().as_deref(), Some("87%"));
}
