use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use ventasimple_client::{ApiClient, ClientConfig};
use ventasimple_export::{ExportPoller, PollerConfig, PollerState, DEFAULT_POLL_INTERVAL};
use ventasimple_session::{MemoryStorage, SessionStore};
use ventasimple_types::{ExportFormat, NoticeKind, NoticeLog, RemoteId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TICK: Duration = Duration::from_millis(20);
const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    server: MockServer,
    session: Arc<SessionStore>,
    poller: ExportPoller,
    notices: Arc<NoticeLog>,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
    let session = Arc::new(SessionStore::open(Arc::new(MemoryStorage::new())));
    session.set_token("tok-1");
    let notices = Arc::new(NoticeLog::new());
    let poller = ExportPoller::new(
        client,
        Arc::clone(&session),
        notices.clone(),
        PollerConfig::with_interval(TICK),
    );
    Harness {
        server,
        session,
        poller,
        notices,
    }
}

async fn wait_idle(poller: &ExportPoller) {
    let mut rx = poller.subscribe();
    timeout(WAIT, rx.wait_for(|s| *s == PollerState::Idle))
        .await
        .expect("poller did not go idle")
        .unwrap();
}

async fn mount_status(server: &MockServer, id: &str, status: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/data/export/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id, "status": status })))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_list(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/data/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "job-1", "format": "pdf", "status": "ready", "downloadUrl": "https://f/1.pdf" }
        ])))
        .expect(times)
        .mount(server)
        .await;
}

#[test]
fn default_interval() {
    assert_eq!(PollerConfig::default().interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_millis(2500));
}

// ── Polling ──────────────────────────────────────────────────────

#[tokio::test]
async fn processing_twice_then_ready() {
    let h = harness().await;
    mount_status(&h.server, "job-1", "processing", 2).await;
    mount_status(&h.server, "job-1", "ready", 1).await;
    mount_list(&h.server, 1).await;

    h.poller.start(RemoteId::new("job-1"));
    assert!(h.poller.state().is_polling());
    wait_idle(&h.poller).await;

    // Any further tick would hit the exhausted mocks and fail verification.
    tokio::time::sleep(TICK * 3).await;

    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(h.poller.exports().len(), 1);
    assert!(!h.poller.has_processing());
}

#[tokio::test]
async fn error_status_emits_error_notice() {
    let h = harness().await;
    mount_status(&h.server, "job-2", "ERROR", 1).await;
    mount_list(&h.server, 1).await;

    h.poller.start(RemoteId::new("job-2"));
    wait_idle(&h.poller).await;

    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
}

#[tokio::test]
async fn transient_failures_are_retried_silently() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/data/export/job-3"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&h.server)
        .await;
    mount_status(&h.server, "job-3", "ready", 1).await;
    mount_list(&h.server, 1).await;

    h.poller.start(RemoteId::new("job-3"));
    wait_idle(&h.poller).await;

    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert!(!notices[0].is_error());
}

#[tokio::test]
async fn unknown_status_keeps_waiting() {
    let h = harness().await;
    mount_status(&h.server, "job-4", "queued", 1).await;
    mount_status(&h.server, "job-4", "ready", 1).await;
    mount_list(&h.server, 1).await;

    h.poller.start(RemoteId::new("job-4"));
    wait_idle(&h.poller).await;
    assert_eq!(h.notices.len(), 1);
}

#[tokio::test]
async fn signing_out_stops_polling_without_notice() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/data/export/job-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&h.server)
        .await;

    h.poller.start(RemoteId::new("job-5"));
    h.session.clear_token();
    wait_idle(&h.poller).await;
    assert!(h.notices.is_empty());
}

#[tokio::test]
async fn stop_goes_idle_immediately() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/data/export/job-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&h.server)
        .await;

    h.poller.start(RemoteId::new("job-6"));
    h.poller.stop();
    assert_eq!(h.poller.state(), PollerState::Idle);

    tokio::time::sleep(TICK * 3).await;
    assert!(h.notices.is_empty());
}

#[tokio::test]
async fn restarting_replaces_previous_job() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/data/export/old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ready" })))
        .expect(0)
        .mount(&h.server)
        .await;
    mount_status(&h.server, "new", "ready", 1).await;
    mount_list(&h.server, 1).await;

    h.poller.start(RemoteId::new("old"));
    h.poller.start(RemoteId::new("new"));
    assert_eq!(
        h.poller.state(),
        PollerState::Polling {
            job_id: RemoteId::new("new")
        }
    );
    wait_idle(&h.poller).await;
    assert_eq!(h.notices.len(), 1);
}

// ── Requesting ───────────────────────────────────────────────────

#[tokio::test]
async fn request_export_queues_and_polls() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/data/export"))
        .and(body_json(json!({ "format": "pdf", "range": "olderThanRetention" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "job-1", "status": "processing" })))
        .expect(1)
        .mount(&h.server)
        .await;
    mount_status(&h.server, "job-1", "ready", 1).await;
    mount_list(&h.server, 2).await;

    let job = h.poller.request_export(ExportFormat::Pdf).await.unwrap();
    assert_eq!(job.id, Some(RemoteId::new("job-1")));
    wait_idle(&h.poller).await;

    let messages: Vec<String> = h.notices.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["PDF export queued.", "Export ready."]);
}

#[tokio::test]
async fn request_export_without_id_does_not_poll() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/data/export"))
        .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
        .mount(&h.server)
        .await;
    mount_list(&h.server, 1).await;

    h.poller.request_export(ExportFormat::Csv).await.unwrap();
    assert_eq!(h.poller.state(), PollerState::Idle);
}

#[tokio::test]
async fn failed_export_request_reports_server_message() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/data/export"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "Ya hay una exportación en curso" })))
        .mount(&h.server)
        .await;

    assert!(h.poller.request_export(ExportFormat::Pdf).await.is_none());
    let notices = h.notices.drain();
    assert_eq!(notices[0].message, "Ya hay una exportación en curso");
    assert!(!h.poller.state().is_polling());
}
