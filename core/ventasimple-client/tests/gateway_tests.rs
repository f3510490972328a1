use pretty_assertions::assert_eq;
use serde_json::json;
use ventasimple_client::{ApiError, ClientConfig, Gateway, Method, Payload, RequestOptions};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway_for(server: &MockServer) -> Gateway {
    Gateway::new(&ClientConfig::new(format!("{}/", server.uri()))).unwrap()
}

// ── Success bodies ───────────────────────────────────────────────

#[tokio::test]
async fn json_body_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/license"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "active" })))
        .mount(&server)
        .await;

    let payload = gateway_for(&server)
        .await
        .request("license", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!({ "status": "active" })));
}

#[tokio::test]
async fn non_json_content_type_returns_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"looks\":\"json\"}"))
        .mount(&server)
        .await;

    let payload = gateway_for(&server)
        .await
        .request("/health", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(payload, Payload::Text("{\"looks\":\"json\"}".to_string()));
}

#[tokio::test]
async fn malformed_json_becomes_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/license"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{not json", "application/json; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let payload = gateway_for(&server)
        .await
        .request("/license", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(payload, Payload::Json(json!({})));
}

// ── Request shaping ──────────────────────────────────────────────

#[tokio::test]
async fn bearer_and_default_content_type_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscription/pause"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server)
        .await
        .request("/subscription/pause", RequestOptions::post().bearer("tok-1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn text_body_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/raw"))
        .and(body_string("already-encoded"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let payload = gateway_for(&server)
        .await
        .request("/raw", RequestOptions::new(Method::PATCH).text("already-encoded"))
        .await
        .unwrap();

    assert_eq!(payload, Payload::Text(String::new()));
}

// ── Errors ───────────────────────────────────────────────────────

#[tokio::test]
async fn non_2xx_carries_status_and_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Credenciales inválidas" })),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .await
        .request("/login", RequestOptions::post().json(json!({})))
        .await
        .unwrap_err();

    let ApiError::Request(req) = &err else {
        panic!("expected request error, got {err:?}");
    };
    assert_eq!(req.status, 401);
    assert_eq!(req.message, "Credenciales inválidas");
    assert_eq!(req.body, Payload::Json(json!({ "error": "Credenciales inválidas" })));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn non_2xx_without_error_field_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/tables"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .await
        .request("/data/tables", RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.user_message(), "Service Unavailable");
}

#[tokio::test]
async fn unknown_status_without_reason_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odd"))
        .respond_with(ResponseTemplate::new(599))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .await
        .request("/odd", RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(599));
    assert_eq!(err.user_message(), "Request error");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let gateway = Gateway::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = gateway
        .request("/license", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}
