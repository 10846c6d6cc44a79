use crate::mock_server::MockServerFixture;
use anythingllm_client::{AnythingLlmClient, CreateWorkspace, ErrorKind};
use anythingllm_client::client::Operation;
use anythingllm_client::contract::ResponseContract;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn client_errors_are_attempted_once() {
    for status in [400usize, 401, 403, 404] {
        let mut fixture = MockServerFixture::new().await;
        let m = fixture
            .mock_json("GET", "/workspaces", status, json!({ "error": "nope" }), 1)
            .await;

        let err = fixture.client_with_retries(3).workspaces().list().await.unwrap_err();
        assert_eq!(err.status, Some(status as u16));
        assert!(!err.recoverable, "status {}", status);
        m.assert_async().await;
    }
}

#[tokio::test]
async fn transient_statuses_retry_up_to_ceiling() {
    for (status, kind) in [
        (429usize, ErrorKind::RateLimited),
        (502, ErrorKind::ServiceUnavailable),
        (504, ErrorKind::ServiceUnavailable),
        (500, ErrorKind::UnknownServerError),
    ] {
        let mut fixture = MockServerFixture::new().await;
        let m = fixture
            .mock_json("GET", "/workspaces", status, json!({ "error": "busy" }), 4)
            .await;

        let err = fixture.client_with_retries(3).workspaces().list().await.unwrap_err();
        assert_eq!(err.kind, kind);
        assert!(err.recoverable);
        m.assert_async().await;
    }
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("GET", "/api/v1/workspaces")
        .with_status(429)
        .with_header("retry-after", "17")
        .with_body(json!({ "error": "Too many requests" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let err = fixture.client_with_retries(0).workspaces().list().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert_eq!(err.retry_after_secs, Some(17));
    assert_eq!(err.to_json()["retryAfter"], 17);
    m.assert_async().await;
}

#[tokio::test]
async fn mutating_calls_are_not_retried() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("POST", "/workspaces/new", 502, json!({ "error": "Bad Gateway" }), 1)
        .await;

    let err = fixture
        .client_with_retries(3)
        .workspaces()
        .create(&CreateWorkspace::new("Dev"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    m.assert_async().await;
}

#[tokio::test]
async fn search_is_retried_as_idempotent() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("POST", "/workspace/dev/chat", 504, json!({ "error": "Gateway Timeout" }), 3)
        .await;

    let err = fixture
        .client_with_retries(2)
        .documents()
        .search("dev", "what is rust", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    m.assert_async().await;
}

#[tokio::test]
async fn zero_retries_executes_once() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("GET", "/workspaces", 502, json!({}), 1)
        .await;

    assert!(fixture.client_with_retries(0).workspaces().list().await.is_err());
    m.assert_async().await;
}

#[tokio::test]
async fn unreachable_host_is_network_failure() {
    let client = AnythingLlmClient::builder()
        .base_url("http://127.0.0.1:9")
        .api_key("k")
        .max_retries(1)
        .timeout(Duration::from_secs(2))
        .retry_backoff(Duration::from_millis(1), Duration::from_millis(2))
        .build()
        .unwrap();

    let err = client.workspaces().list().await.unwrap_err();
    assert!(
        matches!(err.kind, ErrorKind::NetworkFailure | ErrorKind::Timeout),
        "got {:?}",
        err.kind
    );
    assert!(err.recoverable);
}

#[tokio::test]
async fn silent_server_times_out_and_is_retried() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });

    let client = AnythingLlmClient::builder()
        .base_url(format!("http://{}", addr))
        .api_key("k")
        .max_retries(2)
        .timeout(Duration::from_millis(200))
        .retry_backoff(Duration::from_millis(1), Duration::from_millis(2))
        .build()
        .unwrap();

    let err = client.workspaces().list().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert!(err.recoverable);
    assert_eq!(err.retry_after_secs, Some(30));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
    server.abort();
}

#[tokio::test]
async fn unserializable_body_is_never_sent() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("POST", "/workspaces/new", 200, json!({}), 0)
        .await;

    let mut body = BTreeMap::new();
    body.insert((1u8, 2u8), "tuple keys are not JSON");
    let err = fixture
        .client()
        .execute(
            Operation::post("/workspaces/new").json(&body),
            &ResponseContract::any(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ClientUnexpected);
    assert!(!err.recoverable);
    m.assert_async().await;
}
