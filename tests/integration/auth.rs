use crate::mock_server::MockServerFixture;
use anythingllm_client::{AnythingLlmClient, ErrorKind};
use serde_json::json;

#[tokio::test]
async fn valid_key_is_authenticated() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("GET", "/auth", 200, json!({ "authenticated": true }), 1)
        .await;

    let status = fixture.client().verify_auth().await.unwrap();
    assert!(status.authenticated);
    m.assert_async().await;
}

#[tokio::test]
async fn invalid_key_is_auth_failure_without_retry() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("GET", "/api/v1/auth")
        .match_header("authorization", "Bearer wrong-key")
        .with_status(403)
        .with_body(json!({ "error": "Invalid API Key" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = AnythingLlmClient::builder()
        .base_url(&fixture.base_url)
        .api_key("wrong-key")
        .build()
        .unwrap();
    let err = client.verify_auth().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::AuthFailure);
    assert_eq!(err.code(), "AuthFailure");
    assert!(!err.recoverable);
    assert_eq!(err.message, "Invalid API Key");
    assert!(!err.suggestion.is_empty());
    m.assert_async().await;
}
