//! Mock HTTP server setup for integration tests

use anythingllm_client::AnythingLlmClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::time::Duration;

pub const API_KEY: &str = "test-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client with `retries` retries and a millisecond backoff so tests stay fast.
    pub fn client_with_retries(&self, retries: u32) -> AnythingLlmClient {
        AnythingLlmClient::builder()
            .base_url(&self.base_url)
            .api_key(API_KEY)
            .max_retries(retries)
            .timeout(Duration::from_secs(5))
            .retry_backoff(Duration::from_millis(1), Duration::from_millis(5))
            .build()
            .expect("client builds")
    }

    pub fn client(&self) -> AnythingLlmClient {
        self.client_with_retries(3)
    }

    /// JSON response on `path` (relative to `/api/v1`), hit exactly `hits` times.
    pub async fn mock_json(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: Value,
        hits: usize,
    ) -> Mock {
        self.server
            .mock(method, format!("/api/v1{}", path).as_str())
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_header("x-request-id", Matcher::Regex("^[0-9a-f-]{36}$".to_string()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create_async()
            .await
    }

    /// Line-delimited event stream on `path`, any query string.
    pub async fn mock_event_stream(&mut self, path: &str, lines: &[&str]) -> Mock {
        let body: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        self.server
            .mock("GET", format!("/api/v1{}", path).as_str())
            .match_query(Matcher::Any)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }
}

pub fn workspace_json(name: &str, slug: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "slug": slug,
        "createdAt": "2025-03-01T12:00:00.000Z",
        "documentCount": 0
    })
}

pub fn document_json(title: &str) -> Value {
    json!({
        "id": "3f1c2b7a-9d4e-4c1b-8a2f-6e5d4c3b2a10",
        "title": title,
        "location": format!("custom-documents/{}.json", title),
        "type": "file",
        "createdAt": "2025-03-01T12:00:00.000Z",
        "tags": ["notes"]
    })
}
