use crate::client::builder::AnythingLlmClientBuilder;
use crate::client::config::ClientConfig;
use crate::client::endpoint::{segment, Operation};
use crate::client::policy::RetryPolicy;
use crate::contract::schemas;
use crate::endpoints::{Agents, Chat, Documents, Workspaces};
use crate::transport::HttpTransport;
use crate::types::AuthStatus;
use crate::ws::{ReconnectPolicy, WebSocketManager, WsConnector};
use crate::Result;
use std::sync::Arc;

/// Client for one AnythingLLM instance.
///
/// Cheap to clone; clones share the connection pool. Calls are independent of each other
/// and may run concurrently.
#[derive(Clone)]
pub struct AnythingLlmClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: HttpTransport,
    pub(crate) retry: RetryPolicy,
    pub(crate) reconnect: ReconnectPolicy,
    pub(crate) connector: Arc<dyn WsConnector>,
}

impl std::fmt::Debug for AnythingLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnythingLlmClient")
            .field("api_root", &self.transport.api_root())
            .field("timeout", &self.config.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl AnythingLlmClient {
    /// Client for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        AnythingLlmClientBuilder::new()
            .base_url(base_url)
            .api_key(api_key)
            .build()
    }

    /// Client configured entirely from `config`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        AnythingLlmClientBuilder::new()
            .base_url(config.base_url)
            .api_key(config.api_key)
            .timeout(config.timeout)
            .max_retries(config.max_retries)
            .debug(config.debug)
            .build()
    }

    pub fn builder() -> AnythingLlmClientBuilder {
        AnythingLlmClientBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        transport: HttpTransport,
        retry: RetryPolicy,
        reconnect: ReconnectPolicy,
        connector: Arc<dyn WsConnector>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            retry,
            reconnect,
            connector,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn workspaces(&self) -> Workspaces<'_> {
        Workspaces::new(self)
    }

    pub fn documents(&self) -> Documents<'_> {
        Documents::new(self)
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    pub fn agents(&self) -> Agents<'_> {
        Agents::new(self)
    }

    /// Check the credential against `GET /auth`.
    pub async fn verify_auth(&self) -> Result<AuthStatus> {
        self.execute(Operation::get("/auth"), &schemas::auth_status())
            .await
    }

    /// Event socket URL for `slug`: `ws(s)://host/ws/{slug}?token=<key>`.
    pub fn websocket_url(&self, slug: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https") {
            format!("wss{}", rest)
        } else if let Some(rest) = base.strip_prefix("http") {
            format!("ws{}", rest)
        } else {
            base.to_string()
        };
        let token: String = url::form_urlencoded::byte_serialize(self.config.api_key.as_bytes()).collect();
        format!("{}/ws/{}?token={}", ws_base, segment(slug), token)
    }

    /// Create an unstarted manager for `slug`. Attach subscribers, then call
    /// [`WebSocketManager::start`].
    pub fn websocket(&self, slug: &str) -> WebSocketManager {
        WebSocketManager::new(
            self.websocket_url(slug),
            self.connector.clone(),
            self.reconnect,
        )
    }

    /// Create and start a manager for `slug`. Must be called within a tokio runtime.
    pub fn connect_websocket(&self, slug: &str) -> WebSocketManager {
        let manager = self.websocket(slug);
        manager.start();
        manager
    }
}
