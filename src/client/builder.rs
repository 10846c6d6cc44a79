use crate::client::config::{ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use crate::client::core::AnythingLlmClient;
use crate::client::policy::RetryPolicy;
use crate::transport::HttpTransport;
use crate::ws::{ReconnectPolicy, TungsteniteConnector, WsConnector};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_URL: &str = "ANYTHINGLLM_URL";
pub const ENV_API_KEY: &str = "ANYTHINGLLM_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "ANYTHINGLLM_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "ANYTHINGLLM_RETRIES";
pub const ENV_DEBUG: &str = "ANYTHINGLLM_DEBUG";

/// Builder for [`AnythingLlmClient`].
///
/// Fields left unset fall back to the `ANYTHINGLLM_*` environment variables, then to the
/// defaults (30 s timeout, 3 retries).
pub struct AnythingLlmClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    debug: Option<bool>,
    retry_backoff: Option<(Duration, Duration)>,
    reconnect: ReconnectPolicy,
    connector: Option<Arc<dyn WsConnector>>,
}

impl AnythingLlmClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            max_retries: None,
            debug: None,
            retry_backoff: None,
            reconnect: ReconnectPolicy::default(),
            connector: None,
        }
    }

    /// Platform address, e.g. `http://localhost:3001`. The `/api/v1` prefix is added.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retries after the first attempt for retry-eligible calls.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = Some(enable);
        self
    }

    /// Override the HTTP backoff (default 1 s base, 10 s cap).
    pub fn retry_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.retry_backoff = Some((base, cap));
        self
    }

    /// Override the WebSocket reconnect schedule (default 1 s base, 5 attempts).
    pub fn reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Replace the socket implementation, e.g. with an in-memory one.
    pub fn websocket_connector(mut self, connector: Arc<dyn WsConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Resolve the final configuration, consulting `lookup` for unset fields.
    fn resolve<F>(&self, lookup: F) -> ClientConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| lookup(ENV_URL))
            .unwrap_or_default();
        let api_key = self
            .api_key
            .clone()
            .or_else(|| lookup(ENV_API_KEY))
            .unwrap_or_default();
        let timeout = self
            .timeout
            .or_else(|| {
                lookup(ENV_TIMEOUT_MS)?
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .map(Duration::from_millis)
            })
            .unwrap_or(DEFAULT_TIMEOUT);
        let max_retries = self
            .max_retries
            .or_else(|| lookup(ENV_RETRIES)?.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);
        let debug = self
            .debug
            .or_else(|| {
                let v = lookup(ENV_DEBUG)?;
                Some(matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            })
            .unwrap_or(false);

        ClientConfig {
            base_url,
            api_key,
            timeout,
            max_retries,
            debug,
        }
    }

    /// Build the client. Fails with `ValidationFailure` on an unusable configuration.
    pub fn build(self) -> Result<AnythingLlmClient> {
        let config = self.resolve(|k| std::env::var(k).ok());
        crate::client::validation::validate_config(&config)?;

        let mut retry = RetryPolicy::new(config.max_retries);
        if let Some((base, cap)) = self.retry_backoff {
            retry = retry.with_backoff(base, cap);
        }

        let transport = HttpTransport::new(&config)?;
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(TungsteniteConnector::default()));

        Ok(AnythingLlmClient::from_parts(
            config,
            transport,
            retry,
            self.reconnect,
            connector,
        ))
    }
}

impl Default for AnythingLlmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
