use std::time::Duration;

/// Versioned prefix appended to the base address.
pub const API_PREFIX: &str = "/api/v1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for one client. Immutable once the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Platform address without the API prefix, e.g. `http://localhost:3001`.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Log every validated response payload at `info`.
    pub debug: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            debug: false,
        }
    }

    /// Base address with the trailing slash stripped and the versioned prefix appended.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), API_PREFIX)
    }
}
