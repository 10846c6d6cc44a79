//! Client configuration validation.

use crate::client::config::ClientConfig;
use crate::contract::ContractViolation;
use crate::error::DomainError;
use crate::Result;
use url::Url;

fn check_base_url(raw: &str, violations: &mut Vec<ContractViolation>) {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if url.host_str().map_or(true, str::is_empty) {
                violations.push(ContractViolation::new("/baseUrl", "URL has no host"));
            }
        }
        Ok(url) => violations.push(ContractViolation::new(
            "/baseUrl",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        )),
        Err(e) => violations.push(ContractViolation::new(
            "/baseUrl",
            format!("invalid URL '{}': {}", raw, e),
        )),
    }
}

/// Reject configurations that cannot produce a working client.
pub(crate) fn validate_config(config: &ClientConfig) -> Result<()> {
    let mut violations = Vec::new();
    check_base_url(&config.base_url, &mut violations);
    if config.api_key.trim().is_empty() {
        violations.push(ContractViolation::new("/apiKey", "API key must not be empty"));
    }
    if config.timeout.is_zero() {
        violations.push(ContractViolation::new("/timeout", "timeout must be positive"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid client configuration", violations))
    }
}
