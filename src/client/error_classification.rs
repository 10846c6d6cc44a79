//! Error classification: every raw failure becomes exactly one [`DomainError`].

use crate::contract::ContractViolation;
use crate::error::DomainError;
use crate::error_code::{ErrorKind, ResourceType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static NOT_FOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)not\s+found").expect("static regex"));
static TIMEOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)time(d)?\s*out").expect("static regex"));
static NETWORK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)network|connection|connect error|dns").expect("static regex"));

/// A failure as captured at the transport or validation boundary, before classification.
#[derive(Debug, Clone)]
pub enum RawFailure {
    /// Non-2xx response. `body` is the parsed JSON body, or a JSON string when the body was
    /// not JSON.
    Http {
        status: u16,
        body: Value,
        retry_after: Option<u64>,
    },
    /// Request did not complete within the configured timeout.
    Timeout(String),
    /// Connection-level failure (refused, reset, DNS).
    Network(String),
    /// Response arrived but broke its contract.
    Contract {
        violations: Vec<ContractViolation>,
        raw: Value,
    },
    /// Already classified.
    Domain(DomainError),
    /// Anything else, with whatever message the source produced.
    Other(String),
}

impl From<reqwest::Error> for RawFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RawFailure::Timeout(e.to_string())
        } else if e.is_connect() {
            RawFailure::Network(e.to_string())
        } else {
            RawFailure::Other(e.to_string())
        }
    }
}

impl From<DomainError> for RawFailure {
    fn from(e: DomainError) -> Self {
        RawFailure::Domain(e)
    }
}

/// Server-provided message from a `{ "error": ... }` (or `{ "message": ... }`) body.
fn body_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => ["error", "message"]
            .iter()
            .filter_map(|k| map.get(*k))
            .find_map(|v| v.as_str().map(str::to_string)),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Classify a raw failure. Pure: no I/O, no retries.
pub fn map_failure(failure: RawFailure) -> DomainError {
    match failure {
        RawFailure::Domain(e) => e,
        RawFailure::Http {
            status,
            body,
            retry_after,
        } => map_http(status, body, retry_after),
        RawFailure::Timeout(message) => DomainError::timeout(message),
        RawFailure::Network(message) => DomainError::network(message),
        RawFailure::Contract { violations, raw } => {
            DomainError::validation("Client schema mismatch with server response", violations)
                .with_detail("data", raw)
        }
        RawFailure::Other(message) => map_opaque(message),
    }
}

fn map_http(status: u16, body: Value, retry_after: Option<u64>) -> DomainError {
    let server_message = body_message(&body);
    let message = server_message
        .clone()
        .unwrap_or_else(|| format!("Request failed with status code {}", status));

    // A non-error status never reaches here from the transport; treat it as opaque.
    if status < 400 {
        return DomainError::client_unexpected(message).with_detail("status", Value::from(status));
    }

    let says_not_found = server_message
        .as_deref()
        .map_or(false, |m| NOT_FOUND.is_match(m));
    let kind = match ErrorKind::from_http_status(status) {
        ErrorKind::AuthFailure => ErrorKind::AuthFailure,
        ErrorKind::ResourceNotFound { .. } => ErrorKind::ResourceNotFound {
            resource: ResourceType::from_message(&message),
        },
        _ if says_not_found => ErrorKind::ResourceNotFound {
            resource: ResourceType::from_message(&message),
        },
        kind => kind,
    };

    match kind {
        ErrorKind::RateLimited => DomainError::rate_limited(message, retry_after),
        ErrorKind::ValidationFailure { .. } => {
            let violations = match &server_message {
                Some(m) => vec![ContractViolation::root(m.clone())],
                None => Vec::new(),
            };
            let mut err = DomainError::with_http_status(
                ErrorKind::ValidationFailure { violations },
                status,
                message,
            );
            if !body.is_null() {
                err = err.with_detail("responseData", body);
            }
            err
        }
        ErrorKind::UnknownServerError => {
            let mut details = Map::new();
            details.insert("responseData".to_string(), body);
            DomainError::with_http_status(kind, status, message).with_details(details)
        }
        kind => DomainError::with_http_status(kind, status, message),
    }
}

/// Fallback for failures that only carry text.
fn map_opaque(message: String) -> DomainError {
    if TIMEOUT.is_match(&message) {
        DomainError::timeout(message)
    } else if NETWORK.is_match(&message) {
        DomainError::network(message)
    } else if NOT_FOUND.is_match(&message) {
        let resource = ResourceType::from_message(&message);
        DomainError::new(ErrorKind::ResourceNotFound { resource }, message)
    } else {
        DomainError::client_unexpected(message)
    }
}
