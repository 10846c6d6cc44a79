use crate::contract::ContractViolation;
use crate::error_code::{ErrorKind, ResourceType};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Normalized, taxonomy-classified failure surfaced by every client operation.
///
/// Constructed once per failure and never mutated afterwards; the builder-style
/// `with_*` methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}: {message}{}", .kind.code(), format_status(.status))]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
    /// Correlated HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    pub recoverable: bool,
    pub retry_after_secs: Option<u64>,
    /// Remediation text meant for direct display.
    pub suggestion: String,
    pub details: Option<Map<String, Value>>,
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {})", s),
        None => String::new(),
    }
}

impl DomainError {
    /// Create an error of `kind` with the kind's default recoverability, hint and suggestion.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let recoverable = kind.default_recoverable(None);
        let retry_after_secs = kind.default_retry_after_secs(None);
        let suggestion = kind.default_suggestion(None);
        Self {
            kind,
            message: message.into(),
            status: None,
            recoverable,
            retry_after_secs,
            suggestion,
            details: None,
        }
    }

    /// Create an error correlated with an HTTP status; defaults are derived with the status.
    pub fn with_http_status(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        let recoverable = kind.default_recoverable(Some(status));
        let retry_after_secs = kind.default_retry_after_secs(Some(status));
        let suggestion = kind.default_suggestion(Some(status));
        Self {
            kind,
            message: message.into(),
            status: Some(status),
            recoverable,
            retry_after_secs,
            suggestion,
            details: None,
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::with_http_status(ErrorKind::AuthFailure, 401, message)
    }

    pub fn not_found(resource: ResourceType, slug: Option<&str>) -> Self {
        let message = match slug {
            Some(s) => format!("{} not found ({})", resource, s),
            None => format!("{} not found", resource),
        };
        Self::with_http_status(ErrorKind::ResourceNotFound { resource }, 404, message)
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        let mut err = Self::with_http_status(ErrorKind::RateLimited, 429, message);
        err.retry_after_secs = retry_after_secs;
        err
    }

    pub fn service_unavailable(status: u16, message: impl Into<String>) -> Self {
        Self::with_http_status(ErrorKind::ServiceUnavailable, status, message)
    }

    /// Local contract mismatch (no HTTP status).
    pub fn validation(message: impl Into<String>, violations: Vec<ContractViolation>) -> Self {
        Self::new(ErrorKind::ValidationFailure { violations }, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailure, message)
    }

    pub fn client_unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientUnexpected, message)
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn with_retry_after(mut self, secs: Option<u64>) -> Self {
        self.retry_after_secs = secs;
        self
    }

    /// Taxonomy key, e.g. `"AuthFailure"`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Contract violations carried by a `ValidationFailure`, empty otherwise.
    pub fn violations(&self) -> &[ContractViolation] {
        match &self.kind {
            ErrorKind::ValidationFailure { violations } => violations,
            _ => &[],
        }
    }

    /// True for a 4xx status other than 429.
    pub fn is_client_status(&self) -> bool {
        matches!(self.status, Some(s) if (400..500).contains(&s) && s != 429)
    }

    /// JSON form: `{ code, message, status, recoverable, retryAfter, suggestion, details }`.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for DomainError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut details = self.details.clone();
        if let ErrorKind::ValidationFailure { violations } = &self.kind {
            if !violations.is_empty() {
                let list = violations
                    .iter()
                    .map(|v| serde_json::json!({ "path": v.path, "message": v.message }))
                    .collect();
                details
                    .get_or_insert_with(Map::new)
                    .entry("violations")
                    .or_insert(Value::Array(list));
            }
        }
        if let ErrorKind::ResourceNotFound { resource } = &self.kind {
            details
                .get_or_insert_with(Map::new)
                .entry("resource")
                .or_insert(Value::String(resource.as_str().to_string()));
        }

        let mut s = serializer.serialize_struct("DomainError", 7)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", &self.message)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("recoverable", &self.recoverable)?;
        s.serialize_field("retryAfter", &self.retry_after_secs)?;
        s.serialize_field("suggestion", &self.suggestion)?;
        s.serialize_field("details", &details)?;
        s.end()
    }
}
