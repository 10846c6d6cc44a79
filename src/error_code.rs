//! Error taxonomy: the closed set of failure kinds surfaced by the client.
//!
//! Every failure that crosses the request pipeline boundary is classified into exactly
//! one [`ErrorKind`]. Each kind carries its default recoverability, retry-after hint and
//! user-facing remediation text; [`crate::DomainError`] is built from these defaults.
//!
//! | Kind                 | Trigger                                   | Recoverable      |
//! |----------------------|-------------------------------------------|------------------|
//! | `AuthFailure`        | HTTP 401 / 403                            | no               |
//! | `ResourceNotFound`   | HTTP 404 or "not found" in the message    | no               |
//! | `RateLimited`        | HTTP 429                                  | yes              |
//! | `ServiceUnavailable` | HTTP 502 / 504                            | yes (30s)        |
//! | `ValidationFailure`  | HTTP 400 or a local contract mismatch     | no               |
//! | `Timeout`            | transport timeout                         | yes (30s)        |
//! | `NetworkFailure`     | connection-level error                    | yes (10s)        |
//! | `UnknownServerError` | any other HTTP status >= 400              | iff status >= 500|
//! | `ClientUnexpected`   | anything else                             | no               |
//!
//! ## Example
//!
//! ```rust
//! use anythingllm_client::error_code::{ErrorKind, ResourceType};
//!
//! let kind = ErrorKind::from_http_status(429);
//! assert_eq!(kind.code(), "RateLimited");
//! assert!(kind.default_recoverable(Some(429)));
//!
//! assert_eq!(ResourceType::from_message("Workspace not found"), ResourceType::Workspace);
//! ```

use crate::contract::ContractViolation;
use std::fmt;

/// Resource family a not-found error refers to.
///
/// Inferred from the server's error text; this is a best-effort heuristic, not a
/// correctness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Workspace,
    Document,
    Agent,
    Resource,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Document => "document",
            Self::Agent => "agent",
            Self::Resource => "resource",
        }
    }

    /// Guess the resource family from an error message.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("workspace") {
            Self::Workspace
        } else if lower.contains("document") {
            Self::Document
        } else if lower.contains("agent") {
            Self::Agent
        } else {
            Self::Resource
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed taxonomy of domain failures.
///
/// Kinds that need extra data carry it inline so callers can match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Invalid, expired or missing credential (HTTP 401/403).
    AuthFailure,
    /// The addressed resource does not exist.
    ResourceNotFound { resource: ResourceType },
    /// Request rate limit exceeded (HTTP 429).
    RateLimited,
    /// Upstream service (embedder, gateway) temporarily down (HTTP 502/504).
    ServiceUnavailable,
    /// Server rejected the request (HTTP 400) or the response broke its contract.
    ValidationFailure { violations: Vec<ContractViolation> },
    /// Request timed out before a response was received.
    Timeout,
    /// Connection-level failure (DNS, refused, reset).
    NetworkFailure,
    /// Any other HTTP error status.
    UnknownServerError,
    /// Last-resort bucket for failures nothing else claims.
    ClientUnexpected,
}

impl ErrorKind {
    /// Returns the taxonomy key (e.g. `"AuthFailure"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthFailure => "AuthFailure",
            Self::ResourceNotFound { .. } => "ResourceNotFound",
            Self::RateLimited => "RateLimited",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::ValidationFailure { .. } => "ValidationFailure",
            Self::Timeout => "Timeout",
            Self::NetworkFailure => "NetworkFailure",
            Self::UnknownServerError => "UnknownServerError",
            Self::ClientUnexpected => "ClientUnexpected",
        }
    }

    /// Whether a failure of this kind is worth retrying.
    ///
    /// `status` only matters for `UnknownServerError`, which is recoverable for 5xx.
    pub fn default_recoverable(&self, status: Option<u16>) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::Timeout | Self::NetworkFailure => {
                true
            }
            Self::UnknownServerError => status.map(|s| s >= 500).unwrap_or(false),
            Self::AuthFailure
            | Self::ResourceNotFound { .. }
            | Self::ValidationFailure { .. }
            | Self::ClientUnexpected => false,
        }
    }

    /// Default retry-after hint in seconds.
    pub fn default_retry_after_secs(&self, status: Option<u16>) -> Option<u64> {
        match self {
            Self::ServiceUnavailable | Self::Timeout => Some(30),
            Self::NetworkFailure => Some(10),
            Self::UnknownServerError if status.map(|s| s >= 500).unwrap_or(false) => Some(30),
            _ => None,
        }
    }

    /// Remediation text intended for direct display to end users.
    pub fn default_suggestion(&self, status: Option<u16>) -> String {
        match self {
            Self::AuthFailure => {
                "Invalid or expired API key. Regenerate it in Settings → API Keys.".to_string()
            }
            Self::ResourceNotFound { resource } => {
                format!("The {} no longer exists or was renamed.", resource)
            }
            Self::RateLimited => "You are sending requests too quickly.".to_string(),
            Self::ServiceUnavailable => {
                "Document processing is temporarily down. Retrying automatically...".to_string()
            }
            Self::ValidationFailure { .. } => "Request data is invalid.".to_string(),
            Self::Timeout => "Request timed out. Retrying...".to_string(),
            Self::NetworkFailure => "Network issue. Retrying...".to_string(),
            Self::UnknownServerError => {
                if status.map(|s| s >= 500).unwrap_or(false) {
                    "Server issue detected. Retrying...".to_string()
                } else {
                    "Unexpected error occurred.".to_string()
                }
            }
            Self::ClientUnexpected => "Unexpected client error.".to_string(),
        }
    }

    /// Maps an HTTP error status to its kind, ignoring the response body.
    ///
    /// The error mapper starts from this and refines it with the body: the resource named in
    /// a not-found message, and the "not found" text rule for other statuses.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthFailure,
            404 => Self::ResourceNotFound {
                resource: ResourceType::Resource,
            },
            429 => Self::RateLimited,
            502 | 504 => Self::ServiceUnavailable,
            400 => Self::ValidationFailure {
                violations: Vec::new(),
            },
            _ => Self::UnknownServerError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
