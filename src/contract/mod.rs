//! Response contracts: declarative shapes each operation's response must satisfy.
//!
//! A [`ResponseContract<T>`] validates a raw JSON payload against a JSON Schema and
//! canonicalises it into `T`. Payloads that parse but break the contract are reported as
//! a list of [`ContractViolation`]s; the request pipeline turns those into a
//! `ValidationFailure` instead of returning a value.
//!
//! Contracts compose:
//! - [`ResponseContract::map`] reshapes the validated value (e.g. unwrap an envelope),
//! - [`ResponseContract::or`] accepts an alternative shape,
//! - [`ResponseContract::any`] accepts everything (used for bodiless responses).
//!
//! ```rust
//! use anythingllm_client::contract::{schemas, ResponseContract};
//! use anythingllm_client::types::WorkspaceSummary;
//! use serde_json::json;
//!
//! let contract: ResponseContract<WorkspaceSummary> = schemas::workspace_summary();
//! let ws = contract
//!     .validate(&json!({
//!         "name": "Dev",
//!         "slug": "dev-workspace",
//!         "createdAt": "2025-01-01T00:00:00Z",
//!         "documentCount": 0
//!     }))
//!     .unwrap();
//! assert_eq!(ws.slug, "dev-workspace");
//! ```

pub mod schemas;

use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One way a payload failed its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    /// JSON pointer to the offending location (`""` for the root).
    pub path: String,
    pub message: String,
}

impl ContractViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A JSON Schema compiled once and shared by every contract built on it.
///
/// A schema that fails to compile does not panic; every check against it reports the
/// compile error as a violation.
pub struct CompiledSchema {
    name: &'static str,
    compiled: Result<JSONSchema, String>,
}

impl CompiledSchema {
    pub fn compile(name: &'static str, schema: Value) -> Self {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| format!("schema '{}' failed to compile: {}", name, e));
        if let Err(e) = &compiled {
            tracing::error!(schema = name, error = e.as_str(), "invalid response schema");
        }
        Self { name, compiled }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate `instance`, collecting every violation.
    pub fn check(&self, instance: &Value) -> Result<(), Vec<ContractViolation>> {
        let schema = match &self.compiled {
            Ok(s) => s,
            Err(e) => return Err(vec![ContractViolation::root(e.clone())]),
        };
        match schema.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| ContractViolation::new(e.instance_path.to_string(), e.to_string()))
                .collect()),
        }
    }
}

type Canonicalize<T> = dyn Fn(&Value) -> Result<T, Vec<ContractViolation>> + Send + Sync;

/// Declared shape and canonicalisation rule for one operation's result.
pub struct ResponseContract<T> {
    name: String,
    check: Arc<Canonicalize<T>>,
}

impl<T> Clone for ResponseContract<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            check: self.check.clone(),
        }
    }
}

impl<T> fmt::Debug for ResponseContract<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseContract")
            .field("name", &self.name)
            .finish()
    }
}

impl<T: DeserializeOwned + 'static> ResponseContract<T> {
    /// Validate against `schema`, then deserialize into `T`.
    pub fn from_schema(schema: &'static CompiledSchema) -> Self {
        Self {
            name: schema.name().to_string(),
            check: Arc::new(move |raw: &Value| {
                schema.check(raw)?;
                serde_json::from_value::<T>(raw.clone())
                    .map_err(|e| vec![ContractViolation::root(e.to_string())])
            }),
        }
    }
}

impl<T: 'static> ResponseContract<T> {
    /// Build a contract from an arbitrary canonicalisation function.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<T, Vec<ContractViolation>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate and canonicalise a raw payload.
    pub fn validate(&self, raw: &Value) -> Result<T, Vec<ContractViolation>> {
        (self.check)(raw)
    }

    /// Reshape the validated value; `f` may still reject it.
    pub fn map<U, F>(self, f: F) -> ResponseContract<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U, ContractViolation> + Send + Sync + 'static,
    {
        let inner = self.check;
        ResponseContract {
            name: self.name,
            check: Arc::new(move |raw: &Value| inner(raw).and_then(|v| f(v).map_err(|e| vec![e]))),
        }
    }

    /// Accept `self`'s shape, or else `other`'s. When both reject, both violation lists are
    /// reported.
    pub fn or(self, other: ResponseContract<T>) -> ResponseContract<T> {
        let name = format!("{} | {}", self.name, other.name);
        let first = self.check;
        let second = other.check;
        ResponseContract {
            name,
            check: Arc::new(move |raw: &Value| match first(raw) {
                Ok(v) => Ok(v),
                Err(mut errs) => match second(raw) {
                    Ok(v) => Ok(v),
                    Err(more) => {
                        errs.extend(more);
                        Err(errs)
                    }
                },
            }),
        }
    }
}

impl ResponseContract<()> {
    /// Accept any payload, including an empty body.
    pub fn any() -> Self {
        Self::from_fn("any", |_| Ok(()))
    }
}
