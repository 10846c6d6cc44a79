//! Response contracts for every platform operation.
//!
//! Schemas follow the platform's camelCase JSON and allow unknown properties; the
//! canonical types keep those in their `extra` maps.

use super::{CompiledSchema, ContractViolation, ResponseContract};
use crate::types::{
    Agent, AuthStatus, ChatResponse, Document, SearchResult, WorkspaceDetail, WorkspaceSummary,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

fn workspace_summary_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "slug", "createdAt", "documentCount"],
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "slug": { "type": "string", "minLength": 3 },
            "createdAt": { "type": "string", "format": "date-time" },
            "documentCount": { "type": "integer", "minimum": 0 }
        }
    })
}

fn workspace_detail_schema() -> Value {
    let mut schema = workspace_summary_schema();
    schema["properties"]["settings"] = json!({
        "type": "object",
        "properties": {
            "llmProvider": { "type": "string" },
            "embedder": { "type": "string" },
            "similarityThreshold": { "type": "number", "minimum": 0, "maximum": 1 },
            "topK": { "type": "integer", "minimum": 1 }
        }
    });
    schema
}

/// Draft 7 does not assert `format: uuid`, so the shape is spelled out.
const UUID_PATTERN: &str =
    "^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

fn document_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "title", "location", "createdAt"],
        "properties": {
            "id": { "type": "string", "pattern": UUID_PATTERN },
            "title": { "type": "string" },
            "location": { "type": "string" },
            "createdAt": { "type": "string", "format": "date-time" },
            "lastUpdated": { "type": "string", "format": "date-time" },
            "tags": { "type": "array", "items": { "type": "string" } }
        }
    })
}

fn search_result_schema() -> Value {
    json!({
        "type": "object",
        "required": ["content", "score"],
        "properties": {
            "content": { "type": "string" },
            "score": { "type": "number", "minimum": 0, "maximum": 1 },
            "metadata": { "type": "object" },
            "documentId": { "type": "string" }
        }
    })
}

fn agent_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name", "description", "active"],
        "properties": {
            "id": { "type": "string" },
            "name": { "type": "string" },
            "description": { "type": "string" },
            "active": { "type": "boolean" },
            "config": { "type": "object" }
        }
    })
}

static AUTH_STATUS: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "auth status",
        json!({
            "type": "object",
            "required": ["authenticated"],
            "properties": { "authenticated": { "type": "boolean" } }
        }),
    )
});

static WORKSPACE_SUMMARY: Lazy<CompiledSchema> =
    Lazy::new(|| CompiledSchema::compile("workspace summary", workspace_summary_schema()));

static WORKSPACE_LIST: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "workspace list",
        json!({ "type": "array", "items": workspace_summary_schema() }),
    )
});

static WORKSPACE_DETAIL: Lazy<CompiledSchema> =
    Lazy::new(|| CompiledSchema::compile("workspace detail", workspace_detail_schema()));

static DOCUMENT_UPLOAD: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "document upload",
        json!({
            "type": "object",
            "required": ["success"],
            "properties": {
                "success": { "type": "boolean" },
                "documents": { "type": "array", "items": document_schema() },
                "document": document_schema()
            }
        }),
    )
});

static LINK_PROCESSED: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "process link",
        json!({
            "type": "object",
            "required": ["success"],
            "properties": { "success": { "type": "boolean" } }
        }),
    )
});

static DOCUMENT_LIST: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "document list",
        json!({
            "type": "object",
            "required": ["localFiles"],
            "properties": {
                "localFiles": {
                    "type": "object",
                    "required": ["items"],
                    "properties": {
                        "items": { "type": "array", "items": document_schema() }
                    }
                }
            }
        }),
    )
});

static SEARCH: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "workspace search",
        json!({
            "type": "object",
            "required": ["textResponse"],
            "properties": {
                "textResponse": { "type": "string" },
                "sources": { "type": "array", "items": search_result_schema() }
            }
        }),
    )
});

static CHAT_RESPONSE: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile(
        "chat response",
        json!({
            "type": "object",
            "required": ["textResponse"],
            "properties": {
                "textResponse": { "type": "string" },
                "sources": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["title"],
                        "properties": {
                            "title": { "type": "string" },
                            "uri": { "type": "string" },
                            "text": { "type": "string" }
                        }
                    }
                },
                "chatId": { "type": "string" }
            }
        }),
    )
});

static AGENT: Lazy<CompiledSchema> = Lazy::new(|| CompiledSchema::compile("agent", agent_schema()));

static AGENT_LIST: Lazy<CompiledSchema> = Lazy::new(|| {
    CompiledSchema::compile("agent list", json!({ "type": "array", "items": agent_schema() }))
});

/// Unwrap `{ key: ... }` and validate the inner value against `schema`.
fn enveloped<T: serde::de::DeserializeOwned + 'static>(
    key: &'static str,
    schema: &'static CompiledSchema,
) -> ResponseContract<T> {
    let inner = ResponseContract::<T>::from_schema(schema);
    let name = format!("{{ {}: {} }}", key, schema.name());
    ResponseContract::from_fn(name, move |raw| {
        let unwrapped = raw
            .get(key)
            .ok_or_else(|| vec![ContractViolation::root(format!("missing envelope field '{}'", key))])?;
        inner.validate(unwrapped).map_err(|errs| {
            errs.into_iter()
                .map(|e| ContractViolation::new(format!("/{}{}", key, e.path), e.message))
                .collect()
        })
    })
}

pub fn auth_status() -> ResponseContract<AuthStatus> {
    ResponseContract::from_schema(&AUTH_STATUS)
}

pub fn workspace_summary() -> ResponseContract<WorkspaceSummary> {
    ResponseContract::from_schema(&WORKSPACE_SUMMARY)
}

/// Bare array, or `{ "workspaces": [...] }`.
pub fn workspace_list() -> ResponseContract<Vec<WorkspaceSummary>> {
    ResponseContract::from_schema(&WORKSPACE_LIST).or(enveloped("workspaces", &WORKSPACE_LIST))
}

/// Bare object, or `{ "workspace": {...} }`.
pub fn workspace_created() -> ResponseContract<WorkspaceSummary> {
    workspace_summary().or(enveloped("workspace", &WORKSPACE_SUMMARY))
}

/// Bare object, or `{ "workspace": {...} }`.
pub fn workspace_detail() -> ResponseContract<WorkspaceDetail> {
    ResponseContract::from_schema(&WORKSPACE_DETAIL)
        .or(enveloped("workspace", &WORKSPACE_DETAIL))
}

pub fn workspace_deleted() -> ResponseContract<()> {
    ResponseContract::any()
}

/// `{ success, documents?, document? }` canonicalised to the first returned document.
pub fn document_uploaded() -> ResponseContract<Document> {
    ResponseContract::<Value>::from_schema(&DOCUMENT_UPLOAD).map(|raw| {
        let doc = raw
            .get("documents")
            .and_then(|d| d.get(0))
            .or_else(|| raw.get("document"))
            .cloned()
            .ok_or_else(|| ContractViolation::root("No document returned"))?;
        serde_json::from_value::<Document>(doc).map_err(|e| ContractViolation::root(e.to_string()))
    })
}

/// `{ success }` canonicalised to the flag.
pub fn link_processed() -> ResponseContract<bool> {
    ResponseContract::<Value>::from_schema(&LINK_PROCESSED).map(|raw| {
        raw.get("success")
            .and_then(Value::as_bool)
            .ok_or_else(|| ContractViolation::new("/success", "expected a boolean"))
    })
}

/// `{ localFiles: { items: [...] } }` canonicalised to the items.
pub fn document_list() -> ResponseContract<Vec<Document>> {
    ResponseContract::<Value>::from_schema(&DOCUMENT_LIST).map(|raw| {
        let items = raw["localFiles"]["items"].clone();
        serde_json::from_value(items).map_err(|e| ContractViolation::root(e.to_string()))
    })
}

/// `{ textResponse, sources? }` canonicalised to the sources (empty when absent).
pub fn search_results() -> ResponseContract<Vec<SearchResult>> {
    ResponseContract::<Value>::from_schema(&SEARCH).map(|raw| match raw.get("sources") {
        Some(sources) if !sources.is_null() => serde_json::from_value(sources.clone())
            .map_err(|e| ContractViolation::new("/sources", e.to_string())),
        _ => Ok(Vec::new()),
    })
}

pub fn chat_response() -> ResponseContract<ChatResponse> {
    ResponseContract::from_schema(&CHAT_RESPONSE)
}

pub fn agent_list() -> ResponseContract<Vec<Agent>> {
    ResponseContract::from_schema(&AGENT_LIST)
}

pub fn agent_detail() -> ResponseContract<Agent> {
    ResponseContract::from_schema(&AGENT)
}
