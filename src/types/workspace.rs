//! Workspace shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Workspace as returned by list/create.
///
/// Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub name: String,
    pub slug: String,
    pub created_at: String,
    pub document_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Workspace with its model/retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDetail {
    pub name: String,
    pub slug: String,
    pub created_at: String,
    pub document_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<WorkspaceSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceDetail {
    pub fn summary(&self) -> WorkspaceSummary {
        let mut extra = self.extra.clone();
        if let Some(settings) = &self.settings {
            if let Ok(v) = serde_json::to_value(settings) {
                extra.insert("settings".to_string(), v);
            }
        }
        WorkspaceSummary {
            name: self.name.clone(),
            slug: self.slug.clone(),
            created_at: self.created_at.clone(),
            document_count: self.document_count,
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedder: Option<String>,
    /// Retrieval similarity cut-off in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWorkspace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl CreateWorkspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Partial update; unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<WorkspaceSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn settings(mut self, settings: WorkspaceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Set a raw field the typed update does not cover.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
