//! Workspace event messages.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceUpdated {
    pub slug: String,
    #[serde(default)]
    pub changes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStarted {
    pub agent_id: String,
    pub thread_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentThinking {
    pub agent_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentToolCall {
    pub agent_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentToolResult {
    pub agent_id: String,
    #[serde(default)]
    pub result: Value,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub agent_id: String,
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFinished {
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error reported by the server over the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub fatal: bool,
}

/// One message on a workspace socket: `{ "type": ..., "payload": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum WebSocketMessage {
    WorkspaceUpdated(WorkspaceUpdated),
    AgentStarted(AgentStarted),
    AgentThinking(AgentThinking),
    AgentToolCall(AgentToolCall),
    AgentToolResult(AgentToolResult),
    AgentMessage(AgentMessage),
    AgentFinished(AgentFinished),
    Error(ServerError),
}

impl WebSocketMessage {
    /// Wire discriminant, also used as the subscription name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WorkspaceUpdated(_) => "workspace-updated",
            Self::AgentStarted(_) => "agent-started",
            Self::AgentThinking(_) => "agent-thinking",
            Self::AgentToolCall(_) => "agent-tool-call",
            Self::AgentToolResult(_) => "agent-tool-result",
            Self::AgentMessage(_) => "agent-message",
            Self::AgentFinished(_) => "agent-finished",
            Self::Error(_) => "error",
        }
    }

    /// Parse one text frame. Anything that is not a known message is a `ValidationFailure`
    /// carrying the raw text.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            DomainError::validation(format!("WS Parse Error: {}", e), Vec::new())
                .with_detail("raw", Value::String(raw.to_string()))
        })
    }
}
