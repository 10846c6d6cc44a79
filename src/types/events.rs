//! Streaming chat chunks.

use crate::error::DomainError;
use crate::error_code::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One incremental unit of a streamed chat response.
///
/// Chunks are yielded in arrival order. `Stop` and `Error` are terminal: nothing follows
/// them in the same stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatChunk {
    /// Text delta
    Text {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        chat_id: Option<String>,
    },

    /// Citation of a source document
    Citation {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        metadata: Map<String, Value>,
        sources: Vec<Value>,
    },

    /// Grounding metadata
    Grounding { metadata: Map<String, Value> },

    /// End of the answer
    Stop {
        #[serde(skip_serializing_if = "Option::is_none")]
        chat_id: Option<String>,
    },

    /// Server-reported or transport failure
    Error { error: DomainError },
}

impl ChatChunk {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stop { .. } | Self::Error { .. })
    }

    /// Text carried by this chunk, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content),
            Self::Citation { content, .. } => content.as_deref(),
            _ => None,
        }
    }
}

/// Wire form of a chunk: a `type` discriminant plus optional fields, including the legacy
/// `textResponse` / `sources` pair.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireChunk {
    #[serde(rename = "type", default)]
    kind: Option<Value>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default)]
    text_response: Option<String>,
    #[serde(default)]
    sources: Option<Vec<Value>>,
}

impl WireChunk {
    /// Parse one data payload. `None` means the payload is structurally invalid.
    pub(crate) fn parse(payload: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(payload).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    pub(crate) fn into_chunk(self) -> ChatChunk {
        // Unknown or missing discriminants are read as text.
        match self.kind.as_ref().and_then(Value::as_str) {
            Some("citation") => ChatChunk::Citation {
                content: self.content.or(self.text_response),
                metadata: self.metadata.unwrap_or_default(),
                sources: self.sources.unwrap_or_default(),
            },
            Some("grounding") => ChatChunk::Grounding {
                metadata: self.metadata.unwrap_or_default(),
            },
            Some("stop") => ChatChunk::Stop {
                chat_id: self.chat_id,
            },
            Some("error") => {
                let message = self
                    .content
                    .or(self.text_response)
                    .unwrap_or_else(|| "stream reported an error".to_string());
                let mut error = DomainError::new(ErrorKind::UnknownServerError, message);
                if let Some(metadata) = self.metadata {
                    error = error.with_details(metadata);
                }
                ChatChunk::Error { error }
            }
            _ => ChatChunk::Text {
                content: self.content.or(self.text_response).unwrap_or_default(),
                chat_id: self.chat_id,
            },
        }
    }
}
