use crate::client::endpoint::{segment, Operation};
use crate::client::AnythingLlmClient;
use crate::contract::{schemas, ContractViolation};
use crate::error::DomainError;
use crate::streaming::{decode_chat_stream, ChatStream};
use crate::types::{ChatMessage, ChatOptions, ChatResponse};
use crate::Result;
use serde_json::{json, Value};

/// Workspace chat, blocking or streamed.
#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    client: &'a AnythingLlmClient,
}

/// The platform answers the last message; earlier turns live in its own history.
fn last_message(messages: &[ChatMessage]) -> Result<&str> {
    messages
        .last()
        .map(|m| m.content.as_str())
        .ok_or_else(|| {
            DomainError::validation(
                "At least one message is required",
                vec![ContractViolation::new("/messages", "must not be empty")],
            )
        })
}

impl<'a> Chat<'a> {
    pub(crate) fn new(client: &'a AnythingLlmClient) -> Self {
        Self { client }
    }

    pub async fn send(
        &self,
        workspace: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse> {
        let message = last_message(messages)?;
        let mut body = json!({ "message": message, "mode": options.mode.as_str() });
        if let Some(t) = options.temperature {
            body["temperature"] = Value::from(t);
        }
        if let Some(id) = &options.session_id {
            body["sessionId"] = Value::from(id.as_str());
        }

        self.client
            .execute(
                Operation::post(format!("/workspace/{}/chat", segment(workspace))).json(&body),
                &schemas::chat_response(),
            )
            .await
    }

    /// Stream the answer. Failures before the first byte are returned as `Err`; failures
    /// after that arrive as a terminal [`ChatChunk::Error`](crate::types::ChatChunk::Error).
    pub async fn stream(
        &self,
        workspace: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatStream> {
        let message = last_message(messages)?;
        let mut op = Operation::get(format!("/workspace/{}/stream-chat", segment(workspace)))
            .query("message", message)
            .query("mode", options.mode.as_str());
        if let Some(t) = options.temperature {
            op = op.query("temperature", t.to_string());
        }
        if let Some(id) = &options.session_id {
            op = op.query("sessionId", id.as_str());
        }

        let bytes = self.client.open_stream(op).await?;
        Ok(decode_chat_stream(bytes))
    }
}
