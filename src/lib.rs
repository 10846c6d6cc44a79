//! # anythingllm-client
//!
//! Resilient client for the AnythingLLM document/LLM workspace platform.
//!
//! ## Overview
//!
//! Every REST call goes through one request pipeline: the request is sent under the
//! configured timeout, the response is checked against a declared
//! [`ResponseContract`](contract::ResponseContract), failures are classified into a closed
//! [`ErrorKind`] taxonomy, and retry-eligible calls are retried with bounded exponential
//! backoff. No raw transport error reaches the caller; everything is a [`DomainError`].
//!
//! Workspace events arrive over a [`WebSocketManager`](ws::WebSocketManager) that
//! reconnects on its own and dispatches typed messages to subscribers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anythingllm_client::{AnythingLlmClient, ChatMessage, ChatOptions, ChatChunk};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> anythingllm_client::Result<()> {
//!     let client = AnythingLlmClient::builder()
//!         .base_url("http://localhost:3001")
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let workspaces = client.workspaces().list().await?;
//!     println!("{} workspaces", workspaces.len());
//!
//!     let mut stream = client
//!         .chat()
//!         .stream("dev-workspace", &[ChatMessage::user("Hello")], &ChatOptions::default())
//!         .await?;
//!     while let Some(chunk) = stream.next().await {
//!         if let ChatChunk::Text { content, .. } = chunk {
//!             print!("{}", content);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, config, request pipeline, retry policy, error mapper |
//! | [`contract`] | Response contracts (JSON Schema validation + canonicalisation) |
//! | [`endpoints`] | Workspace, document, chat and agent operations |
//! | [`error`] / [`error_code`] | `DomainError` and the error taxonomy |
//! | [`streaming`] | Streaming chat decoder |
//! | [`transport`] | HTTP transport |
//! | [`types`] | Canonical domain types |
//! | [`ws`] | Reconnecting workspace event socket |

pub mod client;
pub mod contract;
pub mod endpoints;
pub mod error;
pub mod error_code;
pub mod streaming;
pub mod transport;
pub mod types;
pub mod ws;

pub use client::{AnythingLlmClient, AnythingLlmClientBuilder, ClientConfig, RetryPolicy};
pub use error::DomainError;
pub use error_code::{ErrorKind, ResourceType};
pub use streaming::ChatStream;
pub use types::{
    ChatChunk, ChatMessage, ChatMode, ChatOptions, ChatResponse, CreateWorkspace, Document,
    DocumentType, FileUpload, MessageRole, SearchResult, UploadOptions, WorkspaceDetail,
    WorkspaceSummary, WorkspaceUpdate,
};
pub use ws::{ConnectionState, WebSocketManager, WebSocketMessage, WsEvent};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, DomainError>;

/// Boxed, sendable stream.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;
