//! Canonical domain types.
//!
//! Every type here is the validated, canonical form of a platform payload. Response
//! contracts in [`crate::contract`] produce them; fields the client does not model are
//! preserved in an `extra` map rather than dropped.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`workspace`] | Workspace summary/detail, create and update bodies |
//! | [`document`] | Documents, search hits, upload options |
//! | [`chat`] | Blocking chat options and responses, auth status |
//! | [`agent`] | Agent summary/detail |
//! | [`message`] | Chat messages and file uploads |
//! | [`events`] | Streaming chat chunks |

pub mod agent;
pub mod chat;
pub mod document;
pub mod events;
pub mod message;
pub mod workspace;

pub use agent::{Agent, AgentDetail, AgentSummary};
pub use chat::{AuthStatus, ChatMode, ChatOptions, ChatResponse, ChatSource};
pub use document::{Document, DocumentType, SearchResult, UploadOptions};
pub use events::ChatChunk;
pub use message::{ChatMessage, FileUpload, MessageRole};
pub use workspace::{
    CreateWorkspace, WorkspaceDetail, WorkspaceSettings, WorkspaceSummary, WorkspaceUpdate,
};
