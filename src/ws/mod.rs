//! Workspace event sockets.
//!
//! A [`WebSocketManager`] owns one socket for one workspace. It reconnects with exponential
//! backoff after unexpected closes, gives up after a fixed number of consecutive attempts,
//! and dispatches each parsed [`WebSocketMessage`] to subscribers both under `"message"` and
//! under the message's own discriminant.
//!
//! ```rust,no_run
//! # async fn demo(client: anythingllm_client::AnythingLlmClient) {
//! let ws = client.websocket("dev-workspace");
//! let mut thinking = ws.subscribe("agent-thinking");
//! ws.start();
//! while let Some(event) = thinking.recv().await {
//!     println!("{:?}", event);
//! }
//! # }
//! ```

mod connection;
pub mod message;
mod transport;

pub use connection::{
    ConnectionState, ReconnectPolicy, Subscription, WebSocketManager, WsEvent, ALL_EVENTS,
};
pub use message::WebSocketMessage;
pub use transport::{FrameStream, TungsteniteConnector, WsConnector};
