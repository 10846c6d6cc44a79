use crate::error::DomainError;
use crate::{BoxStream, Result};
use async_trait::async_trait;
use futures::{future, StreamExt};
use tokio_tungstenite::tungstenite::Message;

/// Text frames of one open socket. The stream ends when the socket closes; an `Err` item
/// reports a socket error and is followed by the end of the stream.
pub type FrameStream = BoxStream<'static, Result<String>>;

/// Opens sockets for the [`WebSocketManager`](super::WebSocketManager).
#[async_trait]
pub trait WsConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<FrameStream>;
}

/// [`WsConnector`] over `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl WsConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<FrameStream> {
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| DomainError::network(format!("WS Network Error: {}", e)))?;

        let frames = socket
            .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text)),
                    Ok(Message::Binary(bytes)) => Some(Ok(String::from_utf8_lossy(&bytes).into_owned())),
                    Ok(_) => None,
                    Err(e) => Some(Err(DomainError::network(format!("WS Network Error: {}", e)))),
                })
            });
        Ok(Box::pin(frames))
    }
}
