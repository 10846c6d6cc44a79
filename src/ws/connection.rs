use super::message::WebSocketMessage;
use super::transport::WsConnector;
use crate::error::DomainError;
use crate::error_code::ErrorKind;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Reconnect schedule: the delay before reconnect `n` (1-based) is `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    /// Consecutive reconnects allowed before giving up.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Created, `start()` not called yet.
    Idle,
    Connecting,
    Open,
    Reconnecting,
    /// Closed by the caller. Terminal.
    ClosedExplicit,
    /// Gave up after the reconnect ceiling. Terminal.
    ClosedExhausted,
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ClosedExplicit | Self::ClosedExhausted)
    }
}

/// Everything a subscriber can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    Open,
    Message(WebSocketMessage),
    /// A frame that is not a valid message. Connection state is unaffected.
    ParseError(DomainError),
    /// Socket or handshake error; a reconnect follows unless the ceiling is reached.
    Error(DomainError),
    Reconnecting { attempt: u32, delay: Duration },
    /// Reconnect ceiling reached; nothing follows.
    Fatal(DomainError),
    /// Closed by the caller; nothing follows.
    Closed,
}

pub const ALL_EVENTS: &str = "*";

impl WsEvent {
    /// Subscription names this event is delivered to, besides `"*"`.
    fn names(&self) -> [Option<&'static str>; 2] {
        match self {
            Self::Open => [Some("open"), None],
            Self::Message(m) => [Some("message"), Some(m.kind())],
            Self::ParseError(_) => [Some("parse-error"), None],
            Self::Error(_) | Self::Fatal(_) => [Some("error"), None],
            Self::Reconnecting { .. } => [Some("reconnecting"), None],
            Self::Closed => [Some("close"), None],
        }
    }
}

/// Receiving end of a subscription. Ends once the manager reaches a closed state.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<WsEvent>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<WsEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<WsEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = WsEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<WsEvent>> {
        self.rx.poll_recv(cx)
    }
}

type Listeners = HashMap<String, Vec<mpsc::UnboundedSender<WsEvent>>>;

struct Inner {
    url: String,
    connector: Arc<dyn WsConnector>,
    policy: ReconnectPolicy,
    state: watch::Sender<ConnectionState>,
    listeners: Mutex<Listeners>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    /// Move to `next` unless already closed. Returns false when the move was refused.
    fn set_state(&self, next: ConnectionState) -> bool {
        let mut allowed = false;
        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            allowed = true;
            if *current == next {
                return false;
            }
            info!(url = %redact(&self.url), from = ?*current, to = ?next, "websocket state");
            *current = next;
            true
        });
        allowed
    }

    fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: WsEvent) {
        deliver(&mut self.listeners(), &event);
    }

    /// Enter terminal state `next`, deliver `last` and end every subscription. Returns false
    /// if already terminal.
    ///
    /// The listener lock is held across the state change, so a concurrent `subscribe` either
    /// registers before it (and sees `last`, then the end) or observes the terminal state.
    fn finish(&self, next: ConnectionState, last: WsEvent) -> bool {
        let mut listeners = self.listeners();
        if !self.set_state(next) {
            return false;
        }
        deliver(&mut listeners, &last);
        listeners.clear();
        true
    }
}

fn deliver(listeners: &mut Listeners, event: &WsEvent) {
    let [first, second] = event.names();
    for name in [first, second, Some(ALL_EVENTS)].into_iter().flatten() {
        if let Some(senders) = listeners.get_mut(name) {
            senders.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// Credentials never reach the logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// One reconnecting socket for one workspace.
///
/// Created idle so subscribers can attach before any event fires; [`start`](Self::start)
/// spawns the connection task. [`close`](Self::close) is terminal and idempotent. Dropping
/// the manager stops the task.
pub struct WebSocketManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for WebSocketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketManager")
            .field("url", &redact(&self.inner.url))
            .field("state", &self.inner.state())
            .finish()
    }
}

impl WebSocketManager {
    pub fn new(url: impl Into<String>, connector: Arc<dyn WsConnector>, policy: ReconnectPolicy) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                connector,
                policy,
                state,
                listeners: Mutex::new(HashMap::new()),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    /// Watch state transitions.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to `name`: `"message"`, a message discriminant such as `"agent-started"`,
    /// `"open"`, `"close"`, `"error"`, `"parse-error"`, `"reconnecting"`, or `"*"`.
    ///
    /// Server `error` messages share the `"error"` name with socket errors.
    pub fn subscribe(&self, name: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut listeners = self.inner.listeners();
        if !self.inner.state().is_terminal() {
            listeners.entry(name.to_string()).or_default().push(tx);
        }
        Subscription { rx }
    }

    /// Spawn the connection task. No-op if already started or closed. Must be called
    /// within a tokio runtime.
    pub fn start(&self) {
        let Ok(mut task) = self.inner.task.lock() else {
            return;
        };
        if task.is_some() || self.inner.state().is_terminal() {
            return;
        }
        *task = Some(tokio::spawn(run(self.inner.clone())));
    }

    /// Close for good. Cancels any pending reconnect; later calls do nothing.
    pub fn close(&self) {
        if self.inner.finish(ConnectionState::ClosedExplicit, WsEvent::Closed) {
            self.inner.cancel.cancel();
        }
    }

    /// Wait for the connection task to finish. Returns at once if it never started.
    pub async fn closed(&self) {
        let handle = self.inner.task.lock().ok().and_then(|mut t| t.take());
        match handle {
            Some(handle) => {
                let _ = handle.await;
            }
            None => {
                let started = !matches!(self.inner.state(), ConnectionState::Idle);
                if started {
                    let mut rx = self.inner.state.subscribe();
                    let _ = rx.wait_for(|s| s.is_terminal()).await;
                }
            }
        }
    }
}

impl Drop for WebSocketManager {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

async fn run(inner: Arc<Inner>) {
    let policy = inner.policy;
    let mut attempts: u32 = 0;

    loop {
        if !inner.set_state(ConnectionState::Connecting) {
            return;
        }

        let connected = tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => return,
            r = inner.connector.connect(&inner.url) => r,
        };

        match connected {
            Ok(mut frames) => {
                if !inner.set_state(ConnectionState::Open) {
                    return;
                }
                attempts = 0;
                inner.emit(WsEvent::Open);

                loop {
                    let frame = tokio::select! {
                        biased;
                        _ = inner.cancel.cancelled() => return,
                        f = frames.next() => f,
                    };
                    match frame {
                        Some(Ok(text)) => match WebSocketMessage::parse(&text) {
                            Ok(msg) => inner.emit(WsEvent::Message(msg)),
                            Err(e) => {
                                warn!(error = %e, "dropping malformed websocket frame");
                                inner.emit(WsEvent::ParseError(e));
                            }
                        },
                        Some(Err(e)) => {
                            warn!(error = %e, "websocket error");
                            inner.emit(WsEvent::Error(e));
                            break;
                        }
                        None => break,
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, attempt = attempts, "websocket connect failed");
                inner.emit(WsEvent::Error(e));
            }
        }

        if attempts >= policy.max_attempts {
            let fatal = DomainError::new(ErrorKind::NetworkFailure, "Max reconnect attempts reached")
                .with_recoverable(false)
                .with_retry_after(None)
                .with_detail("attempts", attempts.into());
            if inner.finish(ConnectionState::ClosedExhausted, WsEvent::Fatal(fatal)) {
                error!(url = %redact(&inner.url), attempts, "websocket reconnect ceiling reached");
            }
            return;
        }

        attempts += 1;
        let delay = policy.delay(attempts);
        if !inner.set_state(ConnectionState::Reconnecting) {
            return;
        }
        inner.emit(WsEvent::Reconnecting {
            attempt: attempts,
            delay,
        });

        tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
