//! Single WebSocket connection driven by callbacks.
//!
//! [`connect_socket`] spawns a tokio task that:
//! 1. Connects to the endpoint (TLS for `wss://`).
//! 2. Marks the socket open and invokes the open callback, which typically
//!    sends the subscription frame(s) through the provided [`SocketSender`].
//! 3. JSON-decodes every inbound frame and forwards it to the message
//!    callback.
//! 4. Writes outbound frames in the order they were sent.
//! 5. Reports errors and the final close through the optional callbacks.
//!
//! There is no reconnect and no send queue for a socket that is not open:
//! [`SocketSender::send`] on a connecting or closed socket logs a warning and
//! drops the frame.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::BxError;

/// Invoked once the socket is open.
pub type OnOpenCallback = Arc<dyn Fn(&SocketSender) + Send + Sync>;

/// Invoked with each decoded inbound frame.
pub type OnMessageCallback = Arc<dyn Fn(serde_json::Value) + Send + Sync>;

/// Invoked on connect, read, write, or decode errors.
pub type OnErrorCallback = Arc<dyn Fn(&BxError) + Send + Sync>;

/// Invoked once when the socket reaches the closed state.
pub type OnCloseCallback = Arc<dyn Fn() + Send + Sync>;

/// Optional error/close callbacks. `None` falls back to logging.
#[derive(Clone, Default)]
pub struct SocketCallbacks {
    pub on_error: Option<OnErrorCallback>,
    pub on_close: Option<OnCloseCallback>,
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SocketState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl SocketState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

impl fmt::Display for SocketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Cloneable handle for writing text frames to a socket.
#[derive(Clone)]
pub struct SocketSender {
    url: Arc<str>,
    state: Arc<AtomicU8>,
    outbound_tx: mpsc::UnboundedSender<String>,
}

impl SocketSender {
    fn new(url: Arc<str>, outbound_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            url,
            state: Arc::new(AtomicU8::new(SocketState::Connecting as u8)),
            outbound_tx,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> SocketState {
        SocketState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == SocketState::Open
    }

    fn set_state(&self, state: SocketState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Send a text frame.
    ///
    /// Returns `false` without transmitting if the socket is not open.
    pub fn send(&self, frame: impl Into<String>) -> bool {
        let state = self.state();
        if state != SocketState::Open {
            warn!(url = %self.url, %state, "can't send message, socket is not open");
            return false;
        }

        let frame = frame.into();
        debug!(url = %self.url, %frame, "socket send");
        if self.outbound_tx.send(frame).is_err() {
            warn!(url = %self.url, "socket writer has stopped, frame dropped");
            return false;
        }
        true
    }
}

impl fmt::Debug for SocketSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketSender")
            .field("url", &self.url)
            .field("state", &self.state())
            .finish()
    }
}

/// Owner of one live connection.
///
/// Dropping the handle closes the socket.
#[must_use = "dropping the handle closes the socket"]
pub struct SocketHandle {
    sender: SocketSender,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl SocketHandle {
    pub fn url(&self) -> &str {
        self.sender.url()
    }

    pub fn state(&self) -> SocketState {
        self.sender.state()
    }

    pub fn is_open(&self) -> bool {
        self.sender.is_open()
    }

    /// A cloneable writer for this connection.
    pub fn sender(&self) -> SocketSender {
        self.sender.clone()
    }

    /// See [`SocketSender::send`].
    pub fn send(&self, frame: impl Into<String>) -> bool {
        self.sender.send(frame)
    }

    /// Close the socket and wait for the connection task to finish.
    pub async fn close(&mut self) {
        if self.sender.state() != SocketState::Closed {
            self.sender.set_state(SocketState::Closing);
        }
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandle").field("sender", &self.sender).finish()
    }
}

/// Open a socket to `url` and return immediately.
///
/// Must be called from within a tokio runtime.
pub fn connect_socket(
    url: impl Into<String>,
    on_message: OnMessageCallback,
    on_open: Option<OnOpenCallback>,
    callbacks: SocketCallbacks,
) -> SocketHandle {
    let url: Arc<str> = Arc::from(url.into());
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sender = SocketSender::new(url, outbound_tx);

    let task_sender = sender.clone();
    let task = tokio::spawn(async move {
        connection_task(task_sender, on_message, on_open, callbacks, outbound_rx, shutdown_rx)
            .await;
    });

    SocketHandle { sender, shutdown_tx: Some(shutdown_tx), task: Some(task) }
}

/// Connect, announce open, then pump frames until close, error, or shutdown.
async fn connection_task(
    sender: SocketSender,
    on_message: OnMessageCallback,
    on_open: Option<OnOpenCallback>,
    callbacks: SocketCallbacks,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let url = sender.url.clone();
    let on_error = callbacks.on_error.unwrap_or_else(|| default_on_error(url.clone()));
    let on_close = callbacks.on_close.unwrap_or_else(|| default_on_close(url.clone()));

    debug!(%url, "socket connecting");

    let connected = tokio::select! {
        res = tokio_tungstenite::connect_async(&*url) => res,
        _ = shutdown_rx.changed() => {
            sender.set_state(SocketState::Closed);
            on_close();
            return;
        }
    };

    let ws_stream = match connected {
        Ok((stream, _response)) => stream,
        Err(e) => {
            sender.set_state(SocketState::Closed);
            on_error(&BxError::WebSocket(e.to_string()));
            on_close();
            return;
        }
    };

    let (mut ws_write, mut ws_read) = ws_stream.split();

    sender.set_state(SocketState::Open);
    match &on_open {
        Some(cb) => cb(&sender),
        None => info!(%url, "socket connected"),
    }

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                sender.set_state(SocketState::Closing);
                let _ = ws_write.send(Message::Close(None)).await;
                let _ = ws_write.close().await;
                break;
            }

            Some(frame) = outbound_rx.recv() => {
                if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                    on_error(&BxError::WebSocket(e.to_string()));
                    break;
                }
            }

            msg = ws_read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => deliver(&text, &on_message, &on_error),
                    Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                        Ok(text) => deliver(text, &on_message, &on_error),
                        Err(e) => on_error(&BxError::WebSocket(format!("non UTF-8 binary frame: {e}"))),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!(%url, ?frame, "received close frame");
                        break;
                    }
                    Some(Err(e)) => {
                        on_error(&BxError::WebSocket(e.to_string()));
                        break;
                    }
                    None => break,
                    _ => {} // Pong, Frame
                }
            }
        }
    }

    sender.set_state(SocketState::Closed);
    on_close();
}

/// Decode one frame and hand it to the message callback.
fn deliver(text: &str, on_message: &OnMessageCallback, on_error: &OnErrorCallback) {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => on_message(value),
        Err(e) => on_error(&BxError::Json(e)),
    }
}

fn default_on_error(url: Arc<str>) -> OnErrorCallback {
    Arc::new(move |err: &BxError| warn!(%url, "socket connection error: {err}"))
}

fn default_on_close(url: Arc<str>) -> OnCloseCallback {
    Arc::new(move || info!(%url, "socket closed"))
}
