//! Callback-driven WebSocket connection used by the subscription streams.

pub mod client;

pub use client::{
    OnCloseCallback, OnErrorCallback, OnMessageCallback, OnOpenCallback, SocketCallbacks,
    SocketHandle, SocketSender, SocketState, connect_socket,
};
