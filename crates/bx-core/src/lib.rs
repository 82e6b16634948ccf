//! # bx-core
//!
//! Core crate for the BTCEXA client workspace, providing:
//!
//! - **Auth** (`auth`): credentials, canonical parameter string, SHA-256 signer
//! - **Types** (`types`): parameter map, enum filters, request shapes
//! - **Configuration** (`config`): JSON config deserialization + validation
//! - **Error types** (`error`): domain-specific `BxError` via thiserror
//! - **WebSocket** (`ws`): single-connection socket with open/message/error/close callbacks
//! - **Time utilities** (`time_util`): millisecond timestamps
//! - **Logging** (`logging`): tracing-based structured logging

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;
pub mod ws;

pub use auth::Credentials;
pub use error::{BxError, Result};
pub use types::*;
