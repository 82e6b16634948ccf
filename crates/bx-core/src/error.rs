//! Typed error definitions for the BTCEXA client.
//!
//! [`BxError`] separates failures the caller can act on (a missing order
//! field, a bad config URL) from transport failures reported by the HTTP or
//! WebSocket layer. Nothing in the workspace retries on any variant; every
//! error goes straight back to the immediate caller.

use thiserror::Error;

/// Domain-specific errors for the BTCEXA client.
#[derive(Debug, Error)]
pub enum BxError {
    /// A required request field is missing or holds a rejected value.
    ///
    /// Raised synchronously, before any network I/O.
    #[error("{0}")]
    Validation(String),

    /// Network or HTTP status failure, carrying the underlying message.
    #[error("transport error: {0}")]
    Transport(String),

    /// A parameter value cannot be rendered as a scalar string.
    #[error("param error: {0}")]
    Param(String),

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// WebSocket connection, handshake, or read error.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// JSON encode/decode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BxError {
    /// Validation error for a required field that was not supplied.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("required field {field} not found."))
    }

    /// Returns `true` for errors raised before any request left the process.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, BxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_the_field() {
        let err = BxError::missing_field("amount");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "required field amount not found.");
    }

    #[test]
    fn transport_is_not_validation() {
        let err = BxError::Transport("connection refused".into());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
