//! BTCEXA credentials and request signing.
//!
//! BTCEXA signs with a plain SHA-256 digest (no HMAC). The secret is appended
//! to the signing payload and never sent:
//!
//! ```text
//! REST:   sha256(UPPER(method) \n full_url \n canonical_params \n secret)
//! Socket: sha256("GET" \n ws_url \n timestamp \n secret)
//! ```
//!
//! `canonical_params` is the query and body parameters merged (body wins),
//! sorted by key and rendered as a URL query string without the leading `?`.
//! The exchange recomputes the same string server-side, so rendering must be
//! deterministic.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::types::Params;

/// Render the canonical parameter string used as signature input.
pub fn canonicalize(query: &Params, body: &Params) -> String {
    query.merged(body).to_query_string()
}

/// Lowercase hex SHA-256 of `payload`.
pub fn digest(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Build the exact string that gets hashed for a REST request.
pub fn signing_payload(
    method: &str,
    full_url: &str,
    query: &Params,
    body: &Params,
    secret: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        full_url,
        canonicalize(query, body),
        secret
    )
}

/// Compute the REST request signature.
///
/// # Arguments
///
/// * `method`: HTTP verb, any case (upper-cased before hashing).
/// * `full_url`: absolute request URL without the query string.
/// * `query`, `body`: the request's parameter maps.
/// * `secret`: the API secret.
///
/// # Example
///
/// ```ignore
/// let q = Params::new().with("trading_pair", "btcusdt");
/// let sig = sign("GET", "https://api.btcexa.com/api/market/ticker", &q, &Params::new(), "s3cr3t");
/// assert_eq!(sig.len(), 64);
/// ```
pub fn sign(method: &str, full_url: &str, query: &Params, body: &Params, secret: &str) -> String {
    digest(&signing_payload(method, full_url, query, body, secret))
}

/// Signature for the private-channel socket authentication frame.
pub fn socket_signature(ws_url: &str, timestamp: u64, secret: &str) -> String {
    digest(&format!("GET\n{ws_url}\n{timestamp}\n{secret}"))
}

/// Authentication frame sent first on the trade socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocketAuth<'a> {
    pub apikey: &'a str,
    pub signature: String,
    pub timestamp: u64,
}

/// API key + secret pair, immutable once built.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), api_secret: api_secret.into() }
    }

    /// The public API key (sent as the `Apikey` header).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a REST request with the held secret.
    pub fn sign_request(&self, method: &str, full_url: &str, query: &Params, body: &Params) -> String {
        sign(method, full_url, query, body, &self.api_secret)
    }

    /// The signing payload with the secret replaced by `***`, for logging.
    pub fn masked_payload(&self, method: &str, full_url: &str, query: &Params, body: &Params) -> String {
        signing_payload(method, full_url, query, body, "***")
    }

    /// JSON authentication frame for the trade socket at `ws_url`.
    pub fn socket_auth_frame(&self, ws_url: &str, timestamp: u64) -> Result<String> {
        let auth = SocketAuth {
            apikey: &self.api_key,
            signature: socket_signature(ws_url, timestamp, &self.api_secret),
            timestamp,
        };
        Ok(serde_json::to_string(&auth)?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}
