//! Configuration parsing for the BTCEXA client.
//!
//! The runner reads one JSON file holding logging metadata and the client
//! block (credentials plus endpoint origins). Omitted URLs fall back to the
//! production endpoints.
//!
//! # Example config
//!
//! ```json
//! {
//!   "runner": { "module_name": "bx-runner", "log_path": "/tmp/log" },
//!   "client": {
//!     "api_key": "...",
//!     "api_secret": "...",
//!     "api_url": "https://api.btcexa.com/api",
//!     "ws_market_url": "wss://ws.btcexa.com/api/market/ws",
//!     "ws_trade_url": "wss://ws.btcexa.com/api/trade/ws"
//!   }
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::auth::Credentials;
use crate::error::{BxError, Result};

pub const DEFAULT_API_URL: &str = "https://api.btcexa.com/api";
pub const DEFAULT_WS_MARKET_URL: &str = "wss://ws.btcexa.com/api/market/ws";
pub const DEFAULT_WS_TRADE_URL: &str = "wss://ws.btcexa.com/api/trade/ws";

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Logging metadata (name, log path).
    pub runner: Option<RunnerMeta>,

    pub client: ClientConfig,
}

impl AppConfig {
    /// Module name used as the log file prefix.
    pub fn module_name(&self) -> String {
        self.runner
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "bx-runner".to_string())
    }

    pub fn log_path(&self) -> Option<String> {
        self.runner.as_ref().and_then(|m| m.log_path.clone())
    }
}

/// Runner metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

/// Credentials and endpoint origins for one BTCEXA account.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_secret: String,

    /// REST base URL; endpoint paths are appended after a `/`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Public market-data socket.
    #[serde(default = "default_ws_market_url")]
    pub ws_market_url: String,

    /// Private trade socket (requires the auth frame).
    #[serde(default = "default_ws_trade_url")]
    pub ws_trade_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_ws_market_url() -> String {
    DEFAULT_WS_MARKET_URL.to_string()
}

fn default_ws_trade_url() -> String {
    DEFAULT_WS_TRADE_URL.to_string()
}

impl ClientConfig {
    /// Config pointing at the production endpoints.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_url: default_api_url(),
            ws_market_url: default_ws_market_url(),
            ws_trade_url: default_ws_trade_url(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_ws_urls(mut self, market: impl Into<String>, trade: impl Into<String>) -> Self {
        self.ws_market_url = market.into();
        self.ws_trade_url = trade.into();
        self
    }

    /// Reject an empty API key and URLs with the wrong scheme.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(BxError::Config("api_key must not be empty".into()));
        }
        check_scheme("api_url", &self.api_url, &["http", "https"])?;
        check_scheme("ws_market_url", &self.ws_market_url, &["ws", "wss"])?;
        check_scheme("ws_trade_url", &self.ws_trade_url, &["ws", "wss"])?;
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_key, &self.api_secret)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("api_url", &self.api_url)
            .field("ws_market_url", &self.ws_market_url)
            .field("ws_trade_url", &self.ws_trade_url)
            .finish()
    }
}

fn check_scheme(field: &str, raw: &str, allowed: &[&str]) -> Result<()> {
    let parsed = Url::parse(raw).map_err(|e| BxError::Config(format!("{field}: {e}")))?;
    if !allowed.contains(&parsed.scheme()) {
        return Err(BxError::Config(format!(
            "{field}: scheme must be one of {allowed:?}, got {:?}",
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Load config from a JSON file.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_default_to_production() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"client":{"api_key":"k","api_secret":"s"}}"#).unwrap();
        assert_eq!(cfg.client.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.client.ws_market_url, DEFAULT_WS_MARKET_URL);
        assert_eq!(cfg.client.ws_trade_url, DEFAULT_WS_TRADE_URL);
        assert_eq!(cfg.module_name(), "bx-runner");
        assert!(cfg.log_path().is_none());
        assert!(cfg.client.validate().is_ok());
    }

    #[test]
    fn runner_block_is_read() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"runner":{"module_name":"bx","log_path":"/tmp/log"},
                "client":{"api_key":"k","api_secret":"s","api_url":"http://localhost:8080/api"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.module_name(), "bx");
        assert_eq!(cfg.log_path().as_deref(), Some("/tmp/log"));
        assert_eq!(cfg.client.api_url, "http://localhost:8080/api");
    }

    #[test]
    fn validate_rejects_bad_scheme() {
        let cfg = ClientConfig::new("k", "s").with_api_url("ftp://api.btcexa.com/api");
        assert!(matches!(cfg.validate(), Err(BxError::Config(_))));

        let cfg = ClientConfig::new("k", "s")
            .with_ws_urls("https://ws.btcexa.com/api/market/ws", DEFAULT_WS_TRADE_URL);
        assert!(matches!(cfg.validate(), Err(BxError::Config(_))));
    }

    #[test]
    fn validate_rejects_empty_key() {
        let cfg = ClientConfig::new("  ", "s");
        assert!(matches!(cfg.validate(), Err(BxError::Config(_))));
    }

    #[test]
    fn validate_rejects_unparseable_url() {
        let cfg = ClientConfig::new("k", "s").with_api_url("not a url");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let shown = format!("{:?}", ClientConfig::new("k", "hunter2"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn load_config_reads_file() {
        let path = std::env::temp_dir().join(format!("bx-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"client":{"api_key":"k","api_secret":"s"}}"#).unwrap();
        let cfg = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.client.credentials().api_key(), "k");
    }

    #[test]
    fn load_config_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/bx-config.json")).is_err());
    }
}
