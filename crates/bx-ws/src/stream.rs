//! Market and private order subscriptions.
//!
//! Each subscription opens its own socket, sends its frame(s) once the socket
//! is open, and hands every decoded frame to the caller's handler. The
//! returned [`SocketHandle`] owns the connection.
//!
//! | Subscription   | Socket | Frame                                          |
//! |----------------|--------|------------------------------------------------|
//! | All tickers    | market | `sub.market.all.ticker`                        |
//! | Candles        | market | `sub.market.<p>.kline\|{"period","limit"}`     |
//! | Depth          | market | `sub.market.<p>.depth\|{"limit"}`              |
//! | Trades         | market | `sub.market.<p>.trade\|{"limit"}`              |
//! | Active orders  | trade  | auth frame, then `sub.trade.<p>.order\|{"status"}` |

use std::sync::Arc;

use bx_core::auth::Credentials;
use bx_core::config::ClientConfig;
use bx_core::error::Result;
use bx_core::time_util::now_ms;
use bx_core::ws::{OnOpenCallback, SocketCallbacks, SocketHandle, SocketSender, connect_socket};
use serde_json::Value;
use tracing::{debug, info};

use crate::channels::{self, KlineArgs, LimitArgs, OrderStatusArgs};

pub const DEFAULT_KLINE_PERIOD: &str = "1m";
pub const DEFAULT_LIMIT: u32 = 10;

/// Opens BTCEXA subscriptions.
#[derive(Clone)]
pub struct StreamClient {
    credentials: Credentials,
    market_url: String,
    trade_url: String,
    callbacks: SocketCallbacks,
}

impl StreamClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_urls(config.credentials(), &config.ws_market_url, &config.ws_trade_url))
    }

    pub fn with_urls(
        credentials: Credentials,
        market_url: impl Into<String>,
        trade_url: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            market_url: market_url.into(),
            trade_url: trade_url.into(),
            callbacks: SocketCallbacks::default(),
        }
    }

    /// Error/close callbacks applied to every socket opened afterwards.
    pub fn with_callbacks(mut self, callbacks: SocketCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn market_url(&self) -> &str {
        &self.market_url
    }

    pub fn trade_url(&self) -> &str {
        &self.trade_url
    }

    pub fn market_ticker<F>(&self, handler: F) -> Result<SocketHandle>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        Ok(self.subscribe(&self.market_url, vec![channels::MARKET_ALL_TICKER.to_string()], handler))
    }

    /// Candles; `period` defaults to `1m`, `limit` to 10.
    pub fn market_kline<F>(
        &self,
        handler: F,
        pair: &str,
        period: Option<&str>,
        limit: Option<u32>,
    ) -> Result<SocketHandle>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let args = KlineArgs {
            period: period.unwrap_or(DEFAULT_KLINE_PERIOD),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        };
        let frame = channels::request_frame(&channels::market_kline(pair), &args)?;
        Ok(self.subscribe(&self.market_url, vec![frame], handler))
    }

    pub fn market_depth<F>(&self, handler: F, pair: &str, limit: Option<u32>) -> Result<SocketHandle>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let args = LimitArgs { limit: limit.unwrap_or(DEFAULT_LIMIT) };
        let frame = channels::request_frame(&channels::market_depth(pair), &args)?;
        Ok(self.subscribe(&self.market_url, vec![frame], handler))
    }

    pub fn market_trade<F>(&self, handler: F, pair: &str, limit: Option<u32>) -> Result<SocketHandle>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let args = LimitArgs { limit: limit.unwrap_or(DEFAULT_LIMIT) };
        let frame = channels::request_frame(&channels::market_trade(pair), &args)?;
        Ok(self.subscribe(&self.market_url, vec![frame], handler))
    }

    /// Private order updates for `pair` filtered by `status`.
    ///
    /// Authenticates on open with a frame signed for `timestamp` (now by
    /// default), then subscribes.
    pub fn active_orders<F>(
        &self,
        handler: F,
        pair: &str,
        status: &str,
        timestamp: Option<u64>,
    ) -> Result<SocketHandle>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let timestamp = timestamp.unwrap_or_else(now_ms);
        let auth = self.credentials.socket_auth_frame(&self.trade_url, timestamp)?;
        let subscribe = channels::request_frame(&channels::trade_order(pair), &OrderStatusArgs { status })?;
        Ok(self.subscribe(&self.trade_url, vec![auth, subscribe], handler))
    }

    fn subscribe<F>(&self, url: &str, frames: Vec<String>, handler: F) -> SocketHandle
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        info!(%url, frames = frames.len(), "opening subscription");
        let on_open: OnOpenCallback = Arc::new(move |sender: &SocketSender| {
            for frame in &frames {
                if !sender.send(frame.clone()) {
                    debug!(url = sender.url(), "subscription frame not sent");
                }
            }
        });
        connect_socket(url, Arc::new(handler), Some(on_open), self.callbacks.clone())
    }
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("credentials", &self.credentials)
            .field("market_url", &self.market_url)
            .field("trade_url", &self.trade_url)
            .finish()
    }
}
