//! Public market data endpoints.
//!
//! | Operation        | Method | Path                   |
//! |------------------|--------|------------------------|
//! | Fee schedule     | GET    | `market/fee`           |
//! | Candles          | GET    | `market/kline`         |
//! | Ticker           | GET    | `market/ticker`        |
//! | Recent trades    | GET    | `market/trade`         |
//! | Trading pairs    | GET    | `market/trading_pairs` |
//! | Order book depth | GET    | `market/depth`         |

use bx_core::error::Result;
use bx_core::types::Params;
use serde_json::Value;

use crate::client::BtcexaClient;
use crate::endpoints;

impl BtcexaClient {
    pub async fn market_fee(&self) -> Result<Value> {
        self.dispatch(&endpoints::MARKET_FEE, Params::new()).await
    }

    /// Candles for `trading_pair`; `limit` defaults to 1440.
    pub async fn market_kline(&self, trading_pair: &str, period: &str, limit: Option<u32>) -> Result<Value> {
        let args = Params::new()
            .with("trading_pair", trading_pair)
            .with("period", period)
            .with_opt("limit", limit);
        self.dispatch(&endpoints::MARKET_KLINE, args).await
    }

    pub async fn market_ticker(&self, trading_pair: &str) -> Result<Value> {
        self.dispatch(&endpoints::MARKET_TICKER, Params::new().with("trading_pair", trading_pair))
            .await
    }

    /// Recent trades for `trading_pair`; `limit` defaults to 20.
    pub async fn market_trade(&self, trading_pair: &str, limit: Option<u32>) -> Result<Value> {
        let args = Params::new().with("trading_pair", trading_pair).with_opt("limit", limit);
        self.dispatch(&endpoints::MARKET_TRADE, args).await
    }

    pub async fn market_trading_pairs(&self) -> Result<Value> {
        self.dispatch(&endpoints::MARKET_TRADING_PAIRS, Params::new()).await
    }

    /// Order book depth. Only the timestamp is sent.
    pub async fn market_depth(&self, timestamp: Option<u64>) -> Result<Value> {
        self.dispatch(&endpoints::MARKET_DEPTH, Params::new().with_opt("timestamp", timestamp))
            .await
    }
}
