//! Order management endpoints (signed, timestamped).
//!
//! | Operation      | Method | Path                      |
//! |----------------|--------|---------------------------|
//! | Create order   | POST   | `trade/create_order`      |
//! | Active orders  | GET    | `trade/active_order_list` |
//! | Cancel orders  | GET    | `trade/cancel_order`      |
//! | Deal list      | GET    | `trade/deal_list`         |
//! | Deals of order | GET    | `trader/order_deal`       |
//! | Order list     | GET    | `trade/order_list`        |
//!
//! `trader/order_deal` is the path the exchange actually serves.

use bx_core::error::Result;
use bx_core::types::{CreateOrderRequest, DealListQuery, OrderListQuery, Params};
use serde_json::Value;
use tracing::info;

use crate::client::BtcexaClient;
use crate::endpoints;

impl BtcexaClient {
    /// Place an order.
    ///
    /// Fails with a validation error, without touching the network, when a
    /// required field is missing or the order type / side is not allowed.
    pub async fn create_order(&self, order: &CreateOrderRequest, timestamp: Option<u64>) -> Result<Value> {
        let validated = order.validate()?;
        info!(
            pair = %validated.trading_pair,
            side = %validated.side,
            order_type = %validated.order_type,
            quantity = %validated.quantity,
            "placing order"
        );
        let args = Params::from_serialize(order)?.with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::CREATE_ORDER, args).await
    }

    pub async fn active_order_list(&self, trading_pair: &str, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::new().with("trading_pair", trading_pair).with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::ACTIVE_ORDER_LIST, args).await
    }

    /// Cancel orders; `ids` is the exchange's comma-separated id list.
    ///
    /// Sent as a GET carrying a form body.
    pub async fn cancel_order(&self, trading_pair: &str, ids: &str, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::new()
            .with("trading_pair", trading_pair)
            .with("ids", ids)
            .with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::CANCEL_ORDER, args).await
    }

    pub async fn deal_list(&self, query: &DealListQuery, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::from_serialize(query)?.with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::DEAL_LIST, args).await
    }

    pub async fn order_deal(&self, order_id: u64, trading_pair: &str, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::new()
            .with("order_id", order_id)
            .with("trading_pair", trading_pair)
            .with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::ORDER_DEAL, args).await
    }

    pub async fn order_list(&self, query: &OrderListQuery, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::from_serialize(query)?.with_opt("timestamp", timestamp);
        self.dispatch(&endpoints::ORDER_LIST, args).await
    }
}
