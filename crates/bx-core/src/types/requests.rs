//! Typed request shapes for the BTCEXA REST endpoints that take more than a
//! couple of arguments.
//!
//! List queries derive `Serialize` so they flatten into [`Params`] via
//! [`Params::from_serialize`]; `None` fields never reach the wire.

use serde::{Deserialize, Serialize};

use super::enums::{
    DealSide, OrderKind, OrderSide, OrderStatusFilter, OrderType, SortDirection,
    deserialize_lenient,
};
use super::params::Params;
use crate::error::{BxError, Result};

// ---------------------------------------------------------------------------
// Order creation
// ---------------------------------------------------------------------------

/// Caller-facing order creation input.
///
/// Every field is optional so that a partially-filled request (e.g. decoded
/// from JSON) can be rejected by [`validate`](Self::validate) with a message
/// naming the missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Order quantity.
    pub amount: Option<String>,
    /// `LIMIT` or `MARKET` (any case).
    pub order_type: Option<String>,
    /// `BUY` or `SELL` (any case).
    #[serde(rename = "type")]
    pub side: Option<String>,
    /// Trading pair, e.g. `btcusdt`.
    pub pair: Option<String>,
    /// Limit price.
    pub rate: Option<String>,
}

impl CreateOrderRequest {
    pub fn new(
        pair: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            amount: Some(amount.into()),
            order_type: Some(order_type.as_str().to_string()),
            side: Some(side.as_str().to_string()),
            pair: Some(pair.into()),
            rate: None,
        }
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    /// Check required fields (`amount`, `order_type`, `type`, `pair`, in that
    /// order) and the order type / side allow-lists.
    pub fn validate(&self) -> Result<ValidatedOrder> {
        let amount = self.amount.as_ref().ok_or_else(|| BxError::missing_field("amount"))?;
        let order_type =
            self.order_type.as_ref().ok_or_else(|| BxError::missing_field("order_type"))?;
        let side = self.side.as_ref().ok_or_else(|| BxError::missing_field("type"))?;
        let pair = self.pair.as_ref().ok_or_else(|| BxError::missing_field("pair"))?;

        Ok(ValidatedOrder {
            quantity: amount.clone(),
            order_type: order_type.parse()?,
            side: side.parse()?,
            trading_pair: pair.clone(),
            price: self.rate.clone(),
        })
    }
}

/// An order that passed validation, in exchange field names.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub quantity: String,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub trading_pair: String,
    pub price: Option<String>,
}

impl ValidatedOrder {
    /// Form body for `trade/create_order`.
    ///
    /// `order_type` and `side` are sent upper-cased.
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("quantity", &self.quantity)
            .with("order_type", self.order_type.as_str())
            .with("side", self.side.as_str())
            .with("trading_pair", &self.trading_pair)
            .with_opt("price", self.price.as_ref())
    }
}

// ---------------------------------------------------------------------------
// List queries
// ---------------------------------------------------------------------------

/// Filters for `trade/deal_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealListQuery {
    #[serde(default, deserialize_with = "deserialize_lenient", skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_pair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient", skip_serializing_if = "Option::is_none")]
    pub side: Option<DealSide>,
}

/// Filters for `trade/order_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderListQuery {
    #[serde(default, deserialize_with = "deserialize_lenient", skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_pair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatusFilter>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<OrderKind>,
    #[serde(default, deserialize_with = "deserialize_lenient", skip_serializing_if = "Option::is_none")]
    pub side: Option<DealSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_empty_orders: Option<bool>,
}

/// Filters for `assets/deposit_list` and `assets/withdrawal_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Plain pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Withdrawals
// ---------------------------------------------------------------------------

/// Body of `assets/create_withdrawal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub symbol: String,
    pub address: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Body of `assets/create_withdrawal_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWithdrawalAddressRequest {
    pub symbol: String,
    pub address: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_first_missing_field() {
        let req = CreateOrderRequest {
            order_type: Some("LIMIT".into()),
            side: Some("BUY".into()),
            pair: Some("btcusdt".into()),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "required field amount not found.");

        let req = CreateOrderRequest { amount: Some("1".into()), ..Default::default() };
        assert_eq!(req.validate().unwrap_err().to_string(), "required field order_type not found.");
    }

    #[test]
    fn validate_accepts_either_order_type() {
        for ty in ["LIMIT", "market"] {
            let req = CreateOrderRequest {
                amount: Some("1".into()),
                order_type: Some(ty.into()),
                side: Some("sell".into()),
                pair: Some("btcusdt".into()),
                rate: None,
            };
            assert!(req.validate().is_ok(), "{ty} should be accepted");
        }
    }

    #[test]
    fn or_joined_inequality_would_reject_every_value() {
        // `t != "LIMIT" || t != "MARKET"` holds for any t, so used as a
        // rejection guard it refuses valid input too. The allow-list does not.
        let or_guard = |t: &str| t != "LIMIT" || t != "MARKET";
        for t in ["LIMIT", "MARKET", "STOP", ""] {
            assert!(or_guard(t));
        }
        assert!("LIMIT".parse::<OrderType>().is_ok());
        assert!("STOP".parse::<OrderType>().is_err());
    }

    #[test]
    fn validate_rejects_unknown_order_type_and_side() {
        let mut req = CreateOrderRequest::new("btcusdt", OrderSide::Buy, OrderType::Limit, "1");
        req.order_type = Some("STOP".into());
        assert!(req.validate().unwrap_err().is_validation());

        let mut req = CreateOrderRequest::new("btcusdt", OrderSide::Buy, OrderType::Limit, "1");
        req.side = Some("HOLD".into());
        assert!(req.validate().unwrap_err().is_validation());
    }

    #[test]
    fn validated_order_maps_to_wire_names() {
        let order = CreateOrderRequest::new("btcusdt", OrderSide::Sell, OrderType::Limit, "0.5")
            .with_rate("30000")
            .validate()
            .unwrap();
        assert_eq!(
            order.to_params().to_query_string(),
            "order_type=LIMIT&price=30000&quantity=0.5&side=SELL&trading_pair=btcusdt"
        );
    }

    #[test]
    fn market_order_omits_price() {
        let order = CreateOrderRequest::new("ethusdt", OrderSide::Buy, OrderType::Market, "2")
            .validate()
            .unwrap();
        assert!(!order.to_params().contains_key("price"));
    }

    #[test]
    fn create_order_deserializes_type_field() {
        let req: CreateOrderRequest = serde_json::from_str(
            r#"{"amount":"1","order_type":"limit","type":"buy","pair":"btcusdt","rate":"10"}"#,
        )
        .unwrap();
        assert_eq!(req.side.as_deref(), Some("buy"));
        assert_eq!(req.validate().unwrap().side, OrderSide::Buy);
    }

    #[test]
    fn order_list_drops_invalid_filters() {
        let q: OrderListQuery = serde_json::from_str(
            r#"{"sort":"asc","status":"filled","type":"mt","side":"x","limit":50}"#,
        )
        .unwrap();
        let params = Params::from_serialize(&q).unwrap();
        assert_eq!(params.to_query_string(), "limit=50&sort=ASC&type=Mt");
    }

    #[test]
    fn deal_list_serializes_only_present_fields() {
        let q = DealListQuery {
            sort: Some(SortDirection::Desc),
            trading_pair: Some("btcusdt".into()),
            side: Some(DealSide::Ask),
            ..Default::default()
        };
        let params = Params::from_serialize(&q).unwrap();
        assert_eq!(params.to_query_string(), "side=A&sort=DESC&trading_pair=btcusdt");
    }
}
