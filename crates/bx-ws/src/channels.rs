//! Subscription channel names and frame encoding.
//!
//! A subscription frame is `<channel>|<json args>`; the all-market ticker is
//! sent as the bare channel name.

use bx_core::error::Result;
use serde::Serialize;

pub const MARKET_ALL_TICKER: &str = "sub.market.all.ticker";

pub fn market_trade(pair: &str) -> String {
    format!("sub.market.{pair}.trade")
}

pub fn market_depth(pair: &str) -> String {
    format!("sub.market.{pair}.depth")
}

pub fn market_kline(pair: &str) -> String {
    format!("sub.market.{pair}.kline")
}

/// Private order updates (trade socket).
pub fn trade_order(pair: &str) -> String {
    format!("sub.trade.{pair}.order")
}

/// Encode `<channel>|<json args>`.
pub fn request_frame<T: Serialize + ?Sized>(channel: &str, args: &T) -> Result<String> {
    Ok(format!("{channel}|{}", serde_json::to_string(args)?))
}

#[derive(Debug, Clone, Serialize)]
pub struct KlineArgs<'a> {
    pub period: &'a str,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitArgs {
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusArgs<'a> {
    pub status: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names() {
        assert_eq!(market_trade("btcusdt"), "sub.market.btcusdt.trade");
        assert_eq!(market_depth("ethusdt"), "sub.market.ethusdt.depth");
        assert_eq!(market_kline("btcusdt"), "sub.market.btcusdt.kline");
        assert_eq!(trade_order("btcusdt"), "sub.trade.btcusdt.order");
    }

    #[test]
    fn builders_are_pure() {
        assert_eq!(market_kline("x"), market_kline("x"));
    }

    #[test]
    fn frames_keep_argument_order() {
        let frame = request_frame(&market_kline("btcusdt"), &KlineArgs { period: "1m", limit: 10 }).unwrap();
        assert_eq!(frame, r#"sub.market.btcusdt.kline|{"period":"1m","limit":10}"#);

        let frame = request_frame(&trade_order("btcusdt"), &OrderStatusArgs { status: "NEW" }).unwrap();
        assert_eq!(frame, r#"sub.trade.btcusdt.order|{"status":"NEW"}"#);
    }

    #[test]
    fn frame_from_json_value() {
        let frame = request_frame("sub.market.btcusdt.depth", &serde_json::json!({"limit": 5})).unwrap();
        assert_eq!(frame, r#"sub.market.btcusdt.depth|{"limit":5}"#);
    }
}
