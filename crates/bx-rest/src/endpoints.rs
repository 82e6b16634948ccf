//! Declarative BTCEXA REST endpoint table.
//!
//! Every public REST operation is one [`EndpointDef`]: verb, path template,
//! whether the request is stamped with a millisecond `timestamp`, and where the
//! caller's arguments go (URL query or form body). [`BtcexaClient::dispatch`]
//! interprets a definition, so the typed wrappers and the CLI share one code
//! path.
//!
//! [`BtcexaClient::dispatch`]: crate::client::BtcexaClient::dispatch

use std::fmt;
use std::str::FromStr;

use bx_core::error::{BxError, Result};
use bx_core::types::{
    CreateOrderRequest, DealSide, FilterValue, OrderKind, OrderStatusFilter, Params, SortDirection,
};

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    pub(crate) fn method(&self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = BxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(BxError::Validation(format!("unsupported HTTP method {other}"))),
        }
    }
}

/// Where an endpoint's arguments are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Query,
    Body,
}

/// An enum-constrained optional argument.
///
/// `normalize` maps a raw value to its wire form, or `None` to drop it.
#[derive(Clone, Copy)]
pub struct Filter {
    pub field: &'static str,
    pub normalize: fn(&str) -> Option<&'static str>,
}

impl Filter {
    const fn of<T: FilterValue>() -> Self {
        Self { field: T::FIELD, normalize: T::normalize }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("field", &self.field).finish()
    }
}

/// Rewrites caller arguments into wire fields, failing before any I/O.
pub type Prepare = fn(Params) -> Result<Params>;

/// One REST endpoint.
#[derive(Debug)]
pub struct EndpointDef {
    /// Stable identifier, also used by the CLI.
    pub name: &'static str,
    pub verb: Verb,
    /// Path relative to the API root; `{name}` segments are filled from the
    /// arguments.
    pub path: &'static str,
    /// Add `timestamp=<now ms>` to the query unless the caller supplied one.
    pub timestamp: bool,
    pub placement: Placement,
    /// Values used when the caller leaves an argument out.
    pub defaults: &'static [(&'static str, &'static str)],
    pub filters: &'static [Filter],
    pub prepare: Option<Prepare>,
    pub summary: &'static str,
}

impl EndpointDef {
    /// Names of the `{..}` placeholders in the path template.
    pub fn path_params(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else { break };
            out.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        out
    }
}

const LIST_FILTERS: &[Filter] = &[Filter::of::<SortDirection>(), Filter::of::<DealSide>()];

const ORDER_LIST_FILTERS: &[Filter] = &[
    Filter::of::<SortDirection>(),
    Filter::of::<OrderStatusFilter>(),
    Filter::of::<OrderKind>(),
    Filter::of::<DealSide>(),
];

/// Validate caller-facing order fields (`amount`, `order_type`, `type`,
/// `pair`, `rate`) and map them to the exchange's names.
fn prepare_create_order(args: Params) -> Result<Params> {
    let field = |name: &str| args.get(name).map(|v| v.to_string());
    let request = CreateOrderRequest {
        amount: field("amount"),
        order_type: field("order_type"),
        side: field("type"),
        pair: field("pair"),
        rate: field("rate"),
    };
    Ok(request.validate()?.to_params())
}

/// Field values shared by most endpoints.
const BASE: EndpointDef = EndpointDef {
    name: "",
    verb: Verb::Get,
    path: "",
    timestamp: false,
    placement: Placement::Query,
    defaults: &[],
    filters: &[],
    prepare: None,
    summary: "",
};

macro_rules! endpoint {
    ($ident:ident, $name:literal, $verb:ident, $path:literal, stamped: $ts:literal, $placement:ident, $summary:literal $(, $key:ident: $val:expr)* $(,)?) => {
        pub static $ident: EndpointDef = EndpointDef {
            name: $name,
            verb: Verb::$verb,
            path: $path,
            timestamp: $ts,
            placement: Placement::$placement,
            summary: $summary,
            $($key: $val,)*
            ..BASE
        };
    };
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

endpoint!(MARKET_FEE, "market_fee", Get, "market/fee", stamped: false, Query, "trading fee schedule");
endpoint!(
    MARKET_KLINE, "market_kline", Get, "market/kline", stamped: false, Query,
    "candles for trading_pair over period",
    defaults: &[("limit", "1440")],
);
endpoint!(MARKET_TICKER, "market_ticker", Get, "market/ticker", stamped: false, Query, "ticker for trading_pair");
endpoint!(
    MARKET_TRADE, "market_trade", Get, "market/trade", stamped: false, Query,
    "recent trades for trading_pair",
    defaults: &[("limit", "20")],
);
endpoint!(
    MARKET_TRADING_PAIRS, "market_trading_pairs", Get, "market/trading_pairs", stamped: false, Query,
    "listed trading pairs"
);
endpoint!(MARKET_DEPTH, "market_depth", Get, "market/depth", stamped: true, Query, "order book depth");

// ---------------------------------------------------------------------------
// Trade
// ---------------------------------------------------------------------------

endpoint!(
    CREATE_ORDER, "create_order", Post, "trade/create_order", stamped: true, Body,
    "place an order (amount, order_type, type, pair, rate)",
    prepare: Some(prepare_create_order),
);
endpoint!(
    ACTIVE_ORDER_LIST, "active_order_list", Get, "trade/active_order_list", stamped: true, Query,
    "open orders for trading_pair"
);
endpoint!(
    CANCEL_ORDER, "cancel_order", Get, "trade/cancel_order", stamped: true, Body,
    "cancel orders by ids on trading_pair"
);
endpoint!(
    DEAL_LIST, "deal_list", Get, "trade/deal_list", stamped: true, Query, "filled deals",
    filters: LIST_FILTERS,
);
endpoint!(
    ORDER_DEAL, "order_deal", Get, "trader/order_deal", stamped: true, Query,
    "deals of one order (order_id, trading_pair)"
);
endpoint!(
    ORDER_LIST, "order_list", Get, "trade/order_list", stamped: true, Query, "order history",
    filters: ORDER_LIST_FILTERS,
);

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

endpoint!(BALANCE_LIST, "balance_list", Get, "assets/balance_list", stamped: true, Query, "account balances");
endpoint!(
    CANCEL_WITHDRAWAL, "cancel_withdrawal", Get, "assets/cancel_withdrawal/{id}", stamped: true, Query,
    "cancel a pending withdrawal"
);
endpoint!(
    CREATE_WITHDRAWAL, "create_withdrawal", Post, "assets/create_withdrawal", stamped: true, Body,
    "request a withdrawal (symbol, address, amount, remark)"
);
endpoint!(
    CREATE_WITHDRAWAL_ADDRESS, "create_withdrawal_address", Post, "assets/create_withdrawal_address",
    stamped: true, Body, "save a withdrawal address (symbol, address, name)"
);
endpoint!(
    DELETE_WITHDRAWAL_ADDRESS, "delete_withdrawal_address", Get, "assets/delete_withdrawal_address/{id}",
    stamped: true, Query, "delete a saved withdrawal address"
);
endpoint!(
    DEPOSIT_ADDRESS, "deposit_address", Get, "assets/deposit_address/{symbol}", stamped: true, Query,
    "deposit address for symbol"
);
endpoint!(DEPOSIT_LIST, "deposit_list", Get, "assets/deposit_list", stamped: true, Query, "deposit history");
endpoint!(
    DEPOSIT_LIST_BY_SYMBOL, "deposit_list_by_symbol", Get, "assets/deposit_list/{symbol}", stamped: true,
    Query, "deposit history for symbol"
);
endpoint!(FREEZE_LIST, "freeze_list", Get, "assets/freeze_list", stamped: true, Query, "frozen withdrawals");
endpoint!(
    WITHDRAWAL_ADDRESS_LIST, "withdrawal_address_list", Get, "assets/withdrawal_address_list", stamped: true,
    Query, "saved withdrawal addresses"
);
endpoint!(
    WITHDRAWAL_ADDRESS_LIST_BY_SYMBOL, "withdrawal_address_list_by_symbol", Get,
    "assets/withdrawal_address_list/{symbol}", stamped: true, Query, "saved withdrawal addresses for symbol"
);
endpoint!(
    WITHDRAWAL_LIST, "withdrawal_list", Get, "assets/withdrawal_list", stamped: true, Query, "withdrawal history"
);

/// Every endpoint, in documentation order.
pub static ALL: &[&EndpointDef] = &[
    &MARKET_FEE,
    &MARKET_KLINE,
    &MARKET_TICKER,
    &MARKET_TRADE,
    &MARKET_TRADING_PAIRS,
    &MARKET_DEPTH,
    &CREATE_ORDER,
    &ACTIVE_ORDER_LIST,
    &CANCEL_ORDER,
    &DEAL_LIST,
    &ORDER_DEAL,
    &ORDER_LIST,
    &BALANCE_LIST,
    &CANCEL_WITHDRAWAL,
    &CREATE_WITHDRAWAL,
    &CREATE_WITHDRAWAL_ADDRESS,
    &DELETE_WITHDRAWAL_ADDRESS,
    &DEPOSIT_ADDRESS,
    &DEPOSIT_LIST,
    &DEPOSIT_LIST_BY_SYMBOL,
    &FREEZE_LIST,
    &WITHDRAWAL_ADDRESS_LIST,
    &WITHDRAWAL_ADDRESS_LIST_BY_SYMBOL,
    &WITHDRAWAL_LIST,
];

/// Find an endpoint by name.
pub fn lookup(name: &str) -> Option<&'static EndpointDef> {
    ALL.iter().copied().find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_resolvable() {
        let mut seen = HashSet::new();
        for def in ALL {
            assert!(seen.insert(def.name), "duplicate endpoint {}", def.name);
            assert!(std::ptr::eq(lookup(def.name).unwrap(), *def));
        }
        assert_eq!(ALL.len(), 24);
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn only_public_market_endpoints_are_unstamped() {
        let unstamped: Vec<_> = ALL.iter().filter(|d| !d.timestamp).map(|d| d.name).collect();
        assert_eq!(
            unstamped,
            ["market_fee", "market_kline", "market_ticker", "market_trade", "market_trading_pairs"]
        );
    }

    #[test]
    fn verbs_and_placements() {
        assert_eq!(CREATE_ORDER.verb, Verb::Post);
        assert_eq!(CREATE_ORDER.placement, Placement::Body);
        // cancel is a GET that still carries a form body
        assert_eq!(CANCEL_ORDER.verb, Verb::Get);
        assert_eq!(CANCEL_ORDER.placement, Placement::Body);
        assert_eq!(ORDER_DEAL.path, "trader/order_deal");
    }

    #[test]
    fn path_params_are_extracted() {
        assert_eq!(CANCEL_WITHDRAWAL.path_params(), ["id"]);
        assert_eq!(DEPOSIT_LIST_BY_SYMBOL.path_params(), ["symbol"]);
        assert!(DEPOSIT_LIST.path_params().is_empty());
    }

    #[test]
    fn order_list_filters_normalize() {
        let by_field = |field: &str| ORDER_LIST.filters.iter().find(|f| f.field == field).unwrap();
        assert_eq!((by_field("type").normalize)("lt"), Some("Lt"));
        assert_eq!((by_field("status").normalize)("new"), Some("NEW"));
        assert_eq!((by_field("sort").normalize)("random"), None);
    }

    #[test]
    fn create_order_prepare_maps_fields() {
        let args = Params::new()
            .with("amount", "1")
            .with("order_type", "limit")
            .with("type", "buy")
            .with("pair", "btcusdt")
            .with("rate", "100");
        let wire = prepare_create_order(args).unwrap();
        assert_eq!(
            wire.to_query_string(),
            "order_type=LIMIT&price=100&quantity=1&side=BUY&trading_pair=btcusdt"
        );
    }

    #[test]
    fn create_order_prepare_rejects_missing_amount() {
        let err = prepare_create_order(Params::new().with("pair", "btcusdt")).unwrap_err();
        assert_eq!(err.to_string(), "required field amount not found.");
    }

    #[test]
    fn verb_parses_any_case() {
        assert_eq!("post".parse::<Verb>().unwrap(), Verb::Post);
        assert!("DELETE".parse::<Verb>().is_err());
    }
}
