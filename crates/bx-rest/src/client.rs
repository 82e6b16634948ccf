//! Signed REST dispatcher.
//!
//! [`BtcexaClient::call`] is the single place a request is built: it signs
//! the method, absolute URL and merged parameters, then sends the caller's
//! query on the URL and the body as a form for every verb. All calls share one
//! `reqwest::Client` and immutable credentials, so `&self` methods may run
//! concurrently. No retries and no client-side timeout.

use bx_core::auth::Credentials;
use bx_core::config::ClientConfig;
use bx_core::error::{BxError, Result};
use bx_core::time_util::now_ms;
use bx_core::types::{ParamValue, Params, encode_component};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoints::{self, EndpointDef, Placement, Verb};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// BTCEXA REST client.
#[derive(Debug, Clone)]
pub struct BtcexaClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    credentials: Credentials,
    /// API root, without trailing `/`.
    api_url: String,
}

impl BtcexaClient {
    /// Build a client from validated config.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_credentials(config.credentials(), &config.api_url))
    }

    pub fn with_credentials(credentials: Credentials, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            http: reqwest::Client::new(),
            credentials,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL of an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Perform one signed request.
    ///
    /// Only `query` goes on the URL, even though the signature covers `query`
    /// and `body` merged. The JSON response body is returned as-is; a body
    /// that is not JSON is returned as a JSON string. Connection failures and
    /// non-2xx statuses become [`BxError::Transport`].
    pub async fn call(&self, path: &str, method: Verb, query: &Params, body: &Params) -> Result<Value> {
        let url = self.url_for(path);
        let verb = method.as_str();

        debug!(
            payload = %self.credentials.masked_payload(verb, &url, query, body),
            "signing request"
        );
        let signature = self.credentials.sign_request(verb, &url, query, body);
        let form = body.to_query_string();

        let mut request = self
            .http
            .request(method.method(), &url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CONTENT_LENGTH, form.len())
            .header("Apikey", self.credentials.api_key())
            .header("Signature", signature);
        if !query.is_empty() {
            request = request.query(&query.to_pairs());
        }

        let resp = request.body(form).send().await.map_err(|e| transport(verb, &url, e))?;
        let resp = resp.error_for_status().map_err(|e| transport(verb, &url, e))?;
        let text = resp.text().await.map_err(|e| transport(verb, &url, e))?;

        debug!(%url, bytes = text.len(), "response received");
        Ok(match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => Value::String(text),
        })
    }

    /// Run a table endpoint with loosely-typed arguments.
    ///
    /// 1. `prepare` hook (order validation) runs first, before any I/O.
    /// 2. `{name}` path segments are filled from `args` (missing one is a
    ///    validation error).
    /// 3. Defaults fill absent arguments; enum filters normalize or drop.
    /// 4. Remaining arguments go to the query or body per placement.
    /// 5. Stamped endpoints get `timestamp` in the query unless supplied.
    pub async fn dispatch(&self, def: &EndpointDef, args: Params) -> Result<Value> {
        let (path, query, body) = build_request(def, args, now_ms)?;
        self.call(&path, def.verb, &query, &body).await
    }

    /// [`dispatch`](Self::dispatch) by endpoint name.
    pub async fn dispatch_named(&self, name: &str, args: Params) -> Result<Value> {
        let def = endpoints::lookup(name)
            .ok_or_else(|| BxError::Validation(format!("unknown endpoint {name}")))?;
        self.dispatch(def, args).await
    }
}

fn transport(verb: &str, url: &str, err: reqwest::Error) -> BxError {
    warn!(%verb, %url, error = %err, "request failed");
    BxError::Transport(err.to_string())
}

/// Resolve an endpoint definition and arguments into `(path, query, body)`.
pub(crate) fn build_request(
    def: &EndpointDef,
    mut args: Params,
    clock: fn() -> u64,
) -> Result<(String, Params, Params)> {
    // Held back from `prepare`, which only keeps the fields it knows.
    let caller_ts = if def.timestamp { args.remove("timestamp") } else { None };

    let mut args = match def.prepare {
        Some(prepare) => prepare(args)?,
        None => args,
    };

    let path = render_path(def.path, &mut args)?;

    for (key, value) in def.defaults {
        if !args.contains_key(key) {
            args.insert(*key, *value);
        }
    }

    for filter in def.filters {
        let Some(raw) = args.get(filter.field).map(|v| v.to_string()) else { continue };
        match (filter.normalize)(&raw) {
            Some(wire) => {
                args.insert(filter.field, wire);
            }
            None => {
                debug!(endpoint = def.name, field = filter.field, value = %raw, "dropping filter value");
                args.remove(filter.field);
            }
        }
    }

    let mut query = Params::new();
    if def.timestamp {
        let ts = caller_ts.unwrap_or_else(|| ParamValue::UInt(clock()));
        query.insert("timestamp", ts);
    }

    let body = match def.placement {
        Placement::Query => {
            query.extend(args);
            Params::new()
        }
        Placement::Body => args,
    };

    Ok((path, query, body))
}

/// Fill `{name}` segments of `template`, consuming the matching arguments.
fn render_path(template: &str, args: &mut Params) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else { break };
        let name = &rest[open + 1..open + close];
        let value = args.remove(name).ok_or_else(|| BxError::missing_field(name))?;
        out.push_str(&rest[..open]);
        out.push_str(&encode_component(&value.to_string()));
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::*;

    fn fixed_clock() -> u64 {
        1_700_000_000_000
    }

    #[test]
    fn url_joining_trims_slashes() {
        let client = BtcexaClient::with_credentials(Credentials::new("k", "s"), "https://api.example.com/api/");
        assert_eq!(client.url_for("/market/fee"), "https://api.example.com/api/market/fee");
        assert_eq!(client.url_for("market/fee"), "https://api.example.com/api/market/fee");
    }

    #[test]
    fn unstamped_query_endpoint() {
        let args = Params::new().with("trading_pair", "btcusdt");
        let (path, query, body) = build_request(&MARKET_TICKER, args, fixed_clock).unwrap();
        assert_eq!(path, "market/ticker");
        assert_eq!(query.to_query_string(), "trading_pair=btcusdt");
        assert!(body.is_empty());
    }

    #[test]
    fn stamped_endpoint_gets_clock_timestamp() {
        let (_, query, _) = build_request(&BALANCE_LIST, Params::new(), fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "timestamp=1700000000000");
    }

    #[test]
    fn caller_timestamp_wins() {
        let args = Params::new().with("timestamp", 42u64);
        let (_, query, _) = build_request(&BALANCE_LIST, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "timestamp=42");
    }

    #[test]
    fn caller_timestamp_survives_create_order_prepare() {
        let args = Params::new()
            .with("amount", "1")
            .with("order_type", "limit")
            .with("type", "buy")
            .with("pair", "btcusdt")
            .with("rate", "10")
            .with("timestamp", 7u64);
        let (_, query, body) = build_request(&CREATE_ORDER, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "timestamp=7");
        assert!(!body.contains_key("timestamp"));
        assert_eq!(body.to_query_string(), "order_type=LIMIT&price=10&quantity=1&side=BUY&trading_pair=btcusdt");
    }

    #[test]
    fn unstamped_endpoint_passes_timestamp_through() {
        let args = Params::new().with("trading_pair", "btcusdt").with("timestamp", 5u64);
        let (_, query, _) = build_request(&MARKET_TICKER, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "timestamp=5&trading_pair=btcusdt");
    }

    #[test]
    fn body_endpoint_keeps_timestamp_on_query() {
        let args = Params::new().with("trading_pair", "btcusdt").with("ids", "1,2");
        let (path, query, body) = build_request(&CANCEL_ORDER, args, fixed_clock).unwrap();
        assert_eq!(path, "trade/cancel_order");
        assert_eq!(query.to_query_string(), "timestamp=1700000000000");
        assert_eq!(body.to_query_string(), "ids=1%2C2&trading_pair=btcusdt");
    }

    #[test]
    fn path_placeholder_is_filled_and_consumed() {
        let args = Params::new().with("symbol", "btc").with("page", 2u32);
        let (path, query, _) = build_request(&DEPOSIT_LIST_BY_SYMBOL, args, fixed_clock).unwrap();
        assert_eq!(path, "assets/deposit_list/btc");
        assert_eq!(query.to_query_string(), "page=2&timestamp=1700000000000");
    }

    #[test]
    fn missing_path_placeholder_is_validation_error() {
        let err = build_request(&CANCEL_WITHDRAWAL, Params::new(), fixed_clock).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "required field id not found.");
    }

    #[test]
    fn path_value_is_encoded() {
        let args = Params::new().with("id", "a/b");
        let (path, _, _) = build_request(&CANCEL_WITHDRAWAL, args, fixed_clock).unwrap();
        assert_eq!(path, "assets/cancel_withdrawal/a%2Fb");
    }

    #[test]
    fn defaults_fill_missing_limit() {
        let args = Params::new().with("trading_pair", "btcusdt").with("period", "1m");
        let (_, query, _) = build_request(&MARKET_KLINE, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "limit=1440&period=1m&trading_pair=btcusdt");

        let args = Params::new().with("trading_pair", "btcusdt").with("limit", 5u32);
        let (_, query, _) = build_request(&MARKET_TRADE, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "limit=5&trading_pair=btcusdt");
    }

    #[test]
    fn filters_normalize_and_drop() {
        let args = Params::new()
            .with("sort", "asc")
            .with("status", "bogus")
            .with("type", "mT")
            .with("side", "b");
        let (_, query, _) = build_request(&ORDER_LIST, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "side=B&sort=ASC&timestamp=1700000000000&type=Mt");
    }

    #[test]
    fn create_order_is_validated_and_mapped() {
        let args = Params::new()
            .with("amount", "1")
            .with("order_type", "market")
            .with("type", "sell")
            .with("pair", "btcusdt");
        let (_, query, body) = build_request(&CREATE_ORDER, args, fixed_clock).unwrap();
        assert_eq!(query.to_query_string(), "timestamp=1700000000000");
        assert_eq!(body.to_query_string(), "order_type=MARKET&quantity=1&side=SELL&trading_pair=btcusdt");

        let err = build_request(&CREATE_ORDER, Params::new(), fixed_clock).unwrap_err();
        assert_eq!(err.to_string(), "required field amount not found.");
    }
}
