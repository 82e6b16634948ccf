//! Request parameter model.
//!
//! Every REST call carries two [`Params`] maps, one for the URL query and
//! one for the form body. Keys are kept in a `BTreeMap`, so iteration (and
//! therefore the rendered string fed to the signer) is always in ascending
//! key order no matter how the map was built.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{BxError, Result};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Convert a JSON value into a scalar.
    ///
    /// `null` yields `Ok(None)` (the field is left out). Arrays and objects
    /// cannot be rendered into a flat query string and are rejected.
    pub fn from_json(key: &str, value: serde_json::Value) -> Result<Option<Self>> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(Self::Bool(b))),
            Value::String(s) => Ok(Some(Self::Str(s))),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Some(Self::UInt(u)))
                } else if let Some(i) = n.as_i64() {
                    Ok(Some(Self::Int(i)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Some(Self::Float(f)))
                } else {
                    Err(BxError::Param(format!("{key}: unrepresentable number {n}")))
                }
            }
            Value::Array(_) | Value::Object(_) => Err(BxError::Param(format!(
                "{key}: nested values cannot be sent as a request parameter"
            ))),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Key-ordered parameter map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(key, value);
        self
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of `self` with every entry of `overlay` applied on top.
    ///
    /// On a key collision the overlay value wins.
    pub fn merged(&self, overlay: &Params) -> Params {
        let mut out = self.clone();
        for (k, v) in &overlay.0 {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }

    /// Render as `key=value&key=value` in key order, percent-encoded, with
    /// no leading separator. An empty map renders as `""`.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!("{}={}", encode_component(k), encode_component(&v.to_string()))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `(key, value)` string pairs, for handing to an HTTP builder.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
    }

    /// Flatten a serializable struct into parameters.
    ///
    /// The value must serialize to a JSON object of scalars; `null` fields
    /// are skipped.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Params> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => {
                let mut params = Params::new();
                for (k, v) in map {
                    if let Some(pv) = ParamValue::from_json(&k, v)? {
                        params.0.insert(k, pv);
                    }
                }
                Ok(params)
            }
            serde_json::Value::Null => Ok(Params::new()),
            other => Err(BxError::Param(format!("expected an object of parameters, got {other}"))),
        }
    }
}

/// Percent-encode one query component.
///
/// Leaves `!'()*` literal on top of the RFC 3986 unreserved set, matching the
/// exchange's reference client byte for byte.
pub fn encode_component(raw: &str) -> String {
    let encoded = urlencoding::encode(raw);
    if !encoded.contains("%2") {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<(String, ParamValue)> for Params {
    fn extend<I: IntoIterator<Item = (String, ParamValue)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_ignores_insertion_order() {
        let a = Params::new().with("trading_pair", "btcusdt").with("limit", 20u32).with("a", true);
        let b = Params::new().with("a", true).with("limit", 20u32).with("trading_pair", "btcusdt");
        assert_eq!(a.to_query_string(), b.to_query_string());
        assert_eq!(a.to_query_string(), "a=true&limit=20&trading_pair=btcusdt");
    }

    #[test]
    fn empty_renders_empty() {
        assert_eq!(Params::new().to_query_string(), "");
    }

    #[test]
    fn values_are_percent_encoded() {
        let p = Params::new().with("remark", "a b&c").with("ids", "1,2");
        assert_eq!(p.to_query_string(), "ids=1%2C2&remark=a%20b%26c");
    }

    #[test]
    fn sub_delims_stay_literal() {
        let p = Params::new().with("remark", "rent (june)! it's 50*2");
        assert_eq!(p.to_query_string(), "remark=rent%20(june)!%20it's%2050*2");
        assert_eq!(encode_component("a/b?c=d"), "a%2Fb%3Fc%3Dd");
    }

    #[test]
    fn merged_overlay_wins() {
        let query = Params::new().with("a", 1).with("q", "x");
        let body = Params::new().with("a", 2);
        let merged = query.merged(&body);
        assert_eq!(merged.to_query_string(), "a=2&q=x");
        // originals untouched
        assert_eq!(query.get("a"), Some(&ParamValue::Int(1)));
    }

    #[test]
    fn with_opt_skips_none() {
        let p = Params::new().with_opt("price", None::<String>).with_opt("limit", Some(5u32));
        assert_eq!(p.to_query_string(), "limit=5");
    }

    #[test]
    fn scalar_display() {
        assert_eq!(ParamValue::Float(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::Int(-3).to_string(), "-3");
        assert_eq!(ParamValue::Bool(false).to_string(), "false");
    }

    #[derive(Serialize)]
    struct Withdrawal {
        symbol: String,
        amount: f64,
        remark: Option<String>,
    }

    #[test]
    fn from_serialize_skips_nulls() {
        let w = Withdrawal { symbol: "btc".into(), amount: 0.5, remark: None };
        let p = Params::from_serialize(&w).unwrap();
        assert_eq!(p.to_query_string(), "amount=0.5&symbol=btc");
    }

    #[test]
    fn from_serialize_rejects_nested() {
        let v = serde_json::json!({ "ids": [1, 2] });
        let err = Params::from_serialize(&v).unwrap_err();
        assert!(matches!(err, BxError::Param(_)));
    }
}
