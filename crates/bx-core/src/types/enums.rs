//! Enumerations for BTCEXA request fields.
//!
//! Two groups:
//!
//! - **Order creation** ([`OrderType`], [`OrderSide`]) parse strictly; a bad
//!   value is a validation error.
//! - **List filters** ([`SortDirection`], [`DealSide`], [`OrderStatusFilter`],
//!   [`OrderKind`]) parse leniently through [`FilterValue`]. A value outside
//!   the allow-list is dropped from the request instead of failing it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::BxError;

// ---------------------------------------------------------------------------
// Lenient filter values
// ---------------------------------------------------------------------------

/// An enum-constrained optional filter field.
pub trait FilterValue: Sized {
    /// Wire name of the field (e.g. `"sort"`).
    const FIELD: &'static str;

    /// Normalize a caller-supplied value, `None` if it is not allowed.
    fn parse_lenient(raw: &str) -> Option<Self>;

    /// Wire representation.
    fn as_str(&self) -> &'static str;

    /// Normalize straight to the wire string.
    fn normalize(raw: &str) -> Option<&'static str> {
        Self::parse_lenient(raw).map(|v| v.as_str())
    }
}

/// Parse a filter value, logging when it is dropped.
pub fn filter_or_drop<T: FilterValue>(raw: &str) -> Option<T> {
    let parsed = T::parse_lenient(raw);
    if parsed.is_none() {
        debug!(field = T::FIELD, value = raw, "dropping unrecognised filter value");
    }
    parsed
}

/// Serde helper for `Option<T: FilterValue>` fields: unknown strings become
/// `None` rather than a deserialization error.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FilterValue,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|r| filter_or_drop(&r)))
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl FilterValue for SortDirection {
    const FIELD: &'static str = "sort";

    fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Side filter on deal and order lists (`A` = ask, `B` = bid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DealSide {
    #[serde(rename = "A")]
    Ask,
    #[serde(rename = "B")]
    Bid,
}

impl FilterValue for DealSide {
    const FIELD: &'static str = "side";

    fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "A" => Some(Self::Ask),
            "B" => Some(Self::Bid),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "A",
            Self::Bid => "B",
        }
    }
}

/// Order status filter on order lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusFilter {
    Canceled,
    New,
    Partfilled,
    Removed,
    Revise,
    Trade,
}

impl FilterValue for OrderStatusFilter {
    const FIELD: &'static str = "status";

    fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "CANCELED" => Some(Self::Canceled),
            "NEW" => Some(Self::New),
            "PARTFILLED" => Some(Self::Partfilled),
            "REMOVED" => Some(Self::Removed),
            "REVISE" => Some(Self::Revise),
            "TRADE" => Some(Self::Trade),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Canceled => "CANCELED",
            Self::New => "NEW",
            Self::Partfilled => "PARTFILLED",
            Self::Removed => "REMOVED",
            Self::Revise => "REVISE",
            Self::Trade => "TRADE",
        }
    }
}

/// Order kind filter on order lists: `Lt` (limit) or `Mt` (market).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderKind {
    #[serde(rename = "Lt")]
    Limit,
    #[serde(rename = "Mt")]
    Market,
}

impl FilterValue for OrderKind {
    const FIELD: &'static str = "type";

    /// Only the first two characters count: the first is upper-cased and the
    /// second lower-cased, so `"lT"` and `"Ltd"` both read as `Lt`.
    fn parse_lenient(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let (first, second) = (chars.next()?, chars.next()?);
        let key: String = first.to_uppercase().chain(second.to_lowercase()).collect();
        match key.as_str() {
            "Lt" => Some(Self::Limit),
            "Mt" => Some(Self::Market),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "Lt",
            Self::Market => "Mt",
        }
    }
}

// ---------------------------------------------------------------------------
// Strict order-creation enums
// ---------------------------------------------------------------------------

/// Order type for order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

impl FromStr for OrderType {
    type Err = BxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LIMIT" => Ok(Self::Limit),
            "MARKET" => Ok(Self::Market),
            _ => Err(BxError::Validation(
                "Order type must be \"LIMIT\" or \"MARKET\" value.".into(),
            )),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buy or sell, for order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl FromStr for OrderSide {
    type Err = BxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(BxError::Validation(
                "Order side must be \"BUY\" or \"SELL\" value.".into(),
            )),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_case_insensitive() {
        assert_eq!(SortDirection::parse_lenient("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse_lenient("Desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse_lenient("up"), None);
    }

    #[test]
    fn deal_side_allow_list() {
        assert_eq!(DealSide::normalize("a"), Some("A"));
        assert_eq!(DealSide::normalize("b"), Some("B"));
        assert_eq!(DealSide::normalize("buy"), None);
    }

    #[test]
    fn status_allow_list() {
        assert_eq!(OrderStatusFilter::normalize("partfilled"), Some("PARTFILLED"));
        assert_eq!(OrderStatusFilter::normalize("FILLED"), None);
    }

    #[test]
    fn order_kind_reads_two_chars() {
        assert_eq!(OrderKind::parse_lenient("lt"), Some(OrderKind::Limit));
        assert_eq!(OrderKind::parse_lenient("MT"), Some(OrderKind::Market));
        assert_eq!(OrderKind::parse_lenient("Ltd"), Some(OrderKind::Limit));
        assert_eq!(OrderKind::parse_lenient("LIMIT"), None); // "Li"
        assert_eq!(OrderKind::parse_lenient("L"), None);
        assert_eq!(OrderKind::parse_lenient(""), None);
    }

    #[test]
    fn order_type_strict() {
        assert_eq!("limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert_eq!("MARKET".parse::<OrderType>().unwrap(), OrderType::Market);
        assert!("STOP".parse::<OrderType>().unwrap_err().is_validation());
    }

    #[test]
    fn order_side_strict() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert!("long".parse::<OrderSide>().unwrap_err().is_validation());
    }

    #[derive(Deserialize)]
    struct Filtered {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        sort: Option<SortDirection>,
        #[serde(default, deserialize_with = "deserialize_lenient")]
        side: Option<DealSide>,
    }

    #[test]
    fn lenient_deserialize_drops_unknown() {
        let f: Filtered = serde_json::from_str(r#"{"sort":"sideways","side":"b"}"#).unwrap();
        assert_eq!(f.sort, None);
        assert_eq!(f.side, Some(DealSide::Bid));

        let empty: Filtered = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.sort, None);
    }
}
