use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The two API surfaces of the exchange. Each has its own host pair,
/// signature scheme and request-shaping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    Spot,
    Futures,
}

impl ApiFamily {
    pub const SPOT_BASE_URL: &'static str = "https://openapi.100ex.com";
    pub const SPOT_TESTNET_BASE_URL: &'static str = "https://openapi.100extest.com";
    pub const FUTURES_BASE_URL: &'static str = "https://futuresopenapi.100ex.com";
    pub const FUTURES_TESTNET_BASE_URL: &'static str = "https://futuresopenapi.100extest.com";

    /// Default host for this family on the selected network
    pub const fn base_url(self, testnet: bool) -> &'static str {
        match (self, testnet) {
            (Self::Spot, false) => Self::SPOT_BASE_URL,
            (Self::Spot, true) => Self::SPOT_TESTNET_BASE_URL,
            (Self::Futures, false) => Self::FUTURES_BASE_URL,
            (Self::Futures, true) => Self::FUTURES_TESTNET_BASE_URL,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Futures => "futures",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common `{code, msg, data}` wrapper of every response.
///
/// `data` stays untyped here; the endpoint decodes it a second time into its
/// own DTO with [`Envelope::data`] or [`Envelope::data_or_default`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Parse a raw response body. Only checks the shape, not `code`.
    pub fn decode(body: &[u8]) -> Result<Self, ExchangeError> {
        serde_json::from_slice(body)
            .map_err(|e| ExchangeError::decode("Failed to parse response envelope", e))
    }

    /// `"0"` and an empty code both mean success
    pub fn is_success(&self) -> bool {
        self.code.is_empty() || self.code == "0"
    }

    /// Turn a failure code into [`ExchangeError::ApiError`], dropping `data`.
    pub fn into_result(self) -> Result<Self, ExchangeError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ExchangeError::ApiError {
                code: self.code,
                message: self.msg,
            })
        }
    }

    /// Second-stage decode of `data` into an endpoint-specific type.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, ExchangeError> {
        serde_json::from_value(self.data)
            .map_err(|e| ExchangeError::decode("Failed to parse response data", e))
    }

    /// Like [`Envelope::data`] but a `null`/absent payload yields `T::default()`.
    pub fn data_or_default<T: DeserializeOwned + Default>(self) -> Result<T, ExchangeError> {
        if self.data.is_null() {
            return Ok(T::default());
        }
        self.data()
    }
}

/// Accept a value the exchange sends either quoted or as a bare number.
/// `null` becomes an empty string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle states. Anything the exchange reports outside the known
/// set maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
    Unknown,
}

impl OrderStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "NEW" => Self::New,
            "PARTIALLY_FILLED" => Self::PartiallyFilled,
            "FILLED" => Self::Filled,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "REJECTED" => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::PartiallyFilled)
    }
}

/// Order book snapshot. Each level is `[price, quantity]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Depth {
    pub asks: Vec<Vec<Decimal>>,
    pub bids: Vec<Vec<Decimal>>,
}

impl Depth {
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().and_then(|level| level.first().copied())
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().and_then(|level| level.first().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kline {
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Identifier returned when an order is accepted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderResponse {
    #[serde(rename = "orderId", alias = "order_id", deserialize_with = "string_or_number")]
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    struct Payload {
        symbol: String,
    }

    #[test]
    fn test_base_urls_differ_between_networks() {
        for family in [ApiFamily::Spot, ApiFamily::Futures] {
            assert_ne!(family.base_url(false), family.base_url(true));
        }
        assert_eq!(ApiFamily::Spot.base_url(false), "https://openapi.100ex.com");
        assert_eq!(
            ApiFamily::Futures.base_url(true),
            "https://futuresopenapi.100extest.com"
        );
    }

    #[test]
    fn test_success_envelope_exposes_data() {
        let body = br#"{"code":"0","msg":"","data":{"symbol":"btcusdt"}}"#;
        let envelope = Envelope::decode(body).unwrap().into_result().unwrap();
        let payload: Payload = envelope.data().unwrap();
        assert_eq!(payload.symbol, "btcusdt");
    }

    #[test]
    fn test_error_envelope_becomes_api_error() {
        let body = br#"{"code":"1001","msg":"bad param"}"#;
        let err = Envelope::decode(body).unwrap().into_result().unwrap_err();
        match err {
            ExchangeError::ApiError { code, message } => {
                assert_eq!(code, "1001");
                assert_eq!(message, "bad param");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_is_success() {
        let envelope = Envelope::decode(br#"{"data":[1,2,3]}"#).unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.msg, "");
    }

    #[test]
    fn test_numeric_code_is_rendered_as_string() {
        let envelope = Envelope::decode(br#"{"code":10013,"msg":null}"#).unwrap();
        assert_eq!(envelope.code, "10013");
        assert_eq!(envelope.msg, "");
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = Envelope::decode(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_data_or_default_on_null() {
        let envelope = Envelope::decode(br#"{"code":"0","msg":"","data":null}"#).unwrap();
        let items: Vec<Payload> = envelope.data_or_default().unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_order_response_accepts_numeric_id() {
        let response: OrderResponse = serde_json::from_str(r#"{"orderId":12345}"#).unwrap();
        assert_eq!(response.order_id, "12345");

        let response: OrderResponse = serde_json::from_str(r#"{"order_id":"abc"}"#).unwrap();
        assert_eq!(response.order_id, "abc");
    }

    #[test]
    fn test_depth_decodes_string_and_number_levels() {
        let depth: Depth =
            serde_json::from_str(r#"{"asks":[["101.5","2"]],"bids":[[100.25,3]]}"#).unwrap();
        assert_eq!(depth.best_ask(), Some(Decimal::new(1015, 1)));
        assert_eq!(depth.best_bid(), Some(Decimal::new(10025, 2)));
    }

    #[test]
    fn test_order_side_wire_format() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), r#""BUY""#);
        assert_eq!(OrderType::Market.to_string(), "MARKET");
        assert_eq!(OrderStatus::from_wire("PARTIALLY_FILLED"), OrderStatus::PartiallyFilled);
        assert!(OrderStatus::from_wire("NEW").is_open());
        assert_eq!(OrderStatus::from_wire("EXPIRED"), OrderStatus::Unknown);
    }

    #[test]
    fn test_data_shape_mismatch_is_decode_error() {
        let envelope = Envelope::decode(br#"{"code":"0","data":"oops"}"#).unwrap();
        let err = envelope.data::<Payload>().unwrap_err();
        assert!(err.is_decode());
    }
}
