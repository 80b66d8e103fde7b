use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{sign_futures, sign_spot, SpotParams};
use crate::core::types::ApiFamily;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const FUTURES_API_KEY_HEADER: &str = "X-CH-APIKEY";
pub const FUTURES_TIMESTAMP_HEADER: &str = "X-CH-TS";
pub const FUTURES_SIGN_HEADER: &str = "X-CH-SIGN";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn current_timestamp() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| ExchangeError::ClockError(e.to_string()))
}

/// Body of an outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` text
    Form(String),
    /// Serialized JSON
    Json(Vec<u8>),
}

impl RequestBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Form(form) => form.as_bytes(),
            Self::Json(json) => json,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// A fully signed request, ready for a [`RestClient`](crate::core::kernel::RestClient).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub family: ApiFamily,
    pub method: Method,
    pub path: String,
    /// Absolute URL, including the query string when there is one
    pub url: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl PreparedRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decoded `(key, value)` pairs of the URL query
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ExchangeError> {
        self.query
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), decode_pairs)
    }

    /// Decoded `(key, value)` pairs of a form body; empty for other bodies
    pub fn form_pairs(&self) -> Result<Vec<(String, String)>, ExchangeError> {
        match &self.body {
            RequestBody::Form(form) => decode_pairs(form),
            _ => Ok(Vec::new()),
        }
    }
}

fn decode_pairs(encoded: &str) -> Result<Vec<(String, String)>, ExchangeError> {
    serde_urlencoded::from_str(encoded).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to decode parameters: {}", e))
    })
}

fn urlencode<T: Serialize + ?Sized>(params: &T) -> Result<String, ExchangeError> {
    serde_urlencoded::to_string(params).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to encode parameters: {}", e))
    })
}

fn join_url(base_url: &str, path: &str, query: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match query {
        Some(query) => format!("{}{}?{}", base, path, query),
        None => format!("{}{}", base, path),
    }
}

/// Turns a verb, a path and a family-specific payload into a signed request.
///
/// There is one implementation per [`ApiFamily`]; each owns the family's
/// base URL, signature scheme and encoding rules.
pub trait RequestBuilder: Send + Sync {
    type Payload;

    fn family(&self) -> ApiFamily;

    fn base_url(&self) -> &str;

    fn build(
        &self,
        method: Method,
        path: &str,
        payload: Self::Payload,
        timestamp: u64,
    ) -> Result<PreparedRequest, ExchangeError>;
}

/// Spot requests: MD5 signature carried as `api_key`/`time`/`sign`
/// parameters, in the query for `GET` and in a form body otherwise.
#[derive(Debug, Clone)]
pub struct SpotRequestBuilder {
    base_url: String,
    api_key: String,
    secret_key: Secret<String>,
}

impl SpotRequestBuilder {
    pub fn new(base_url: String, api_key: String, secret_key: Secret<String>) -> Self {
        Self {
            base_url,
            api_key,
            secret_key,
        }
    }
}

impl RequestBuilder for SpotRequestBuilder {
    type Payload = SpotParams;

    fn family(&self) -> ApiFamily {
        ApiFamily::Spot
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        payload: SpotParams,
        timestamp: u64,
    ) -> Result<PreparedRequest, ExchangeError> {
        let signed = sign_spot(
            payload,
            &self.api_key,
            self.secret_key.expose_secret(),
            timestamp,
        );
        let encoded = urlencode(&signed)?;

        let (query, body, headers) = if method == Method::GET {
            (Some(encoded), RequestBody::Empty, Vec::new())
        } else {
            (
                None,
                RequestBody::Form(encoded),
                vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            )
        };

        Ok(PreparedRequest {
            family: ApiFamily::Spot,
            url: join_url(&self.base_url, path, query.as_deref()),
            method,
            path: path.to_string(),
            query,
            headers,
            body,
        })
    }
}

/// Payload of a futures call
#[derive(Debug, Clone, Default)]
pub enum FuturesPayload {
    #[default]
    None,
    /// String parameters, sent as the query of a `GET` (or as a JSON object
    /// with any other verb)
    Query(BTreeMap<String, String>),
    /// Arbitrary JSON body for write calls
    Json(Value),
}

impl FuturesPayload {
    /// Serialize any request struct into a JSON payload
    pub fn json<T: Serialize>(body: &T) -> Result<Self, ExchangeError> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| {
                ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
            })
    }
}

/// Futures requests: HMAC-SHA256 signature carried only in the
/// `X-CH-APIKEY`/`X-CH-TS`/`X-CH-SIGN` headers.
#[derive(Debug, Clone)]
pub struct FuturesRequestBuilder {
    base_url: String,
    api_key: String,
    secret_key: Secret<String>,
}

impl FuturesRequestBuilder {
    pub fn new(base_url: String, api_key: String, secret_key: Secret<String>) -> Self {
        Self {
            base_url,
            api_key,
            secret_key,
        }
    }
}

impl RequestBuilder for FuturesRequestBuilder {
    type Payload = FuturesPayload;

    fn family(&self) -> ApiFamily {
        ApiFamily::Futures
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        payload: FuturesPayload,
        timestamp: u64,
    ) -> Result<PreparedRequest, ExchangeError> {
        let is_get = method == Method::GET;

        let (query, body) = match payload {
            FuturesPayload::Query(params) if is_get => {
                // Unlike spot, empty values are not transmitted at all
                let present: BTreeMap<&str, &str> = params
                    .iter()
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                if present.is_empty() {
                    (None, RequestBody::Empty)
                } else {
                    (Some(urlencode(&present)?), RequestBody::Empty)
                }
            }
            FuturesPayload::Query(params) => (None, RequestBody::Json(to_json(&params)?)),
            FuturesPayload::Json(value) if !is_get && !value.is_null() => {
                (None, RequestBody::Json(to_json(&value)?))
            }
            _ => (None, RequestBody::Empty),
        };

        let signature = sign_futures(
            method.as_str(),
            path,
            query.as_deref().unwrap_or_default(),
            timestamp,
            self.secret_key.expose_secret(),
        )?;

        let mut headers = vec![
            (FUTURES_API_KEY_HEADER.to_string(), self.api_key.clone()),
            (FUTURES_TIMESTAMP_HEADER.to_string(), timestamp.to_string()),
            (FUTURES_SIGN_HEADER.to_string(), signature),
        ];
        if matches!(body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        Ok(PreparedRequest {
            family: ApiFamily::Futures,
            url: join_url(&self.base_url, path, query.as_deref()),
            method,
            path: path.to_string(),
            query,
            headers,
            body,
        })
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ExchangeError> {
    serde_json::to_vec(value).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::signer::{futures_sign_message, spot_signature};

    const TS: u64 = 1_700_000_000_000;

    fn spot() -> SpotRequestBuilder {
        SpotRequestBuilder::new(
            "https://openapi.100extest.com".to_string(),
            "spot_key".to_string(),
            Secret::new("spot_secret".to_string()),
        )
    }

    fn futures() -> FuturesRequestBuilder {
        FuturesRequestBuilder::new(
            "https://futuresopenapi.100extest.com".to_string(),
            "fut_key".to_string(),
            Secret::new("fut_secret".to_string()),
        )
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_spot_get_puts_everything_in_query() {
        let req = spot()
            .build(
                Method::GET,
                "/open/api/get_ticker",
                map(&[("symbol", "btcusdt")]),
                TS,
            )
            .unwrap();

        assert_eq!(req.body, RequestBody::Empty);
        let query = req.query.clone().unwrap();
        assert!(req
            .url
            .starts_with("https://openapi.100extest.com/open/api/get_ticker?"));
        assert!(req.url.ends_with(&query));

        let pairs: BTreeMap<String, String> = req.query_pairs().unwrap().into_iter().collect();
        assert_eq!(pairs.get("symbol").map(String::as_str), Some("btcusdt"));
        assert_eq!(pairs.get("api_key").map(String::as_str), Some("spot_key"));
        assert_eq!(pairs.get("time").map(String::as_str), Some("1700000000000"));
        assert_eq!(pairs.get("sign").map(|s| s.len()), Some(32));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_spot_post_uses_form_body() {
        let req = spot()
            .build(
                Method::POST,
                "/open/api/cancel_order",
                map(&[("symbol", "btcusdt"), ("order_id", "42")]),
                TS,
            )
            .unwrap();

        assert!(req.query.is_none());
        assert_eq!(req.url, "https://openapi.100extest.com/open/api/cancel_order");
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));

        let pairs: BTreeMap<String, String> = req.form_pairs().unwrap().into_iter().collect();
        assert_eq!(pairs.get("order_id").map(String::as_str), Some("42"));
        assert!(pairs.contains_key("api_key"));
        assert!(pairs.contains_key("time"));
        assert!(pairs.contains_key("sign"));
    }

    #[test]
    fn test_spot_keeps_empty_values_but_does_not_sign_them() {
        let req = spot()
            .build(
                Method::GET,
                "/open/api/v2/new_order",
                map(&[("symbol", "btcusdt"), ("page", "")]),
                TS,
            )
            .unwrap();

        let mut pairs: BTreeMap<String, String> = req.query_pairs().unwrap().into_iter().collect();
        assert_eq!(pairs.get("page").map(String::as_str), Some(""));

        let sign = pairs.remove("sign").unwrap();
        pairs.remove("page");
        assert_eq!(sign, spot_signature(&pairs, "spot_secret"));
    }

    #[test]
    fn test_futures_get_drops_empty_values() {
        let req = futures()
            .build(
                Method::GET,
                "/fapi/v1/depth",
                FuturesPayload::Query(map(&[("a", "1"), ("b", "")])),
                TS,
            )
            .unwrap();

        assert_eq!(req.query.as_deref(), Some("a=1"));
        assert_eq!(
            req.url,
            "https://futuresopenapi.100extest.com/fapi/v1/depth?a=1"
        );
        let expected = sign_futures("GET", "/fapi/v1/depth", "a=1", TS, "fut_secret").unwrap();
        assert_eq!(req.header(FUTURES_SIGN_HEADER), Some(expected.as_str()));
        assert!(futures_sign_message("GET", "/fapi/v1/depth", "a=1", TS).ends_with("?a=1"));
    }

    #[test]
    fn test_futures_get_with_only_empty_values_is_bare() {
        let req = futures()
            .build(
                Method::GET,
                "/fapi/v1/position/positions",
                FuturesPayload::Query(map(&[("futuresName", "")])),
                TS,
            )
            .unwrap();

        assert!(req.query.is_none());
        assert_eq!(
            req.url,
            "https://futuresopenapi.100extest.com/fapi/v1/position/positions"
        );
        let expected = sign_futures("GET", "/fapi/v1/position/positions", "", TS, "fut_secret")
            .unwrap();
        assert_eq!(req.header(FUTURES_SIGN_HEADER), Some(expected.as_str()));
    }

    #[test]
    fn test_futures_post_sends_json() {
        let body = serde_json::json!({"futuresName": "E-BTC-USDT", "leverage": 10});
        let req = futures()
            .build(
                Method::POST,
                "/fapi/v1/position/leverage",
                FuturesPayload::Json(body.clone()),
                TS,
            )
            .unwrap();

        assert!(req.query.is_none());
        assert_eq!(req.header("Content-Type"), Some(JSON_CONTENT_TYPE));
        let sent: Value = serde_json::from_slice(req.body.as_bytes()).unwrap();
        assert_eq!(sent, body);

        let expected =
            sign_futures("POST", "/fapi/v1/position/leverage", "", TS, "fut_secret").unwrap();
        assert_eq!(req.header(FUTURES_SIGN_HEADER), Some(expected.as_str()));
    }

    #[test]
    fn test_futures_post_with_string_map_becomes_json_object() {
        let req = futures()
            .build(
                Method::POST,
                "/fapi/v1/trade/cancel",
                FuturesPayload::Query(map(&[("futuresName", "E-BTC-USDT"), ("orderId", "7")])),
                TS,
            )
            .unwrap();

        let sent: Value = serde_json::from_slice(req.body.as_bytes()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"futuresName": "E-BTC-USDT", "orderId": "7"})
        );
    }

    #[test]
    fn test_futures_delete_carries_json_body() {
        let req = futures()
            .build(
                Method::DELETE,
                "/fapi/v1/batchOrders",
                FuturesPayload::Json(serde_json::json!({"orderIdList": ["1", "2"]})),
                TS,
            )
            .unwrap();

        assert!(matches!(req.body, RequestBody::Json(_)));
        assert!(req.query.is_none());
    }

    #[test]
    fn test_futures_bare_requests_still_signed() {
        for (method, payload) in [
            (Method::GET, FuturesPayload::None),
            (Method::POST, FuturesPayload::None),
            (Method::POST, FuturesPayload::Json(Value::Null)),
            (Method::GET, FuturesPayload::Json(serde_json::json!({"x": 1}))),
        ] {
            let req = futures()
                .build(method.clone(), "/fapi/v1/account", payload, TS)
                .unwrap();
            assert_eq!(req.body, RequestBody::Empty);
            assert!(req.query.is_none());
            assert_eq!(req.header(FUTURES_API_KEY_HEADER), Some("fut_key"));
            assert_eq!(req.header(FUTURES_TIMESTAMP_HEADER), Some("1700000000000"));

            let expected =
                sign_futures(method.as_str(), "/fapi/v1/account", "", TS, "fut_secret").unwrap();
            assert_eq!(req.header(FUTURES_SIGN_HEADER), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_futures_auth_never_in_query_or_body() {
        let get = futures()
            .build(
                Method::GET,
                "/fapi/v1/ticker",
                FuturesPayload::Query(map(&[("symbol", "E-BTC-USDT")])),
                TS,
            )
            .unwrap();
        let post = futures()
            .build(
                Method::POST,
                "/fapi/v1/trade/order",
                FuturesPayload::Json(serde_json::json!({"volume": "1"})),
                TS,
            )
            .unwrap();

        for req in [get, post] {
            let signature = req.header(FUTURES_SIGN_HEADER).unwrap().to_string();
            let query = req.query.clone().unwrap_or_default();
            let body = String::from_utf8(req.body.as_bytes().to_vec()).unwrap();
            for secret_bit in ["fut_key", signature.as_str(), "1700000000000"] {
                assert!(!query.contains(secret_bit));
                assert!(!body.contains(secret_bit));
            }
        }
    }

    #[test]
    fn test_join_url_trims_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:8080/", "/fapi/v1/ticker", Some("a=1")),
            "http://localhost:8080/fapi/v1/ticker?a=1"
        );
    }

    #[test]
    fn test_pairs_are_decoded_or_reported() {
        let req = spot()
            .build(
                Method::POST,
                "/open/api/create_order",
                map(&[("symbol", "btc usdt"), ("note", "a&b=c")]),
                1,
            )
            .unwrap();
        let form = req.form_pairs().unwrap();
        assert!(form.contains(&("symbol".to_string(), "btc usdt".to_string())));
        assert!(form.contains(&("note".to_string(), "a&b=c".to_string())));
        assert!(req.query_pairs().unwrap().is_empty());

        let bare = futures()
            .build(Method::GET, "/fapi/v1/ticker/24hr", FuturesPayload::None, 1)
            .unwrap();
        assert!(bare.query_pairs().unwrap().is_empty());
        assert!(bare.form_pairs().unwrap().is_empty());
    }

    #[test]
    fn test_current_timestamp_is_milliseconds() {
        let ts = current_timestamp().unwrap();
        // After 2020-01-01 in milliseconds
        assert!(ts > 1_577_836_800_000);
    }
}
