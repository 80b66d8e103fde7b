/// Request pipeline shared by the spot and futures APIs
///
/// # Components
///
/// - [`signer`]: the two signature schemes as pure functions. Spot signs the
///   key-sorted parameters with MD5; futures signs
///   `timestamp + method + path[?query]` with HMAC-SHA256.
/// - [`request`]: [`RequestBuilder`] implementations that turn a verb, path
///   and payload into a signed [`PreparedRequest`] following each family's
///   encoding rules.
/// - [`rest`]: the [`RestClient`] transport seam, its `reqwest`
///   implementation and [`execute`], which sends a request and unwraps the
///   `{code, msg, data}` envelope.
///
/// Every call is a single round trip. Nothing here retries, caches or keeps
/// state between calls.
///
/// # Example
///
/// ```rust,no_run
/// use byex::core::kernel::*;
/// use reqwest::Method;
/// use secrecy::Secret;
///
/// # async fn example() -> Result<(), byex::ExchangeError> {
/// let builder = FuturesRequestBuilder::new(
///     "https://futuresopenapi.100extest.com".to_string(),
///     "api_key".to_string(),
///     Secret::new("secret_key".to_string()),
/// );
/// let rest = ReqwestRest::new(RestClientConfig::default())?;
///
/// let request = builder.build(
///     Method::GET,
///     "/fapi/v1/ticker",
///     FuturesPayload::Query([("symbol".to_string(), "E-BTC-USDT".to_string())].into()),
///     current_timestamp()?,
/// )?;
/// let envelope = execute(&rest, request).await?;
/// println!("{}", envelope.data);
/// # Ok(())
/// # }
/// ```
pub mod request;
pub mod rest;
pub mod signer;

pub use request::{
    current_timestamp, FuturesPayload, FuturesRequestBuilder, PreparedRequest, RequestBody,
    RequestBuilder, SpotRequestBuilder,
};
pub use rest::{
    decode_response, execute, ClientHook, RawResponse, ReqwestRest, RestClient, RestClientBuilder,
    RestClientConfig,
};
pub use signer::{sign_futures, sign_spot, spot_sign_payload, spot_signature, SpotParams};
