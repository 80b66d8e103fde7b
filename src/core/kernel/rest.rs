use crate::core::errors::ExchangeError;
use crate::core::kernel::request::{PreparedRequest, RequestBody};
use crate::core::types::Envelope;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Raw status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport seam: performs exactly one HTTP round trip.
///
/// Implementations must read the whole body before returning so the
/// underlying connection is released on every path.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("byex-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Hook applied to the `reqwest` builder before the client is created
pub type ClientHook = Box<dyn FnOnce(ClientBuilder) -> ClientBuilder + Send>;

/// Builder for [`ReqwestRest`]
pub struct RestClientBuilder {
    config: RestClientConfig,
    hooks: Vec<ClientHook>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            hooks: Vec::new(),
        }
    }

    /// Customize the underlying `reqwest::ClientBuilder` (proxies, TLS, a
    /// different timeout...). Hooks run once, in order, after the defaults.
    pub fn with_hook(mut self, hook: ClientHook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent);

        for hook in self.hooks {
            builder = hook(builder);
        }

        let client = builder.build().map_err(|e| {
            ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// [`RestClient`] backed by a shared `reqwest::Client`
#[derive(Clone, Debug)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl ReqwestRest {
    pub fn new(config: RestClientConfig) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(config).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ExchangeError> {
        let mut builder = self.client.request(request.method, &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(form) => builder.body(form),
            RequestBody::Json(json) => builder.body(json),
        };

        // Spot URLs carry the signature in the query
        let response = builder.send().await.map_err(|e| e.without_url())?;
        let status = response.status().as_u16();
        // Consuming the body hands the connection back to the pool
        let body = response.bytes().await.map_err(|e| e.without_url())?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// Send one request and unwrap the response envelope.
///
/// Transport failures, malformed bodies and non-success envelope codes come
/// back as distinct [`ExchangeError`] variants. On success the envelope is
/// returned untouched so the caller can decode `data`.
#[instrument(
    skip(rest, request),
    fields(family = %request.family, method = %request.method, path = %request.path)
)]
pub async fn execute<R>(rest: &R, request: PreparedRequest) -> Result<Envelope, ExchangeError>
where
    R: RestClient + ?Sized,
{
    let response = rest.send(request).await?;
    trace!(status = response.status, body = %response.text(), "Response received");
    decode_response(response)
}

/// Map a raw response onto an envelope or the matching error
pub fn decode_response(response: RawResponse) -> Result<Envelope, ExchangeError> {
    let status_ok = response.is_success();

    let envelope = match Envelope::decode(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !status_ok => {
            return Err(ExchangeError::HttpStatus {
                status: response.status,
                body: response.text(),
            })
        }
        Err(e) => return Err(e),
    };

    if !status_ok && envelope.is_success() {
        return Err(ExchangeError::HttpStatus {
            status: response.status,
            body: response.text(),
        });
    }

    envelope.into_result().map_err(|e| {
        debug!(error = %e, "Exchange returned an error envelope");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let envelope = decode_response(RawResponse::new(
            200,
            r#"{"code":"0","msg":"suc","data":{"orderId":"1"}}"#,
        ))
        .unwrap();
        assert_eq!(envelope.data["orderId"], "1");
    }

    #[test]
    fn test_api_error_on_200() {
        let err = decode_response(RawResponse::new(200, r#"{"code":"1001","msg":"bad param"}"#))
            .unwrap_err();
        assert_eq!(err.api_code(), Some("1001"));
    }

    #[test]
    fn test_api_error_on_non_2xx_keeps_exchange_code() {
        let err = decode_response(RawResponse::new(
            400,
            r#"{"code":"-1121","msg":"Invalid symbol."}"#,
        ))
        .unwrap_err();
        assert_eq!(err.api_code(), Some("-1121"));
    }

    #[test]
    fn test_non_2xx_without_envelope_is_http_status() {
        let err = decode_response(RawResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert!(matches!(err, ExchangeError::HttpStatus { status: 502, .. }));
    }

    #[test]
    fn test_non_2xx_with_success_code_is_http_status() {
        let err = decode_response(RawResponse::new(500, r#"{"code":"0","msg":""}"#)).unwrap_err();
        assert!(matches!(err, ExchangeError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn test_malformed_200_is_decode_error() {
        let err = decode_response(RawResponse::new(200, "not json")).unwrap_err();
        assert!(err.is_decode());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_rest_client_builder_runs_hooks() {
        let ran = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = ran.clone();

        let rest = RestClientBuilder::new(RestClientConfig::default().with_timeout(5))
            .with_hook(Box::new(move |builder| {
                flag.store(true, std::sync::atomic::Ordering::SeqCst);
                builder.timeout(Duration::from_secs(60))
            }))
            .build()
            .unwrap();

        assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
        assert_eq!(rest.config().timeout_seconds, 5);
    }
}
