use crate::client::ByexClient;
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    ClientHook, FuturesRequestBuilder, ReqwestRest, RestClient, RestClientBuilder,
    RestClientConfig, SpotRequestBuilder,
};
use crate::core::types::ApiFamily;
use reqwest::ClientBuilder;
use secrecy::Secret;
use tracing::debug;

/// Assembles a [`ByexClient`] from credentials, network selection and
/// transport settings.
///
/// ```rust,no_run
/// use byex::ByexBuilder;
///
/// # fn example() -> Result<(), byex::ExchangeError> {
/// let client = ByexBuilder::new()
///     .with_credentials("api_key", "secret_key")
///     .with_testnet(true)
///     .with_rest_timeout(10)
///     .build()?;
/// assert!(client.is_testnet());
/// # Ok(())
/// # }
/// ```
pub struct ByexBuilder {
    config: ExchangeConfig,
    rest_config: RestClientConfig,
    hooks: Vec<ClientHook>,
}

impl Default for ByexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ByexBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_config: RestClientConfig::default(),
            hooks: Vec::new(),
        }
    }

    /// Replace the whole exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.config.api_key = Secret::new(api_key.into());
        self.config.secret_key = Secret::new(secret_key.into());
        self
    }

    /// Select the testnet hosts for both families
    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.config.testnet = testnet;
        self
    }

    /// Request timeout in seconds
    pub fn with_rest_timeout(mut self, timeout_seconds: u64) -> Self {
        self.rest_config = self.rest_config.with_timeout(timeout_seconds);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.rest_config = self.rest_config.with_user_agent(user_agent.into());
        self
    }

    /// Customize the `reqwest` client (proxy, TLS roots, connection pool)
    pub fn with_client_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(ClientBuilder) -> ClientBuilder + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Override the spot host. Takes precedence over the testnet flag.
    pub fn with_spot_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.spot_base_url = Some(base_url.into());
        self
    }

    /// Override the futures host. Takes precedence over the testnet flag.
    pub fn with_futures_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.futures_base_url = Some(base_url.into());
        self
    }

    /// Base URL the built client will use for `family`
    pub fn resolve_base_url(&self, family: ApiFamily) -> String {
        let configured = match family {
            ApiFamily::Spot => self.config.spot_base_url.as_deref(),
            ApiFamily::Futures => self.config.futures_base_url.as_deref(),
        };
        configured
            .map_or_else(|| family.base_url(self.config.testnet).to_string(), str::to_string)
    }

    /// Build a client on top of the `reqwest` transport
    pub fn build(mut self) -> Result<ByexClient<ReqwestRest>, ExchangeError> {
        let mut rest_builder = RestClientBuilder::new(self.rest_config.clone());
        for hook in std::mem::take(&mut self.hooks) {
            rest_builder = rest_builder.with_hook(hook);
        }
        let rest = rest_builder.build()?;
        Ok(self.build_with_rest(rest))
    }

    /// Build a client on top of any transport
    pub fn build_with_rest<R: RestClient>(self, rest: R) -> ByexClient<R> {
        let spot_url = self.resolve_base_url(ApiFamily::Spot);
        let futures_url = self.resolve_base_url(ApiFamily::Futures);

        debug!(
            testnet = self.config.testnet,
            spot_url = %spot_url,
            futures_url = %futures_url,
            authenticated = self.config.has_credentials(),
            "Building 100EX client"
        );

        let api_key = self.config.api_key().to_string();
        let spot = SpotRequestBuilder::new(spot_url, api_key.clone(), self.config.secret_key.clone());
        let futures =
            FuturesRequestBuilder::new(futures_url, api_key, self.config.secret_key.clone());

        ByexClient::from_parts(rest, spot, futures, self.config.testnet)
    }
}

/// Create a client with default transport settings
pub fn build_client(config: ExchangeConfig) -> Result<ByexClient<ReqwestRest>, ExchangeError> {
    ByexBuilder::new().with_config(config).build()
}
