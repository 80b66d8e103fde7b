use crate::builder::ByexBuilder;
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    current_timestamp, execute, FuturesPayload, FuturesRequestBuilder, PreparedRequest,
    ReqwestRest, RequestBuilder, RestClient, SpotParams, SpotRequestBuilder,
};
use crate::core::types::{ApiFamily, Envelope};
use crate::exchanges::futures::FuturesApi;
use crate::exchanges::spot::SpotApi;
use reqwest::Method;

/// Client for both 100EX API families.
///
/// Holds one transport shared by the spot and futures pipelines plus the
/// immutable per-family request builders. Nothing is mutated after
/// construction, so a single client (or a reference to it) can serve any
/// number of concurrent calls.
pub struct ByexClient<R: RestClient = ReqwestRest> {
    rest: R,
    spot: SpotRequestBuilder,
    futures: FuturesRequestBuilder,
    testnet: bool,
}

impl ByexClient<ReqwestRest> {
    /// Build a client with the default transport settings
    pub fn new(config: ExchangeConfig) -> Result<Self, ExchangeError> {
        ByexBuilder::new().with_config(config).build()
    }
}

impl<R: RestClient> ByexClient<R> {
    pub(crate) fn from_parts(
        rest: R,
        spot: SpotRequestBuilder,
        futures: FuturesRequestBuilder,
        testnet: bool,
    ) -> Self {
        Self {
            rest,
            spot,
            futures,
            testnet,
        }
    }

    /// Spot ("exchange") endpoints
    pub fn spot(&self) -> SpotApi<'_, R> {
        SpotApi::new(self)
    }

    /// Futures endpoints
    pub fn futures(&self) -> FuturesApi<'_, R> {
        FuturesApi::new(self)
    }

    pub fn is_testnet(&self) -> bool {
        self.testnet
    }

    /// Base URL the given family sends to
    pub fn base_url(&self, family: ApiFamily) -> &str {
        match family {
            ApiFamily::Spot => self.spot.base_url(),
            ApiFamily::Futures => self.futures.base_url(),
        }
    }

    /// Underlying transport
    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Sign and encode a spot call without sending it
    pub fn prepare_spot_request(
        &self,
        method: Method,
        path: &str,
        params: SpotParams,
    ) -> Result<PreparedRequest, ExchangeError> {
        self.spot.build(method, path, params, current_timestamp()?)
    }

    /// Sign and encode a futures call without sending it
    pub fn prepare_futures_request(
        &self,
        method: Method,
        path: &str,
        payload: FuturesPayload,
    ) -> Result<PreparedRequest, ExchangeError> {
        self.futures
            .build(method, path, payload, current_timestamp()?)
    }

    /// Send a spot call and return its successful envelope
    pub async fn spot_request(
        &self,
        method: Method,
        path: &str,
        params: SpotParams,
    ) -> Result<Envelope, ExchangeError> {
        let request = self.prepare_spot_request(method, path, params)?;
        execute(&self.rest, request).await
    }

    /// Send a futures call and return its successful envelope
    pub async fn futures_request(
        &self,
        method: Method,
        path: &str,
        payload: FuturesPayload,
    ) -> Result<Envelope, ExchangeError> {
        let request = self.prepare_futures_request(method, path, payload)?;
        execute(&self.rest, request).await
    }
}
