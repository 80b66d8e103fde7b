#![allow(dead_code)]

use async_trait::async_trait;
use byex::core::kernel::{PreparedRequest, RawResponse, RestClient};
use byex::{ByexBuilder, ByexClient, ExchangeConfig, ExchangeError};
use std::collections::VecDeque;
use std::env;
use std::sync::Mutex;

pub const TEST_API_KEY: &str = "test_api_key";
pub const TEST_SECRET_KEY: &str = "test_secret_key";

/// Test configuration utilities
pub struct TestConfig;

impl TestConfig {
    /// Check if integration tests should run (based on environment variables)
    pub fn should_run_integration_tests() -> bool {
        env::var("RUN_INTEGRATION_TESTS").unwrap_or_default() == "true"
    }

    /// Check if order placement tests should run (requires funds)
    pub fn should_run_order_tests() -> bool {
        env::var("RUN_ORDER_TESTS").unwrap_or_default() == "true"
    }

    pub fn test_timeout_seconds() -> u64 {
        env::var("TEST_TIMEOUT_SECONDS")
            .unwrap_or_default()
            .parse()
            .unwrap_or(30)
    }

    pub fn create_safe_config() -> ExchangeConfig {
        ExchangeConfig::new(TEST_API_KEY.to_string(), TEST_SECRET_KEY.to_string()).testnet(true)
    }

    /// Credentials from `BYEX_*` variables, falling back to dummy testnet ones
    pub fn create_config_from_env() -> ExchangeConfig {
        ExchangeConfig::from_env("BYEX").unwrap_or_else(|_| Self::create_safe_config())
    }
}

const EMPTY_SUCCESS: &str = r#"{"code":"0","msg":"suc","data":null}"#;

/// Transport double: records every request and replays queued responses.
/// Once the queue is empty it answers with an empty success envelope.
#[derive(Default)]
pub struct MockRest {
    requests: Mutex<Vec<PreparedRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, ExchangeError>>>,
}

impl MockRest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `200` response carrying `body`
    pub fn respond_json(&self, body: &str) -> &Self {
        self.respond(200, body)
    }

    /// Queue a success envelope wrapping `data`
    pub fn respond_data(&self, data: &str) -> &Self {
        self.respond_json(&format!(r#"{{"code":"0","msg":"suc","data":{}}}"#, data))
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail_with(&self, error: ExchangeError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> PreparedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ExchangeError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, EMPTY_SUCCESS)))
    }
}

/// Testnet client with dummy credentials on top of a [`MockRest`]
pub fn mock_client() -> ByexClient<MockRest> {
    ByexBuilder::new()
        .with_config(TestConfig::create_safe_config())
        .build_with_rest(MockRest::new())
}

/// Look up a decoded parameter
pub fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn keys(pairs: &[(String, String)]) -> Vec<&str> {
    pairs.iter().map(|(k, _)| k.as_str()).collect()
}
