use anyhow::Context;
use byex::core::config::DEFAULT_ENV_PREFIX;
use byex::{ByexBuilder, ConfigError, ExchangeConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config().unwrap_or_else(|e| {
        warn!(error = %e, "No credentials found, using public endpoints on testnet");
        ExchangeConfig::read_only().testnet(true)
    });
    let authenticated = config.has_credentials();

    let client = ByexBuilder::new()
        .with_config(config)
        .build()
        .context("failed to build client")?;

    let spot = client.spot();
    let futures = client.futures();

    let ticker = spot
        .get_ticker("btcusdt")
        .await
        .context("spot ticker request failed")?;
    info!(symbol = %ticker.symbol, last = %ticker.last, high = %ticker.high, low = %ticker.low, "Spot ticker");

    match futures.get_depth("E-BTC-USDT", Some(5)).await {
        Ok(depth) => info!(best_bid = ?depth.best_bid(), best_ask = ?depth.best_ask(), "Futures depth"),
        Err(e) => warn!(error = %e, "Futures depth request failed"),
    }

    if authenticated {
        let account = spot.get_account().await.context("account request failed")?;
        for coin in account.coin_list.iter().filter(|c| !c.total().is_zero()) {
            info!(coin = %coin.coin, normal = %coin.normal, locked = %coin.locked, "Balance");
        }
    }

    Ok(())
}

/// Credentials come from `BYEX_API_KEY` / `BYEX_SECRET_KEY`, optionally via `.env`
#[cfg(feature = "env-file")]
fn load_config() -> Result<ExchangeConfig, ConfigError> {
    ExchangeConfig::from_env_file(DEFAULT_ENV_PREFIX)
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> Result<ExchangeConfig, ConfigError> {
    ExchangeConfig::from_env(DEFAULT_ENV_PREFIX)
}
