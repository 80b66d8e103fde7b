//! Client for the 100EX spot and futures REST APIs.
//!
//! ```rust,no_run
//! use byex::{ByexBuilder, ExchangeConfig};
//!
//! # async fn example() -> Result<(), byex::ExchangeError> {
//! let client = ByexBuilder::new()
//!     .with_config(ExchangeConfig::read_only())
//!     .with_testnet(true)
//!     .build()?;
//!
//! let ticker = client.spot().get_ticker("btcusdt").await?;
//! let depth = client.futures().get_depth("E-BTC-USDT", Some(20)).await?;
//! println!("{} last={} best_bid={:?}", ticker.symbol, ticker.last, depth.best_bid());
//! # Ok(())
//! # }
//! ```
pub mod builder;
pub mod client;
pub mod core;
pub mod exchanges;

pub use builder::{build_client, ByexBuilder};
pub use client::ByexClient;
pub use core::config::{ConfigError, ExchangeConfig};
pub use core::errors::ExchangeError;
pub use core::types::{
    ApiFamily, Depth, Envelope, Kline, OrderResponse, OrderSide, OrderStatus, OrderType,
};
pub use exchanges::futures::FuturesApi;
pub use exchanges::spot::SpotApi;
