pub mod conversions;
pub mod rest;
pub mod types;

pub use conversions::format_decimal;
pub use rest::SpotApi;
pub use types::{
    BatchOrder, BatchOrderRequest, BatchOrderResponse, BatchOrderResult, BatchOrderType,
    CoinBalance, CreateOrderRequest, LeverageFinanceBalance, OrderList, ReplaceOrderRequest,
    SpotAccount, SpotOrder, SpotOrderDetail, SpotTicker, SpotTrade, SymbolCharge, TickerList,
    TradeList, TradeRecordsQuery, VolumeType,
};
