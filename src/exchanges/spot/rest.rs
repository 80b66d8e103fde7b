use crate::client::ByexClient;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, SpotParams};
use crate::core::types::{Depth, Kline, OrderResponse};
use crate::exchanges::spot::conversions::{
    create_order_params, json_param, page_params, params, replace_order_params,
    trade_records_params,
};
use crate::exchanges::spot::types::{
    BatchOrder, BatchOrderRequest, BatchOrderResponse, CoinBalance, CreateOrderRequest,
    LeverageFinanceBalance, OrderList, ReplaceOrderRequest, SpotAccount, SpotOrder,
    SpotOrderDetail, SpotTicker, SymbolCharge, TickerList, TradeList, TradeRecordsQuery,
};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::instrument;

/// Typed spot ("exchange") endpoints, signed with the spot MD5 scheme
pub struct SpotApi<'a, R: RestClient> {
    client: &'a ByexClient<R>,
}

impl<'a, R: RestClient> SpotApi<'a, R> {
    pub(crate) fn new(client: &'a ByexClient<R>) -> Self {
        Self { client }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: SpotParams) -> Result<T, ExchangeError> {
        self.client.spot_request(Method::GET, path, params).await?.data()
    }

    async fn get_or_default<T>(&self, path: &str, params: SpotParams) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned + Default,
    {
        self.client
            .spot_request(Method::GET, path, params)
            .await?
            .data_or_default()
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, params: SpotParams) -> Result<T, ExchangeError> {
        self.client.spot_request(Method::POST, path, params).await?.data()
    }

    /// POST for order acknowledgements: once the exchange accepted the
    /// order a missing payload must not surface as an error.
    async fn post_or_default<T>(&self, path: &str, params: SpotParams) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned + Default,
    {
        self.client
            .spot_request(Method::POST, path, params)
            .await?
            .data_or_default()
    }

    /// POST whose only interesting outcome is success or failure
    async fn post_ack(&self, path: &str, params: SpotParams) -> Result<(), ExchangeError> {
        self.client.spot_request(Method::POST, path, params).await?;
        Ok(())
    }

    // Market data

    #[instrument(skip(self))]
    pub async fn get_all_ticker(&self) -> Result<TickerList, ExchangeError> {
        self.get("/open/api/get_allticker", SpotParams::new()).await
    }

    #[instrument(skip(self))]
    pub async fn get_ticker(&self, symbol: &str) -> Result<SpotTicker, ExchangeError> {
        self.get("/open/api/get_ticker", params([("symbol", symbol.to_string())]))
            .await
    }

    /// Order book. `depth_type` selects the exchange's merge level.
    #[instrument(skip(self))]
    pub async fn get_depth(&self, symbol: &str, depth_type: u32) -> Result<Depth, ExchangeError> {
        self.get(
            "/open/api/market_dept",
            params([
                ("symbol", symbol.to_string()),
                ("type", depth_type.to_string()),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_klines(
        &self,
        symbol: &str,
        period: &str,
        size: u32,
    ) -> Result<Vec<Kline>, ExchangeError> {
        self.get_or_default(
            "/open/api/get_records",
            params([
                ("symbol", symbol.to_string()),
                ("period", period.to_string()),
                ("size", size.to_string()),
            ]),
        )
        .await
    }

    /// Latest price of every trading pair, keyed by symbol
    #[instrument(skip(self))]
    pub async fn get_market_prices(&self) -> Result<HashMap<String, Decimal>, ExchangeError> {
        self.get_or_default("/open/api/market", SpotParams::new()).await
    }

    #[instrument(skip(self))]
    pub async fn get_symbols_charge(&self) -> Result<Vec<SymbolCharge>, ExchangeError> {
        self.get_or_default("/open/api/common/symbols", SpotParams::new())
            .await
    }

    // Trading

    #[instrument(skip(self, order), fields(symbol = %order.symbol, side = %order.side))]
    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<OrderResponse, ExchangeError> {
        self.post_or_default("/open/api/create_order", create_order_params(order))
            .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<(), ExchangeError> {
        self.post_ack(
            "/open/api/cancel_order",
            params([
                ("symbol", symbol.to_string()),
                ("order_id", order_id.to_string()),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self, symbol: &str) -> Result<(), ExchangeError> {
        self.post_ack(
            "/open/api/cancel_order_all",
            params([("symbol", symbol.to_string())]),
        )
        .await
    }

    /// Submit several orders in one call. The orders travel as a JSON
    /// array in the `orders_data` parameter.
    #[instrument(skip(self, request), fields(symbol = %request.symbol, orders = request.orders.len()))]
    pub async fn mass_replace(&self, request: &BatchOrderRequest) -> Result<(), ExchangeError> {
        let params = params([
            ("symbol", request.symbol.clone()),
            ("orders_data", json_param(&request.orders)?),
        ]);
        self.post_ack("/open/api/mass_replace", params).await
    }

    #[instrument(skip(self, orders), fields(orders = orders.len()))]
    pub async fn batch_place_orders(
        &self,
        symbol: &str,
        orders: &[BatchOrder],
    ) -> Result<BatchOrderResponse, ExchangeError> {
        let params = params([
            ("symbol", symbol.to_string()),
            ("orderList", json_param(orders)?),
        ]);
        self.post("/open/api/batchOrders", params).await
    }

    #[instrument(skip(self, order_ids), fields(orders = order_ids.len()))]
    pub async fn batch_cancel_orders(
        &self,
        symbol: &str,
        order_ids: &[String],
    ) -> Result<(), ExchangeError> {
        let params = params([
            ("symbol", symbol.to_string()),
            ("orderIds", json_param(order_ids)?),
        ]);
        self.post_ack("/open/api/batchCancelOrders", params).await
    }

    #[instrument(
        skip(self, request),
        fields(symbol = %request.order.symbol, cancel_order = %request.cancel_order_id)
    )]
    pub async fn replace_order(&self, request: &ReplaceOrderRequest) -> Result<OrderResponse, ExchangeError> {
        self.post_or_default("/open/api/replace_order", replace_order_params(request))
            .await
    }

    // Orders and fills

    /// Orders still working on the book
    #[instrument(skip(self))]
    pub async fn get_current_orders(
        &self,
        symbol: &str,
        page_size: Option<u32>,
        page: Option<u32>,
    ) -> Result<OrderList, ExchangeError> {
        self.get_or_default("/open/api/v2/new_order", page_params(symbol, page_size, page))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_order_history(
        &self,
        symbol: &str,
        page_size: Option<u32>,
        page: Option<u32>,
    ) -> Result<OrderList, ExchangeError> {
        self.get_or_default("/open/api/v2/all_order", page_params(symbol, page_size, page))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_order_info(&self, symbol: &str, order_id: &str) -> Result<SpotOrder, ExchangeError> {
        self.get("/open/api/order_info", order_params(symbol, order_id))
            .await
    }

    /// Same endpoint as [`SpotApi::get_order_info`], also decoding the fills
    #[instrument(skip(self))]
    pub async fn get_order_detail(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> Result<SpotOrderDetail, ExchangeError> {
        self.get("/open/api/order_info", order_params(symbol, order_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_trades(
        &self,
        symbol: &str,
        page_size: Option<u32>,
        page: Option<u32>,
    ) -> Result<TradeList, ExchangeError> {
        self.get_or_default("/open/api/v2/my_trades", page_params(symbol, page_size, page))
            .await
    }

    #[instrument(skip(self, query))]
    pub async fn get_all_trading_records(
        &self,
        symbol: &str,
        query: &TradeRecordsQuery,
    ) -> Result<TradeList, ExchangeError> {
        self.get_or_default("/open/api/all_trade", trade_records_params(symbol, query))
            .await
    }

    // Account

    #[instrument(skip(self))]
    pub async fn get_account(&self) -> Result<SpotAccount, ExchangeError> {
        self.get("/open/api/user/account", SpotParams::new()).await
    }

    /// Balances of `coins`, or of every coin when `coins` is empty
    #[instrument(skip(self))]
    pub async fn get_balance(&self, coins: &[&str]) -> Result<Vec<CoinBalance>, ExchangeError> {
        let mut params = SpotParams::new();
        if !coins.is_empty() {
            params.insert("coins".to_string(), json_param(coins)?);
        }
        let account: SpotAccount = self.get("/open/api/user/account", params).await?;
        Ok(account.coin_list)
    }

    #[instrument(skip(self))]
    pub async fn get_leverage_finance_balance(
        &self,
        symbol: &str,
    ) -> Result<LeverageFinanceBalance, ExchangeError> {
        self.get(
            "/open/api/leverFinance/account",
            params([("symbol", symbol.to_string())]),
        )
        .await
    }
}

fn order_params(symbol: &str, order_id: &str) -> SpotParams {
    params([
        ("symbol", symbol.to_string()),
        ("order_id", order_id.to_string()),
    ])
}
