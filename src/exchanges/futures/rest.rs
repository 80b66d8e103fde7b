use crate::client::ByexClient;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{FuturesPayload, RestClient};
use crate::core::types::{Depth, Kline, OrderResponse};
use crate::exchanges::futures::types::{
    FuturesAccount, FuturesBatchOrderRequest, FuturesCapital, FuturesCreateOrderRequest,
    FuturesIndexPrice, FuturesOrder, FuturesPosition, FuturesTicker, FuturesTrade,
    FuturesTransferRequest, MarginAction, MarginType,
};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

/// Typed futures endpoints, authenticated with the `X-CH-*` headers
pub struct FuturesApi<'a, R: RestClient> {
    client: &'a ByexClient<R>,
}

#[derive(Serialize)]
struct ModifyMarginBody<'a> {
    #[serde(rename = "futuresName")]
    futures_name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(rename = "type")]
    action: MarginAction,
}

fn query<const N: usize>(pairs: [(&str, String); N]) -> FuturesPayload {
    FuturesPayload::Query(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// Zero means "let the exchange pick"; it is sent as an empty value, which
/// the futures pipeline drops.
fn limit_param(limit: Option<u32>) -> String {
    limit.filter(|l| *l > 0).map(|l| l.to_string()).unwrap_or_default()
}

impl<'a, R: RestClient> FuturesApi<'a, R> {
    pub(crate) fn new(client: &'a ByexClient<R>) -> Self {
        Self { client }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, payload: FuturesPayload) -> Result<T, ExchangeError> {
        self.client
            .futures_request(Method::GET, path, payload)
            .await?
            .data()
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: FuturesPayload,
    ) -> Result<Vec<T>, ExchangeError> {
        self.client
            .futures_request(Method::GET, path, payload)
            .await?
            .data_or_default()
    }

    async fn send_ack(&self, method: Method, path: &str, payload: FuturesPayload) -> Result<(), ExchangeError> {
        self.client.futures_request(method, path, payload).await?;
        Ok(())
    }

    // Market data

    #[instrument(skip(self))]
    pub async fn get_ticker(&self, symbol: &str) -> Result<FuturesTicker, ExchangeError> {
        self.get("/fapi/v1/ticker", query([("symbol", symbol.to_string())]))
            .await
    }

    /// 24h statistics of every contract
    #[instrument(skip(self))]
    pub async fn get_all_ticker(&self) -> Result<Vec<FuturesTicker>, ExchangeError> {
        self.get_list("/fapi/v1/ticker/24hr", FuturesPayload::None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_depth(&self, symbol: &str, limit: Option<u32>) -> Result<Depth, ExchangeError> {
        self.get(
            "/fapi/v1/depth",
            query([("symbol", symbol.to_string()), ("limit", limit_param(limit))]),
        )
        .await
    }

    /// Order books of every contract, keyed by symbol
    #[instrument(skip(self))]
    pub async fn get_all_futures_depth(&self) -> Result<HashMap<String, Depth>, ExchangeError> {
        self.client
            .futures_request(Method::GET, "/fapi/v1/depth/all", FuturesPayload::None)
            .await?
            .data_or_default()
    }

    #[instrument(skip(self))]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Kline>, ExchangeError> {
        self.get_list(
            "/fapi/v1/klines",
            query([
                ("symbol", symbol.to_string()),
                ("interval", interval.to_string()),
                ("limit", limit_param(limit)),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_index_price(&self, symbol: &str) -> Result<FuturesIndexPrice, ExchangeError> {
        self.get("/fapi/v1/premiumIndex", query([("symbol", symbol.to_string())]))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_index_price(&self) -> Result<Vec<FuturesIndexPrice>, ExchangeError> {
        self.get_list("/fapi/v1/premiumIndex", FuturesPayload::None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_tag_index_price(&self) -> Result<Vec<FuturesIndexPrice>, ExchangeError> {
        self.get_list("/fapi/v1/indexPrice", FuturesPayload::None)
            .await
    }

    /// Contract specifications, left untyped because their shape varies
    /// per contract
    #[instrument(skip(self))]
    pub async fn get_futures(&self) -> Result<Vec<Value>, ExchangeError> {
        self.get_list("/fapi/v1/exchangeInfo", FuturesPayload::None)
            .await
    }

    // Trading

    #[instrument(skip(self, order), fields(symbol = %order.futures_name, side = %order.side))]
    pub async fn create_order(
        &self,
        order: &FuturesCreateOrderRequest,
    ) -> Result<OrderResponse, ExchangeError> {
        self.client
            .futures_request(Method::POST, "/fapi/v1/trade/order", FuturesPayload::json(order)?)
            .await?
            .data_or_default()
    }

    #[instrument(
        skip(self, request),
        fields(symbol = %request.futures_name, orders = request.orders.len())
    )]
    pub async fn batch_create_orders(
        &self,
        request: &FuturesBatchOrderRequest,
    ) -> Result<Vec<OrderResponse>, ExchangeError> {
        self.client
            .futures_request(Method::POST, "/fapi/v1/batchOrders", FuturesPayload::json(request)?)
            .await?
            .data_or_default()
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, futures_name: &str, order_id: &str) -> Result<(), ExchangeError> {
        self.send_ack(
            Method::POST,
            "/fapi/v1/trade/cancel",
            query([
                ("futuresName", futures_name.to_string()),
                ("orderId", order_id.to_string()),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_all_orders(&self, futures_name: &str) -> Result<(), ExchangeError> {
        self.send_ack(
            Method::POST,
            "/fapi/v1/trade/cancelAll",
            query([("futuresName", futures_name.to_string())]),
        )
        .await
    }

    /// Cancel several orders with one `DELETE`; the ids travel in a JSON body
    #[instrument(skip(self, order_ids), fields(orders = order_ids.len()))]
    pub async fn batch_cancel_orders(
        &self,
        futures_name: &str,
        order_ids: &[String],
    ) -> Result<(), ExchangeError> {
        let body = json!({
            "futuresName": futures_name,
            "orderIdList": order_ids,
        });
        self.send_ack(Method::DELETE, "/fapi/v1/batchOrders", FuturesPayload::Json(body))
            .await
    }

    // Orders and fills

    #[instrument(skip(self))]
    pub async fn get_current_orders(&self, futures_name: &str) -> Result<Vec<FuturesOrder>, ExchangeError> {
        self.get_list(
            "/fapi/v1/trade/openOrders",
            query([("futuresName", futures_name.to_string())]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_opening_orders(
        &self,
        futures_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FuturesOrder>, ExchangeError> {
        self.get_list(
            "/fapi/v1/openOrders",
            query([
                ("futuresName", futures_name.to_string()),
                ("limit", limit_param(limit)),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_order_history(
        &self,
        futures_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FuturesOrder>, ExchangeError> {
        self.get_list(
            "/fapi/v1/trade/allOrders",
            query([
                ("futuresName", futures_name.to_string()),
                ("limit", limit_param(limit)),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_order_info(
        &self,
        futures_name: &str,
        order_id: &str,
    ) -> Result<FuturesOrder, ExchangeError> {
        self.get(
            "/fapi/v1/trade/order",
            query([
                ("futuresName", futures_name.to_string()),
                ("orderId", order_id.to_string()),
            ]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_trades(
        &self,
        futures_name: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FuturesTrade>, ExchangeError> {
        self.get_list(
            "/fapi/v1/trade/userTrades",
            query([
                ("futuresName", futures_name.to_string()),
                ("limit", limit_param(limit)),
            ]),
        )
        .await
    }

    /// Fills starting at `from_id` when given
    #[instrument(skip(self))]
    pub async fn get_my_trades(
        &self,
        futures_name: &str,
        from_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<FuturesTrade>, ExchangeError> {
        self.get_list(
            "/fapi/v1/userTrades",
            query([
                ("futuresName", futures_name.to_string()),
                ("fromId", from_id.unwrap_or_default().to_string()),
                ("limit", limit_param(limit)),
            ]),
        )
        .await
    }

    // Positions and account

    /// Open positions, optionally restricted to one contract
    #[instrument(skip(self))]
    pub async fn get_positions(
        &self,
        futures_name: Option<&str>,
    ) -> Result<Vec<FuturesPosition>, ExchangeError> {
        self.get_list(
            "/fapi/v1/position/positions",
            query([("futuresName", futures_name.unwrap_or_default().to_string())]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_positions(&self) -> Result<Vec<FuturesPosition>, ExchangeError> {
        self.get_list("/fapi/v1/positionRisk", FuturesPayload::None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self) -> Result<FuturesAccount, ExchangeError> {
        self.get("/fapi/v1/account/balance", FuturesPayload::None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_future_accounts(&self) -> Result<Vec<FuturesAccount>, ExchangeError> {
        self.get_list("/fapi/v1/account", FuturesPayload::None).await
    }

    #[instrument(skip(self))]
    pub async fn create_future_account(&self) -> Result<(), ExchangeError> {
        self.send_ack(Method::POST, "/fapi/v1/account", FuturesPayload::None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_capital(&self) -> Result<Vec<FuturesCapital>, ExchangeError> {
        self.get_list("/fapi/v1/balance", FuturesPayload::None).await
    }

    #[instrument(skip(self))]
    pub async fn set_leverage(&self, futures_name: &str, leverage: u32) -> Result<(), ExchangeError> {
        let body = json!({
            "futuresName": futures_name,
            "leverage": leverage,
        });
        self.send_ack(Method::POST, "/fapi/v1/position/leverage", FuturesPayload::Json(body))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_margin_type(
        &self,
        futures_name: &str,
        margin_type: MarginType,
    ) -> Result<(), ExchangeError> {
        self.send_ack(
            Method::POST,
            "/fapi/v1/position/marginType",
            query([
                ("futuresName", futures_name.to_string()),
                ("marginType", margin_type.as_str().to_string()),
            ]),
        )
        .await
    }

    /// Add margin to or remove margin from an isolated position
    #[instrument(skip(self))]
    pub async fn modify_margin(
        &self,
        futures_name: &str,
        amount: Decimal,
        action: MarginAction,
    ) -> Result<(), ExchangeError> {
        let body = ModifyMarginBody {
            futures_name,
            amount,
            action,
        };
        self.send_ack(
            Method::POST,
            "/fapi/v1/position/positionMargin",
            FuturesPayload::json(&body)?,
        )
        .await
    }

    #[instrument(skip(self, request), fields(currency = %request.currency))]
    pub async fn fund_transfer(&self, request: &FuturesTransferRequest) -> Result<(), ExchangeError> {
        self.send_ack(Method::POST, "/fapi/v1/transfer", FuturesPayload::json(request)?)
            .await
    }
}
