use crate::core::types::{string_or_number, OrderSide, OrderStatus, OrderType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotOrder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type", deserialize_with = "string_or_number")]
    pub order_type: String,
    pub side: String,
    pub amount: Decimal,
    pub price: Decimal,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub finished_at: i64,
    pub cancelled_at: i64,
    pub avg_price: Decimal,
    pub source: String,
    pub fee: Decimal,
    pub fee_currency: String,
    pub filled_amount: Decimal,
    pub filled_cash_amount: Decimal,
    pub filled_fees: Decimal,
}

impl SpotOrder {
    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::from_wire(&self.status)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotTrade {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub symbol: String,
    pub side: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub fee_currency: String,
    pub role: String,
    pub created_at: i64,
}

/// Order together with the fills that executed it
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpotOrderDetail {
    #[serde(flatten)]
    pub order: SpotOrder,
    #[serde(default)]
    pub trades: Vec<SpotTrade>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotTicker {
    pub symbol: String,
    pub high: Decimal,
    pub low: Decimal,
    pub last: Decimal,
    pub vol: Decimal,
    pub amount: Decimal,
    #[serde(rename = "buy")]
    pub buy_price: Decimal,
    #[serde(rename = "sell")]
    pub sell_price: Decimal,
    #[serde(rename = "newCoinFlag")]
    pub new_coin_flag: i32,
    pub change: Decimal,
    pub rose: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TickerList {
    pub date: i64,
    pub ticker: Vec<SpotTicker>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotAccount {
    pub total_asset: Decimal,
    pub coin_list: Vec<CoinBalance>,
    pub normal_count: Decimal,
    pub locked_count: Decimal,
    pub freezing_count: Decimal,
    pub btc_valuation: Decimal,
    pub rmb_valuation: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CoinBalance {
    pub coin: String,
    pub normal: Decimal,
    pub locked: Decimal,
    #[serde(rename = "btcValue")]
    pub btc_value: Decimal,
    #[serde(rename = "rmbValue")]
    pub rmb_value: Decimal,
}

impl CoinBalance {
    pub fn total(&self) -> Decimal {
        self.normal + self.locked
    }
}

/// One page of orders
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderList {
    pub count: i64,
    #[serde(rename = "resultList")]
    pub result_list: Vec<SpotOrder>,
}

/// One page of fills
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TradeList {
    pub count: i64,
    #[serde(rename = "resultList")]
    pub result_list: Vec<SpotTrade>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SymbolCharge {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(rename = "baseAssetPrecision")]
    pub base_asset_precision: i32,
    #[serde(rename = "quoteAssetPrecision")]
    pub quote_asset_precision: i32,
    pub status: String,
    #[serde(rename = "takerCommission")]
    pub taker_commission: Decimal,
    #[serde(rename = "makerCommission")]
    pub maker_commission: Decimal,
    #[serde(rename = "minPrice")]
    pub min_price: Decimal,
    #[serde(rename = "maxPrice")]
    pub max_price: Decimal,
    #[serde(rename = "tickSize")]
    pub tick_size: Decimal,
    #[serde(rename = "minQty")]
    pub min_qty: Decimal,
    #[serde(rename = "maxQty")]
    pub max_qty: Decimal,
    #[serde(rename = "stepSize")]
    pub step_size: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeverageFinanceBalance {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub base_balance: Decimal,
    pub quote_balance: Decimal,
    pub base_borrowed: Decimal,
    pub quote_borrowed: Decimal,
    pub base_interest: Decimal,
    pub quote_interest: Decimal,
    pub base_net_asset: Decimal,
    pub quote_net_asset: Decimal,
    pub margin_level: Decimal,
}

/// New spot order.
///
/// `amount` is sent as the `volume` parameter. For market buys it is the
/// quote amount to spend, otherwise the base quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl CreateOrderRequest {
    pub fn limit(symbol: impl Into<String>, side: OrderSide, amount: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            amount: Some(amount),
            price: Some(price),
            client_order_id: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            amount: Some(amount),
            price: None,
            client_order_id: None,
        }
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }
}

/// Cancel `cancel_order_id` and place `order` in its place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOrderRequest {
    pub cancel_order_id: String,
    pub order: CreateOrderRequest,
}

impl ReplaceOrderRequest {
    pub fn new(cancel_order_id: impl Into<String>, order: CreateOrderRequest) -> Self {
        Self {
            cancel_order_id: cancel_order_id.into(),
            order,
        }
    }
}

/// Orders submitted together through `mass_replace`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOrderRequest {
    pub symbol: String,
    pub orders: Vec<CreateOrderRequest>,
}

/// Numeric order type used by the batch endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrderType {
    Limit = 1,
    Market = 2,
}

impl Serialize for BatchOrderType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Unit of `volume` in a batch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeType {
    /// Quote currency value
    Amount = 1,
    /// Base coin quantity
    Quantity = 2,
}

impl Serialize for VolumeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOrder {
    pub volume: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: BatchOrderType,
    #[serde(rename = "volumeType")]
    pub volume_type: VolumeType,
    #[serde(rename = "clientOrderId", skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchOrderResponse {
    pub success: Vec<BatchOrderResult>,
    pub failed: Vec<BatchOrderResult>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchOrderResult {
    pub index: i64,
    #[serde(rename = "orderId", deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(rename = "clientOrderId", deserialize_with = "string_or_number")]
    pub client_order_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub error: String,
}

/// Filters for the full trade-record query. Unset, zero and empty filters
/// are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeRecordsQuery {
    pub page_size: Option<u32>,
    pub page: Option<u32>,
    pub id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort: Option<u8>,
}

impl TradeRecordsQuery {
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Start after this trade id
    pub fn from_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn between(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    pub fn sort(mut self, sort: u8) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_detail_flattens_order_fields() {
        let detail: SpotOrderDetail = serde_json::from_str(
            r#"{"id":42,"symbol":"btcusdt","side":"BUY","status":"FILLED",
                "amount":"0.5","price":"30000","trades":[{"id":"7","order_id":42,"price":"30000"}]}"#,
        )
        .unwrap();
        assert_eq!(detail.order.id, "42");
        assert_eq!(detail.order.order_status(), OrderStatus::Filled);
        assert_eq!(detail.trades.len(), 1);
        assert_eq!(detail.trades[0].order_id, "42");
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let ticker: SpotTicker = serde_json::from_str(r#"{"symbol":"ethusdt","buy":"1.5"}"#).unwrap();
        assert_eq!(ticker.buy_price, Decimal::from_str("1.5").unwrap());
        assert_eq!(ticker.sell_price, Decimal::ZERO);
        assert_eq!(ticker.new_coin_flag, 0);
    }

    #[test]
    fn test_create_order_json_uses_wire_names() {
        let order = CreateOrderRequest::limit(
            "btcusdt",
            OrderSide::Sell,
            Decimal::from_str("0.1").unwrap(),
            Decimal::from(31_000),
        );
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], "LIMIT");
        assert_eq!(json["side"], "SELL");
        assert_eq!(json["amount"], "0.1");
        assert!(json.get("client_order_id").is_none());
    }

    #[test]
    fn test_batch_order_numeric_enums() {
        let order = BatchOrder {
            volume: Decimal::from(2),
            price: None,
            side: OrderSide::Buy,
            order_type: BatchOrderType::Market,
            volume_type: VolumeType::Amount,
            client_order_id: Some("c-1".to_string()),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], 2);
        assert_eq!(json["volumeType"], 1);
        assert_eq!(json["clientOrderId"], "c-1");
        assert!(json.get("price").is_none());
    }

    #[test]
    fn test_coin_balance_total() {
        let balance: CoinBalance =
            serde_json::from_str(r#"{"coin":"usdt","normal":"10.5","locked":2}"#).unwrap();
        assert_eq!(balance.total(), Decimal::from_str("12.5").unwrap());
    }
}
