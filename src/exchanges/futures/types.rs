use crate::core::types::{string_or_number, OrderSide, OrderStatus, OrderType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FuturesOrder {
    #[serde(rename = "orderId", deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(rename = "clientOrderId", deserialize_with = "string_or_number")]
    pub client_order_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    pub open: String,
    #[serde(rename = "positionType", deserialize_with = "string_or_number")]
    pub position_type: String,
    pub price: Decimal,
    pub volume: Decimal,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FuturesOrder {
    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::from_wire(&self.status)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FuturesTrade {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub symbol: String,
    pub side: String,
    pub volume: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuturesPosition {
    pub symbol: String,
    pub position_side: String,
    pub position_amt: Decimal,
    pub avg_price: Decimal,
    pub unrealized_pnl: Decimal,
    pub realized_pnl: Decimal,
    #[serde(deserialize_with = "string_or_number")]
    pub margin_type: String,
    pub initial_margin: Decimal,
    pub maintenance_margin: Decimal,
    pub position_value: Decimal,
    pub leverage: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuturesAccount {
    #[serde(deserialize_with = "string_or_number")]
    pub account_id: String,
    pub collateral_coin: String,
    pub account_balance: Decimal,
    pub total_margin: Decimal,
    pub total_pnl: Decimal,
    pub available_margin: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuturesTicker {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub last_price: Decimal,
    pub last_qty: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub open_time: i64,
    pub close_time: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuturesIndexPrice {
    pub symbol: String,
    pub index_price: Decimal,
    pub time: i64,
}

/// Per-asset wallet and margin figures
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuturesCapital {
    pub asset: String,
    pub wallet_balance: Decimal,
    pub unrealized_pnl: Decimal,
    pub margin_balance: Decimal,
    pub maint_margin: Decimal,
    pub initial_margin: Decimal,
    pub position_initial_margin: Decimal,
    pub open_order_initial_margin: Decimal,
    pub cross_wallet_balance: Decimal,
    pub cross_un_pnl: Decimal,
    pub available_balance: Decimal,
    pub max_withdraw_amount: Decimal,
}

/// Whether an order opens or closes a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionAction {
    Open,
    Close,
}

/// Margin mode of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginType {
    #[serde(rename = "1")]
    Cross,
    #[serde(rename = "2")]
    Isolated,
}

impl MarginType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cross => "1",
            Self::Isolated => "2",
        }
    }
}

/// Direction of a position margin adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginAction {
    Add = 1,
    Reduce = 2,
}

impl Serialize for MarginAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    SpotToFutures = 1,
    FuturesToSpot = 2,
}

impl Serialize for TransferDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuturesCreateOrderRequest {
    #[serde(rename = "futuresName")]
    pub futures_name: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub open: PositionAction,
    #[serde(rename = "positionType")]
    pub position_type: MarginType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub volume: Decimal,
    #[serde(rename = "clientOrderId", skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl FuturesCreateOrderRequest {
    pub fn limit(
        futures_name: impl Into<String>,
        side: OrderSide,
        open: PositionAction,
        volume: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            futures_name: futures_name.into(),
            order_type: OrderType::Limit,
            side,
            open,
            position_type: MarginType::Cross,
            price: Some(price),
            volume,
            client_order_id: None,
        }
    }

    pub fn market(
        futures_name: impl Into<String>,
        side: OrderSide,
        open: PositionAction,
        volume: Decimal,
    ) -> Self {
        Self {
            futures_name: futures_name.into(),
            order_type: OrderType::Market,
            side,
            open,
            position_type: MarginType::Cross,
            price: None,
            volume,
            client_order_id: None,
        }
    }

    pub fn with_margin_type(mut self, position_type: MarginType) -> Self {
        self.position_type = position_type;
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuturesBatchOrderRequest {
    #[serde(rename = "futuresName")]
    pub futures_name: String,
    pub orders: Vec<FuturesCreateOrderRequest>,
}

/// Move funds between the spot and futures wallets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuturesTransferRequest {
    pub currency: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub direction: TransferDirection,
}

impl FuturesTransferRequest {
    pub fn new(currency: impl Into<String>, amount: Decimal, direction: TransferDirection) -> Self {
        Self {
            currency: currency.into(),
            amount,
            direction,
        }
    }
}
