use crate::core::errors::ExchangeError;
use crate::core::kernel::SpotParams;
use crate::exchanges::spot::types::{CreateOrderRequest, ReplaceOrderRequest, TradeRecordsQuery};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;

/// Plain decimal notation without trailing zeros
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn params<const N: usize>(pairs: [(&str, String); N]) -> SpotParams {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Insert `value` only when it is set and greater than zero
pub(crate) fn insert_positive<T>(params: &mut SpotParams, key: &str, value: Option<T>)
where
    T: PartialOrd + Default + Display,
{
    if let Some(value) = value.filter(|v| *v > T::default()) {
        params.insert(key.to_string(), value.to_string());
    }
}

/// Insert `value` only when it is set and non-empty
pub(crate) fn insert_non_empty(params: &mut SpotParams, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.insert(key.to_string(), value.to_string());
    }
}

/// Insert `value` only when it is set and non-zero
pub(crate) fn insert_decimal(params: &mut SpotParams, key: &str, value: Option<Decimal>) {
    if let Some(value) = value.filter(|v| !v.is_zero()) {
        params.insert(key.to_string(), format_decimal(value));
    }
}

/// Encode a structured value as the JSON text some spot parameters carry
pub(crate) fn json_param<T: Serialize + ?Sized>(value: &T) -> Result<String, ExchangeError> {
    serde_json::to_string(value).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to encode JSON parameter: {}", e))
    })
}

pub(crate) fn page_params(symbol: &str, page_size: Option<u32>, page: Option<u32>) -> SpotParams {
    let mut params = params([("symbol", symbol.to_string())]);
    insert_positive(&mut params, "pageSize", page_size);
    insert_positive(&mut params, "page", page);
    params
}

pub(crate) fn create_order_params(order: &CreateOrderRequest) -> SpotParams {
    let mut params = params([
        ("symbol", order.symbol.clone()),
        ("side", order.side.to_string()),
        ("type", order.order_type.to_string()),
    ]);
    insert_decimal(&mut params, "volume", order.amount);
    insert_decimal(&mut params, "price", order.price);
    insert_non_empty(&mut params, "client_order_id", order.client_order_id.as_deref());
    params
}

pub(crate) fn replace_order_params(request: &ReplaceOrderRequest) -> SpotParams {
    let mut params = create_order_params(&request.order);
    params.insert("cancel_order".to_string(), request.cancel_order_id.clone());
    params
}

pub(crate) fn trade_records_params(symbol: &str, query: &TradeRecordsQuery) -> SpotParams {
    let mut params = page_params(symbol, query.page_size, query.page);
    insert_positive(&mut params, "id", query.id);
    insert_non_empty(&mut params, "startDate", query.start_date.as_deref());
    insert_non_empty(&mut params, "endDate", query.end_date.as_deref());
    insert_positive(&mut params, "sort", query.sort);
    params
}
