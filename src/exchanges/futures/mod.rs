pub mod rest;
pub mod types;

pub use rest::FuturesApi;
pub use types::{
    FuturesAccount, FuturesBatchOrderRequest, FuturesCapital, FuturesCreateOrderRequest,
    FuturesIndexPrice, FuturesOrder, FuturesPosition, FuturesTicker, FuturesTrade,
    FuturesTransferRequest, MarginAction, MarginType, PositionAction, TransferDirection,
};
