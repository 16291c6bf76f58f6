use rust_decimal::Decimal;
use thiserror::Error;

/// # Summary
/// 成交记录构造期的校验错误。
///
/// # Invariants
/// - 只在 `TradeRecord::new` 及枚举文本解析时产生，账本永远不会见到非法记录。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("asset must not be empty")]
    EmptyAsset,
    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(Decimal),
    #[error("price must not be negative, got {0}")]
    NegativePrice(Decimal),
    #[error("quantity {quantity} at price {price} is out of range")]
    OutOfRange { quantity: Decimal, price: Decimal },
    #[error("unknown trade type: {0}")]
    UnknownTradeType(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}
