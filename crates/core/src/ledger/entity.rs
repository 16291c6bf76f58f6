use crate::trade::entity::{ActionType, TradeFields, TradeType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 尚未定价的成交意图。
///
/// 价格由价格源在提交时给出，时间由时钟在提交时给出，
/// 其余字段原样进入 `TradeFields`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub asset: String,
    pub quantity: Decimal,
    pub action: ActionType,
    #[serde(default = "default_trade_type")]
    pub trade_type: TradeType,
    #[serde(default)]
    pub short_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

fn default_trade_type() -> TradeType {
    TradeType::Stock
}

impl TradeRequest {
    pub fn stock(asset: impl Into<String>, quantity: Decimal, action: ActionType) -> Self {
        Self {
            asset: asset.into(),
            quantity,
            action,
            trade_type: TradeType::Stock,
            short_date: None,
            base_currency: None,
            quote_currency: None,
            unit: None,
        }
    }

    /// # Logic
    /// 用成交价格与成交时间补全为构造记录所需的输入。
    pub fn into_fields(self, price: Decimal, time: DateTime<Utc>) -> TradeFields {
        TradeFields {
            asset: self.asset,
            time,
            quantity: self.quantity,
            price,
            trade_type: self.trade_type,
            action: self.action,
            short_date: self.short_date,
            base_currency: self.base_currency,
            quote_currency: self.quote_currency,
            unit: self.unit,
        }
    }
}
