//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。
//! 字段键名沿用前端看板既有的字面量（如 `Average_Price`、`Trade Type`）。

use chrono::{DateTime, Utc};
use folio_core::ledger::entity::TradeRequest;
use folio_core::market::entity::PricePoint;
use folio_core::trade::entity::{ActionType, AggregatedPosition, TradeType};
use folio_core::trade::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

// ============================================================
//  成交相关 DTO
// ============================================================

/// 提交成交请求体。价格由服务端报价源给出，时间由服务端时钟给出。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MakeTradeRequest {
    /// 资产代码
    #[schema(example = "AAPL")]
    pub asset: String,
    /// 成交数量 (必须为正)
    #[schema(value_type = f64, example = 10)]
    pub quantity: Decimal,
    /// 动作 (Buy / Sell / Short，大小写不敏感)
    #[schema(example = "Buy")]
    pub action: String,
    /// 资产类别 (Stock / Currency / Commodity)，缺省为 Stock
    #[serde(default)]
    #[schema(example = "Stock")]
    pub trade_type: Option<String>,
    /// 融券日期，仅 Short 保留
    #[serde(default)]
    pub short_date: Option<DateTime<Utc>>,
    /// 基础货币，仅 Currency 保留
    #[serde(default)]
    pub base_currency: Option<String>,
    /// 计价货币，仅 Currency 保留
    #[serde(default)]
    pub quote_currency: Option<String>,
    /// 计量单位，仅 Commodity 保留
    #[serde(default)]
    pub unit: Option<String>,
}

impl MakeTradeRequest {
    pub fn new(asset: impl Into<String>, quantity: Decimal, action: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            quantity,
            action: action.into(),
            trade_type: None,
            short_date: None,
            base_currency: None,
            quote_currency: None,
            unit: None,
        }
    }
}

/// 文本形式的动作与类别在此解析，非法取值以校验错误返回 (400)。
impl TryFrom<MakeTradeRequest> for TradeRequest {
    type Error = ValidationError;

    fn try_from(req: MakeTradeRequest) -> Result<Self, Self::Error> {
        let action: ActionType = req.action.parse()?;
        let trade_type = match req.trade_type.as_deref() {
            Some(t) => t.parse()?,
            None => TradeType::Stock,
        };
        Ok(TradeRequest {
            asset: req.asset,
            quantity: req.quantity,
            action,
            trade_type,
            short_date: req.short_date,
            base_currency: req.base_currency,
            quote_currency: req.quote_currency,
            unit: req.unit,
        })
    }
}

// ============================================================
//  持仓与资金 DTO
// ============================================================

/// 聚合持仓 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionResponse {
    /// 资产代码
    #[serde(rename = "Asset")]
    #[schema(example = "AAPL")]
    pub asset: String,
    /// 持仓数量 (正=多头, 负=空头)
    #[serde(rename = "Quantity")]
    #[schema(value_type = f64, example = 10)]
    pub quantity: Decimal,
    /// 持仓均价
    #[serde(rename = "Average_Price")]
    #[schema(value_type = f64, example = 150.25)]
    pub average_price: Decimal,
    /// 首笔成交的资产类别
    #[serde(rename = "Trade Type")]
    pub trade_type: TradeType,
}

impl From<AggregatedPosition> for PositionResponse {
    fn from(p: AggregatedPosition) -> Self {
        Self {
            asset: p.asset,
            quantity: p.quantity,
            average_price: p.average_price,
            trade_type: p.trade_type,
        }
    }
}

/// 现金余额 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    #[serde(rename = "Balance")]
    #[schema(value_type = f64, example = 99680)]
    pub balance: Decimal,
}

// ============================================================
//  行情与估值 DTO
// ============================================================

/// 报价查询请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetPriceRequest {
    #[serde(rename = "Ticker", default)]
    #[schema(example = "AAPL")]
    pub ticker: Option<String>,
}

/// 报价查询响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetPriceResponse {
    #[serde(rename = "Price")]
    #[schema(value_type = f64, example = 150.25)]
    pub price: Decimal,
}

/// 历史收盘价请求体，区间与周期缺省为一个月日线
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryRequest {
    #[serde(rename = "Ticker", default)]
    #[schema(example = "AAPL")]
    pub ticker: Option<String>,
    /// 回看区间 (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[serde(rename = "Period", default)]
    #[schema(example = "1mo")]
    pub period: Option<String>,
    /// 采样周期 (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
    #[serde(rename = "Interval", default)]
    #[schema(example = "1d")]
    pub interval: Option<String>,
}

/// 历史收盘价，键为 RFC 3339 时间，按时间升序
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = BTreeMap<String, f64>)]
pub struct HistoryResponse(pub BTreeMap<String, Decimal>);

impl From<Vec<PricePoint>> for HistoryResponse {
    fn from(points: Vec<PricePoint>) -> Self {
        Self(
            points
                .into_iter()
                .map(|p| (p.time.to_rfc3339(), p.close))
                .collect(),
        )
    }
}

/// 按价格快照重估请求体，未列出的资产按持仓均价处理
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RevalueRequest {
    #[serde(default)]
    #[schema(value_type = HashMap<String, f64>)]
    pub prices: HashMap<String, Decimal>,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
