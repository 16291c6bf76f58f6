use super::error::ValidationError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 成交的资产类别，决定哪些可选描述字段有意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TradeType {
    /// 股票
    Stock,
    /// 外汇 (携带 base/quote 货币对)
    Currency,
    /// 大宗商品 (携带计量单位)
    Commodity,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Stock => "Stock",
            TradeType::Currency => "Currency",
            TradeType::Commodity => "Commodity",
        }
    }
}

impl FromStr for TradeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(TradeType::Stock),
            "currency" => Ok(TradeType::Currency),
            "commodity" => Ok(TradeType::Commodity),
            _ => Err(ValidationError::UnknownTradeType(s.to_string())),
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Summary
/// 成交动作，决定持仓更新的方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ActionType {
    /// 买入 (开多或平空)
    Buy,
    /// 卖出 (平多或加空)
    Sell,
    /// 融券卖空 (始终视为开空/加空)
    Short,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Buy => "Buy",
            ActionType::Sell => "Sell",
            ActionType::Short => "Short",
        }
    }
}

impl FromStr for ActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(ActionType::Buy),
            "sell" => Ok(ActionType::Sell),
            "short" => Ok(ActionType::Short),
            _ => Err(ValidationError::UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Summary
/// 资产类别及其专属描述字段。
///
/// # Invariants
/// - 货币对只能出现在 `Currency`，计量单位只能出现在 `Commodity`，
///   因此不可能残留与类别无关的字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instrument {
    Stock,
    Currency {
        base_currency: Option<String>,
        quote_currency: Option<String>,
    },
    Commodity {
        unit: Option<String>,
    },
}

impl Instrument {
    pub fn trade_type(&self) -> TradeType {
        match self {
            Instrument::Stock => TradeType::Stock,
            Instrument::Currency { .. } => TradeType::Currency,
            Instrument::Commodity { .. } => TradeType::Commodity,
        }
    }
}

/// # Summary
/// 成交动作及其专属描述字段。
///
/// # Invariants
/// - 融券日期只能出现在 `Short`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Short { short_date: Option<DateTime<Utc>> },
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Buy => ActionType::Buy,
            Action::Sell => ActionType::Sell,
            Action::Short { .. } => ActionType::Short,
        }
    }
}

/// # Summary
/// 构造成交记录的扁平输入。
///
/// 调用方可以随意填写可选字段，与 (trade_type, action) 组合无关的字段
/// 会在 `TradeRecord::new` 中被静默丢弃。
#[derive(Debug, Clone)]
pub struct TradeFields {
    pub asset: String,
    pub time: DateTime<Utc>,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_type: TradeType,
    pub action: ActionType,
    pub short_date: Option<DateTime<Utc>>,
    pub base_currency: Option<String>,
    pub quote_currency: Option<String>,
    pub unit: Option<String>,
}

impl TradeFields {
    /// # Logic
    /// 以最常见的股票成交为模板创建输入，可选字段全部为空。
    pub fn stock(
        asset: impl Into<String>,
        time: DateTime<Utc>,
        quantity: Decimal,
        price: Decimal,
        action: ActionType,
    ) -> Self {
        Self {
            asset: asset.into(),
            time,
            quantity,
            price,
            trade_type: TradeType::Stock,
            action,
            short_date: None,
            base_currency: None,
            quote_currency: None,
            unit: None,
        }
    }

    pub fn with_trade_type(mut self, trade_type: TradeType) -> Self {
        self.trade_type = trade_type;
        self
    }

    pub fn with_short_date(mut self, short_date: DateTime<Utc>) -> Self {
        self.short_date = Some(short_date);
        self
    }

    pub fn with_currency_pair(mut self, base: impl Into<String>, quote: impl Into<String>) -> Self {
        self.base_currency = Some(base.into());
        self.quote_currency = Some(quote.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// # Summary
/// 一笔已执行成交的不可变记录。
///
/// # Invariants
/// - `asset` 非空，`quantity > 0`，`price >= 0`。
/// - `quantity * price` 可以用 `Decimal` 表示，`notional` 不会溢出。
/// - 方向由 `action` 决定，数量永远为正。
/// - 构造后不可修改，字段只通过访问器暴露。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TradeRow", try_from = "TradeRow")]
pub struct TradeRecord {
    asset: String,
    time: DateTime<Utc>,
    quantity: Decimal,
    price: Decimal,
    instrument: Instrument,
    action: Action,
}

impl TradeRecord {
    /// # Summary
    /// 校验输入并构造成交记录。
    ///
    /// # Logic
    /// 1. 拒绝空资产、非正数量、负价格。
    /// 2. 拒绝名义金额超出 `Decimal` 表示范围的数量与价格组合。
    /// 3. 按 trade_type 与 action 挑选有效的可选字段，其余静默丢弃。
    ///
    /// # Returns
    /// * `Ok(TradeRecord)` - 合法且已清洗的记录
    /// * `Err(ValidationError)` - 首个被违反的约束
    pub fn new(fields: TradeFields) -> Result<Self, ValidationError> {
        let asset = fields.asset.trim();
        if asset.is_empty() {
            return Err(ValidationError::EmptyAsset);
        }
        if fields.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(fields.quantity));
        }
        if fields.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(fields.price));
        }
        if fields.quantity.checked_mul(fields.price).is_none() {
            return Err(ValidationError::OutOfRange {
                quantity: fields.quantity,
                price: fields.price,
            });
        }

        let instrument = match fields.trade_type {
            TradeType::Stock => Instrument::Stock,
            TradeType::Currency => Instrument::Currency {
                base_currency: fields.base_currency,
                quote_currency: fields.quote_currency,
            },
            TradeType::Commodity => Instrument::Commodity { unit: fields.unit },
        };
        let action = match fields.action {
            ActionType::Buy => Action::Buy,
            ActionType::Sell => Action::Sell,
            ActionType::Short => Action::Short {
                short_date: fields.short_date,
            },
        };

        Ok(Self {
            asset: asset.to_string(),
            time: fields.time,
            quantity: fields.quantity,
            price: fields.price,
            instrument,
            action,
        })
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn trade_type(&self) -> TradeType {
        self.instrument.trade_type()
    }

    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }

    pub fn short_date(&self) -> Option<DateTime<Utc>> {
        match &self.action {
            Action::Short { short_date } => *short_date,
            _ => None,
        }
    }

    pub fn base_currency(&self) -> Option<&str> {
        match &self.instrument {
            Instrument::Currency { base_currency, .. } => base_currency.as_deref(),
            _ => None,
        }
    }

    pub fn quote_currency(&self) -> Option<&str> {
        match &self.instrument {
            Instrument::Currency { quote_currency, .. } => quote_currency.as_deref(),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.instrument {
            Instrument::Commodity { unit } => unit.as_deref(),
            _ => None,
        }
    }

    /// 成交名义金额 (数量 * 价格)，恒为非负。
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }

    /// 导出为带字面量键名的行结构。
    pub fn to_row(&self) -> TradeRow {
        TradeRow::from(self)
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} units of {} ({}) at {} on {}",
            self.action_type(),
            self.quantity,
            self.asset,
            self.trade_type(),
            self.price,
            self.time
        )?;
        if let Instrument::Currency {
            base_currency,
            quote_currency,
        } = &self.instrument
        {
            write!(
                f,
                ", Currency Pair: {}/{}",
                base_currency.as_deref().unwrap_or("None"),
                quote_currency.as_deref().unwrap_or("None")
            )?;
        }
        if let Instrument::Commodity { unit } = &self.instrument {
            write!(f, ", Unit: {}", unit.as_deref().unwrap_or("None"))?;
        }
        if let Action::Short { short_date } = &self.action {
            match short_date {
                Some(date) => write!(f, ", Short Date: {}", date)?,
                None => write!(f, ", Short Date: None")?,
            }
        }
        Ok(())
    }
}

/// # Summary
/// 成交记录的导出行，键名与历史导出接口约定的字面量一致。
///
/// # Invariants
/// - 与记录类别/动作无关的字段恒为 `null`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TradeRow {
    #[serde(rename = "Asset")]
    #[schema(example = "AAPL")]
    pub asset: String,
    #[serde(rename = "Quantity")]
    #[schema(example = 10)]
    pub quantity: Decimal,
    #[serde(rename = "Price")]
    #[schema(example = 150.25)]
    pub price: Decimal,
    #[serde(rename = "Trade Type")]
    pub trade_type: TradeType,
    #[serde(rename = "Action")]
    pub action: ActionType,
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "Short Date")]
    pub short_date: Option<DateTime<Utc>>,
    #[serde(rename = "Base Currency")]
    pub base_currency: Option<String>,
    #[serde(rename = "Quote Currency")]
    pub quote_currency: Option<String>,
    #[serde(rename = "Unit")]
    pub unit: Option<String>,
}

impl From<&TradeRecord> for TradeRow {
    fn from(t: &TradeRecord) -> Self {
        Self {
            asset: t.asset.clone(),
            quantity: t.quantity,
            price: t.price,
            trade_type: t.trade_type(),
            action: t.action_type(),
            time: t.time,
            short_date: t.short_date(),
            base_currency: t.base_currency().map(str::to_string),
            quote_currency: t.quote_currency().map(str::to_string),
            unit: t.unit().map(str::to_string),
        }
    }
}

impl From<TradeRecord> for TradeRow {
    fn from(t: TradeRecord) -> Self {
        TradeRow::from(&t)
    }
}

impl TryFrom<TradeRow> for TradeRecord {
    type Error = ValidationError;

    fn try_from(row: TradeRow) -> Result<Self, Self::Error> {
        TradeRecord::new(TradeFields {
            asset: row.asset,
            time: row.time,
            quantity: row.quantity,
            price: row.price,
            trade_type: row.trade_type,
            action: row.action,
            short_date: row.short_date,
            base_currency: row.base_currency,
            quote_currency: row.quote_currency,
            unit: row.unit,
        })
    }
}

/// # Summary
/// 单一资产的聚合持仓。
///
/// # Invariants
/// - `quantity` 正数为多头，负数为空头，零为空仓。
/// - `average_price` 恒非负，仅在 `quantity != 0` 时有意义。
/// - `trade_type` 取自创建该持仓的首笔成交。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AggregatedPosition {
    pub asset: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub trade_type: TradeType,
}

impl AggregatedPosition {
    /// # Logic
    /// 初始化一个空仓位
    pub fn flat(asset: impl Into<String>, trade_type: TradeType) -> Self {
        Self {
            asset: asset.into(),
            quantity: Decimal::ZERO,
            average_price: Decimal::ZERO,
            trade_type,
        }
    }

    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }
}

/// # Summary
/// 盈亏快照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct PnlSnapshot {
    /// 已实现盈亏 (平仓锁定)
    pub realized: Decimal,
    /// 未实现盈亏 (最近一次重估)
    pub unrealized: Decimal,
    /// realized + unrealized
    pub total: Decimal,
}

impl PnlSnapshot {
    pub fn new(realized: Decimal, unrealized: Decimal) -> Self {
        Self {
            realized,
            unrealized,
            total: realized + unrealized,
        }
    }
}
