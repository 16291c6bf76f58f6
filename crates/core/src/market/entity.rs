use crate::market::error::PriceError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 收盘价序列中的一个点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    /// 该根 K 线的开始时间
    pub time: DateTime<Utc>,
    /// 收盘价
    #[schema(value_type = f64)]
    pub close: Decimal,
}

/// # Summary
/// 历史行情的回看区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryPeriod {
    Day1,
    Day5,
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Year10,
    Ytd,
    Max,
}

impl HistoryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::Day1 => "1d",
            HistoryPeriod::Day5 => "5d",
            HistoryPeriod::Month1 => "1mo",
            HistoryPeriod::Month3 => "3mo",
            HistoryPeriod::Month6 => "6mo",
            HistoryPeriod::Year1 => "1y",
            HistoryPeriod::Year2 => "2y",
            HistoryPeriod::Year5 => "5y",
            HistoryPeriod::Year10 => "10y",
            HistoryPeriod::Ytd => "ytd",
            HistoryPeriod::Max => "max",
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(HistoryPeriod::Day1),
            "5d" => Ok(HistoryPeriod::Day5),
            "1mo" => Ok(HistoryPeriod::Month1),
            "3mo" => Ok(HistoryPeriod::Month3),
            "6mo" => Ok(HistoryPeriod::Month6),
            "1y" => Ok(HistoryPeriod::Year1),
            "2y" => Ok(HistoryPeriod::Year2),
            "5y" => Ok(HistoryPeriod::Year5),
            "10y" => Ok(HistoryPeriod::Year10),
            "ytd" => Ok(HistoryPeriod::Ytd),
            "max" => Ok(HistoryPeriod::Max),
            _ => Err(PriceError::InvalidQuery(format!("unknown period: {}", s))),
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Summary
/// 历史行情的采样周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryInterval {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 30分钟
    Minute30,
    // 1小时
    Hour1,
    // 1日
    Day1,
    // 1周
    Week1,
    // 1月
    Month1,
}

impl HistoryInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::Minute1 => "1m",
            HistoryInterval::Minute5 => "5m",
            HistoryInterval::Minute15 => "15m",
            HistoryInterval::Minute30 => "30m",
            HistoryInterval::Hour1 => "60m",
            HistoryInterval::Day1 => "1d",
            HistoryInterval::Week1 => "1wk",
            HistoryInterval::Month1 => "1mo",
        }
    }
}

impl FromStr for HistoryInterval {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Ok(HistoryInterval::Minute1),
            "5m" => Ok(HistoryInterval::Minute5),
            "15m" => Ok(HistoryInterval::Minute15),
            "30m" => Ok(HistoryInterval::Minute30),
            "1h" | "60m" => Ok(HistoryInterval::Hour1),
            "1d" => Ok(HistoryInterval::Day1),
            "1wk" => Ok(HistoryInterval::Week1),
            "1mo" => Ok(HistoryInterval::Month1),
            _ => Err(PriceError::InvalidQuery(format!("unknown interval: {}", s))),
        }
    }
}

impl fmt::Display for HistoryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
