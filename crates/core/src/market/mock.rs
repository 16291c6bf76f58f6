use crate::market::entity::{HistoryInterval, HistoryPeriod, PricePoint};
use crate::market::error::PriceError;
use crate::market::port::PriceSource;
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

/// # Summary
/// 内存静态价格表，供离线测试与本地演示使用。
///
/// 未登记的资产返回 `PriceError::UnknownAsset`。
/// 历史序列与区间、周期无关，登记什么就返回什么。
#[derive(Default)]
pub struct StaticPriceSource {
    prices: DashMap<String, Decimal>,
    histories: DashMap<String, Vec<PricePoint>>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, asset: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(asset.into(), price);
        self
    }

    pub fn with_history(self, asset: impl Into<String>, points: Vec<PricePoint>) -> Self {
        self.histories.insert(asset.into(), points);
        self
    }

    pub fn set_price(&self, asset: impl Into<String>, price: Decimal) {
        self.prices.insert(asset.into(), price);
    }

    pub fn remove(&self, asset: &str) {
        self.prices.remove(asset);
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn current_price(&self, asset: &str) -> Result<Decimal, PriceError> {
        self.prices
            .get(asset)
            .map(|p| *p.value())
            .ok_or_else(|| PriceError::UnknownAsset(asset.to_string()))
    }

    async fn history(
        &self,
        asset: &str,
        _period: HistoryPeriod,
        _interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, PriceError> {
        self.histories
            .get(asset)
            .map(|h| h.value().clone())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PriceError::UnknownAsset(asset.to_string()))
    }
}
