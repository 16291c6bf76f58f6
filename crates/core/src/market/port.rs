use crate::market::entity::{HistoryInterval, HistoryPeriod, PricePoint};
use crate::market::error::PriceError;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// # Summary
/// 价格提供者接口：最新价与历史收盘价。
///
/// 账本本身从不发起外部 I/O：取价由实现者完成，
/// 账本只接收已经确定价格的成交。
///
/// # Invariants
/// - 实现者必须线程安全 (`Send + Sync`)，可能被多个请求并发调用。
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// # Summary
    /// 获取指定资产在调用时刻的最新价格。
    ///
    /// # Arguments
    /// * `asset`: 资产代码，例如 `AAPL`。
    ///
    /// # Returns
    /// 成功返回价格，标的未知或网络失败时返回 `PriceError`。
    async fn current_price(&self, asset: &str) -> Result<Decimal, PriceError>;

    /// # Summary
    /// 获取指定资产在回看区间内的收盘价序列。
    ///
    /// # Arguments
    /// * `asset`: 资产代码。
    /// * `period`: 回看区间。
    /// * `interval`: 采样周期。
    ///
    /// # Returns
    /// 按时间升序的收盘价，没有任何数据时返回 `PriceError::UnknownAsset`。
    async fn history(
        &self,
        asset: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, PriceError>;
}
