use super::error::JournalError;
use crate::trade::entity::TradeRecord;
use async_trait::async_trait;

/// # Summary
/// 只追加的成交日志接口，账本重启时据此重放。
///
/// # Invariants
/// - `load_all` 必须按写入顺序返回记录。
/// - 实现者必须线程安全 (`Send + Sync`)。
#[async_trait]
pub trait TradeJournal: Send + Sync {
    /// # Summary
    /// 追加一笔成交。
    ///
    /// # Arguments
    /// * `trade`: 已通过校验的成交记录。
    ///
    /// # Returns
    /// 写入失败返回 `JournalError::Storage`。
    async fn append(&self, trade: &TradeRecord) -> Result<(), JournalError>;

    /// # Summary
    /// 按写入顺序读取全部成交。
    ///
    /// # Returns
    /// 任意一行无法还原时返回 `JournalError::Corrupt`。
    async fn load_all(&self) -> Result<Vec<TradeRecord>, JournalError>;

    /// # Summary
    /// 清空日志，仅在重新播种初始组合时使用。
    async fn clear(&self) -> Result<(), JournalError>;
}
