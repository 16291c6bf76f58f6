use async_trait::async_trait;
use folio_core::store::error::JournalError;
use folio_core::store::port::TradeJournal;
use folio_core::trade::entity::TradeRecord;
use std::sync::Arc;
use tokio::sync::RwLock;

/// # Summary
/// 基于内存的成交日志实现。
///
/// 作为 `TradeJournal` 的适配器，进程退出即丢失。
pub struct MemoryTradeJournal {
    trades: Arc<RwLock<Vec<TradeRecord>>>,
}

impl MemoryTradeJournal {
    pub fn new() -> Self {
        Self {
            trades: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// 当前日志中的记录数
    pub async fn len(&self) -> usize {
        self.trades.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trades.read().await.is_empty()
    }
}

impl Default for MemoryTradeJournal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeJournal for MemoryTradeJournal {
    async fn append(&self, trade: &TradeRecord) -> Result<(), JournalError> {
        self.trades.write().await.push(trade.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        Ok(self.trades.read().await.clone())
    }

    async fn clear(&self) -> Result<(), JournalError> {
        self.trades.write().await.clear();
        Ok(())
    }
}
