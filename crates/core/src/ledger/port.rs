use crate::ledger::entity::TradeRequest;
use crate::market::error::PriceError;
use crate::store::error::JournalError;
use crate::trade::entity::{AggregatedPosition, PnlSnapshot, TradeRecord, TradeRow};
use crate::trade::error::ValidationError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// # Summary
/// 账本服务层可能发生的错误。
///
/// # Invariants
/// - 任一错误返回时，账本状态与日志都与调用前完全一致。
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid trade: {0}")]
    Validation(#[from] ValidationError),
    #[error("Price lookup failed: {0}")]
    Price(#[from] PriceError),
    #[error("Journal failure: {0}")]
    Journal(#[from] JournalError),
    // 成交或重估价格使持仓、盈亏或现金超出 `Decimal` 表示范围
    #[error("Arithmetic overflow while {0}")]
    Overflow(String),
}

/// # Summary
/// 持仓账本服务抽象接口。
/// HTTP 网关和启动流程通过此端口提交成交、读取持仓与盈亏。
///
/// # Invariants
/// - 同一账本同一时刻至多一个 apply/revalue 在执行。
/// - 读取方法返回的都是快照，不持有内部锁。
#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// 按当前市价提交一笔成交
    ///
    /// # Arguments
    /// * `request` - 未定价的成交意图
    ///
    /// # Returns
    /// * `Ok(TradeRecord)` - 已记账的成交
    /// * `Err(LedgerError)` - 取价、校验或日志写入失败，账本未被修改
    async fn submit_trade(&self, request: TradeRequest) -> Result<TradeRecord, LedgerError>;

    /// 记账一笔已经定价的成交
    async fn apply_trade(&self, trade: TradeRecord) -> Result<(), LedgerError>;

    /// 按给定价格快照重估未实现盈亏，缺失的价格按持仓均价处理
    ///
    /// # Returns
    /// 与本次重估处于同一把写锁内的盈亏快照；溢出时账本不变
    async fn revalue(&self, prices: HashMap<String, Decimal>) -> Result<PnlSnapshot, LedgerError>;

    /// 从价格源拉取全部未平仓资产的价格后重估
    async fn revalue_live(&self) -> Result<PnlSnapshot, LedgerError>;

    /// 成交历史导出行 (按到达顺序)
    async fn history(&self) -> Vec<TradeRow>;

    /// 全部聚合持仓快照 (含空仓)
    async fn positions(&self) -> Vec<AggregatedPosition>;

    /// 当前盈亏快照
    async fn pnl(&self) -> PnlSnapshot;

    /// 现金余额 = 初始资金 + 全部成交的带符号名义金额
    async fn balance(&self) -> Result<Decimal, LedgerError>;
}
