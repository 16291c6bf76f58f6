//! # `folio-ledger` - 持仓聚合与盈亏核算引擎
//!
//! - [`ledger::Ledger`]: 纯同步的账本状态机，负责持仓、均价与盈亏。
//! - [`balance`]: 基于成交历史的现金余额计算。
//! - [`service::LedgerService`]: 单写者锁 + 价格源 + 成交日志的组合，实现 `LedgerPort`。

pub mod balance;
pub mod ledger;
pub mod service;
