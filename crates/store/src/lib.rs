//! # `folio-store` - 成交日志适配器
//!
//! `TradeJournal` 端口的两种实现：
//! - [`journal::SqliteTradeJournal`]: 基于 SQLite 的持久化日志，进程重启后可重放。
//! - [`memory::MemoryTradeJournal`]: 纯内存实现，用于测试与临时会话。

pub mod journal;
pub mod memory;
