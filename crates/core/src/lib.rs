//! # `folio-core` - 领域模型与端口定义
//!
//! 持仓账本的共享内核：成交记录、聚合持仓、盈亏快照等实体，
//! 以及价格源、成交日志、账本服务三类端口 (trait)。
//! 本 crate 不包含任何基础设施实现。

pub mod common;
pub mod config;
pub mod ledger;
pub mod market;
pub mod store;
pub mod trade;
