//! # `folio-api` - HTTP API 网关
//!
//! 本 crate 是 Folio 持仓账本的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自前端看板或脚本的 HTTP 请求
//! - 调用下层 `LedgerPort` 与 `PriceSource` 完成记账、估值与报价
//! - 将领域模型转换为 DTO 返回给前端

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
