use thiserror::Error;

/// # Summary
/// 成交日志存储错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum JournalError {
    /// 数据库打开、读写或提交失败
    #[error("Storage error: {0}")]
    Storage(String),
    /// 已持久化的行无法还原为合法的成交记录
    #[error("Corrupt journal row {row}: {reason}")]
    Corrupt { row: i64, reason: String },
}
