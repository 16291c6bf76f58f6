use thiserror::Error;

/// # Summary
/// 价格源错误枚举，处理网络、解析及标的未知等问题。
///
/// # Invariants
/// - 任一变体出现时，调用方都不得对账本做任何修改。
#[derive(Error, Debug)]
pub enum PriceError {
    // 标的不存在或行情源没有它的报价
    #[error("No price available for asset: {0}")]
    UnknownAsset(String),
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 响应解析错误，如 JSON 结构不匹配或价格不是有效数值
    #[error("Parse error: {0}")]
    Parse(String),
    // 查询参数不被支持，如未知的回看区间或采样周期
    #[error("Invalid history query: {0}")]
    InvalidQuery(String),
}
