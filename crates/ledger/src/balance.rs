use folio_core::ledger::port::LedgerError;
use folio_core::trade::entity::{ActionType, TradeRecord};
use rust_decimal::Decimal;

/// # Logic
/// 单笔成交对现金的影响：买入付出名义金额，卖出与融券卖空收到名义金额。
pub fn cash_flow(trade: &TradeRecord) -> Decimal {
    match trade.action_type() {
        ActionType::Buy => -trade.notional(),
        ActionType::Sell | ActionType::Short => trade.notional(),
    }
}

/// # Summary
/// 现金余额 = 初始资金 + 全部成交的带符号名义金额。
///
/// # Arguments
/// * `starting_cash` - 来自配置的初始资金
/// * `net_cash_flow` - 账本累计的 `cash_flow` 之和
///
/// # Returns
/// 两者之和超出 `Decimal` 表示范围时返回 `LedgerError::Overflow`。
pub fn cash_balance(starting_cash: Decimal, net_cash_flow: Decimal) -> Result<Decimal, LedgerError> {
    starting_cash
        .checked_add(net_cash_flow)
        .ok_or_else(|| LedgerError::Overflow("computing cash balance".to_string()))
}
