use crate::balance::cash_flow;
use folio_core::ledger::port::LedgerError;
use folio_core::trade::entity::{ActionType, AggregatedPosition, PnlSnapshot, TradeRecord, TradeRow};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// # Summary
/// 单资产持仓在一笔成交后的新状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    quantity: Decimal,
    average_price: Decimal,
    realized: Decimal,
}

/// 按绝对持仓量加权的均价。调用方保证 `open_abs + qty > 0`，溢出时返回 `None`。
fn weighted_average(open_abs: Decimal, cur_avg: Decimal, qty: Decimal, price: Decimal) -> Option<Decimal> {
    let cost = cur_avg.checked_mul(open_abs)?.checked_add(price.checked_mul(qty)?)?;
    cost.checked_div(open_abs.checked_add(qty)?)
}

/// # Logic
/// 空仓或多头时加仓并重算均价；空头时先回补，回补后翻多则均价重置为成交价。
fn buy(cur_qty: Decimal, cur_avg: Decimal, qty: Decimal, price: Decimal) -> Option<Transition> {
    if cur_qty >= Decimal::ZERO {
        return Some(Transition {
            quantity: cur_qty.checked_add(qty)?,
            average_price: weighted_average(cur_qty, cur_avg, qty, price)?,
            realized: Decimal::ZERO,
        });
    }

    let close_qty = cur_qty.abs().min(qty);
    let new_qty = cur_qty.checked_add(qty)?;
    Some(Transition {
        quantity: new_qty,
        average_price: if new_qty > Decimal::ZERO { price } else { cur_avg },
        realized: close_qty.checked_mul(cur_avg.checked_sub(price)?)?,
    })
}

/// # Logic
/// 多头时减仓并实现盈亏，卖穿后翻空则均价重置为成交价；空仓或空头时加空并重算均价。
fn sell(cur_qty: Decimal, cur_avg: Decimal, qty: Decimal, price: Decimal) -> Option<Transition> {
    if cur_qty > Decimal::ZERO {
        let close_qty = cur_qty.min(qty);
        let new_qty = cur_qty.checked_sub(qty)?;
        return Some(Transition {
            quantity: new_qty,
            average_price: if new_qty < Decimal::ZERO { price } else { cur_avg },
            realized: close_qty.checked_mul(price.checked_sub(cur_avg)?)?,
        });
    }

    Some(Transition {
        quantity: cur_qty.checked_sub(qty)?,
        average_price: weighted_average(cur_qty.abs(), cur_avg, qty, price)?,
        realized: Decimal::ZERO,
    })
}

/// # Logic
/// 无论当前方向，一律视为开空/加空：按绝对持仓量加权均价，不产生已实现盈亏。
fn short(cur_qty: Decimal, cur_avg: Decimal, qty: Decimal, price: Decimal) -> Option<Transition> {
    Some(Transition {
        quantity: cur_qty.checked_sub(qty)?,
        average_price: weighted_average(cur_qty.abs(), cur_avg, qty, price)?,
        realized: Decimal::ZERO,
    })
}

/// # Summary
/// 一笔成交在当前账本上预先算好的结果，由 [`Ledger::prepare`] 产出、[`Ledger::commit`] 落地。
///
/// # Invariants
/// - 只对产出它的那个账本状态有效，两步之间账本不得被修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    transition: Transition,
    realized_pnl: Decimal,
    net_cash_flow: Decimal,
}

impl Posting {
    /// 本笔成交实现的盈亏
    pub fn realized(&self) -> Decimal {
        self.transition.realized
    }
}

/// # Summary
/// 持仓账本：按资产聚合成交，维护加权均价与已实现/未实现盈亏。
///
/// # Invariants
/// - `history` 只追加，顺序即到达顺序。
/// - 每个资产至多一条持仓，创建后永不删除（平仓后保留数量为 0 的记录）。
/// - `unrealized_pnl` 只在 `revalue` 中整体重算。
/// - 持仓、`realized_pnl + unrealized_pnl` 与累计现金流都可以用 `Decimal` 表示。
/// - 本结构不做同步，并发访问由上层的单写者锁保证。
#[derive(Debug, Default)]
pub struct Ledger {
    history: Vec<TradeRecord>,
    positions: BTreeMap<String, AggregatedPosition>,
    realized_pnl: Decimal,
    unrealized_pnl: Decimal,
    net_cash_flow: Decimal,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Logic
    /// 按顺序重放一组历史成交，得到与逐笔记账完全一致的账本。
    ///
    /// # Returns
    /// 任一成交无法记账时返回首个错误。
    pub fn from_history(trades: impl IntoIterator<Item = TradeRecord>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for trade in trades {
            ledger.apply(trade)?;
        }
        Ok(ledger)
    }

    /// # Summary
    /// 计算一笔成交记账后的新状态，不修改账本。
    ///
    /// # Logic
    /// 1. 取出该资产当前数量与均价，不存在则视为空仓。
    /// 2. 按 Buy / Sell / Short 计算新数量、新均价与本笔已实现盈亏。
    /// 3. 检查累计已实现盈亏、总盈亏与累计现金流仍可表示。
    ///
    /// # Returns
    /// 任一步溢出时返回 `LedgerError::Overflow`。
    pub fn prepare(&self, trade: &TradeRecord) -> Result<Posting, LedgerError> {
        let overflow = || LedgerError::Overflow(format!("applying {}", trade));

        let (cur_qty, cur_avg) = self
            .positions
            .get(trade.asset())
            .map_or((Decimal::ZERO, Decimal::ZERO), |p| (p.quantity, p.average_price));
        let (qty, price) = (trade.quantity(), trade.price());

        let transition = match trade.action_type() {
            ActionType::Buy => buy(cur_qty, cur_avg, qty, price),
            ActionType::Sell => sell(cur_qty, cur_avg, qty, price),
            ActionType::Short => short(cur_qty, cur_avg, qty, price),
        }
        .ok_or_else(overflow)?;

        let realized_pnl = self
            .realized_pnl
            .checked_add(transition.realized)
            .ok_or_else(overflow)?;
        realized_pnl
            .checked_add(self.unrealized_pnl)
            .ok_or_else(overflow)?;
        let net_cash_flow = self
            .net_cash_flow
            .checked_add(cash_flow(trade))
            .ok_or_else(overflow)?;

        Ok(Posting {
            transition,
            realized_pnl,
            net_cash_flow,
        })
    }

    /// # Summary
    /// 落地 `prepare` 算好的结果：回写持仓，更新盈亏与现金流，追加到历史。
    pub fn commit(&mut self, trade: TradeRecord, posting: Posting) {
        let position = self
            .positions
            .entry(trade.asset().to_string())
            .or_insert_with(|| AggregatedPosition::flat(trade.asset(), trade.trade_type()));

        if position.trade_type != trade.trade_type() {
            warn!(
                "Asset {} was opened as {} but received a {} trade, keeping {}",
                trade.asset(),
                position.trade_type,
                trade.trade_type(),
                position.trade_type
            );
        }
        if trade.action_type() == ActionType::Short && position.is_long() {
            // Short 不会对已有多头做平仓结算，只把两边绝对量混合成新均价
            warn!(
                "Short {} {} against an open long of {}: no PnL realized, cost basis blended",
                trade.quantity(),
                trade.asset(),
                position.quantity
            );
        }

        let next = posting.transition;
        position.quantity = next.quantity;
        position.average_price = next.average_price;
        self.realized_pnl = posting.realized_pnl;
        self.net_cash_flow = posting.net_cash_flow;

        debug!(
            asset = trade.asset(),
            action = %trade.action_type(),
            quantity = %next.quantity,
            average_price = %next.average_price,
            realized = %next.realized,
            "trade applied"
        );

        self.history.push(trade);
    }

    /// # Summary
    /// 记账一笔成交：`prepare` 成功后立即 `commit`。
    ///
    /// 失败时账本保持原样。
    pub fn apply(&mut self, trade: TradeRecord) -> Result<(), LedgerError> {
        let posting = self.prepare(&trade)?;
        self.commit(trade, posting);
        Ok(())
    }

    /// # Summary
    /// 计算给定价格快照下的未实现盈亏，不修改任何状态。
    ///
    /// # Logic
    /// 1. 跳过数量为 0 的持仓。
    /// 2. 快照中缺失的资产以自身均价作为现价（贡献为 0）。
    /// 3. 多头累加 `qty * (现价 - 均价)`，空头累加 `|qty| * (均价 - 现价)`。
    ///
    /// 结果超出 `Decimal` 表示范围时返回 `None`。
    pub fn mark_to_market(&self, prices: &HashMap<String, Decimal>) -> Option<Decimal> {
        self.positions
            .values()
            .filter(|p| !p.is_flat())
            .try_fold(Decimal::ZERO, |acc, p| {
                let current = prices.get(&p.asset).copied().unwrap_or(p.average_price);
                let pnl = if p.is_long() {
                    p.quantity.checked_mul(current.checked_sub(p.average_price)?)?
                } else {
                    p.quantity.abs().checked_mul(p.average_price.checked_sub(current)?)?
                };
                acc.checked_add(pnl)
            })
    }

    /// # Summary
    /// 整体重算并保存未实现盈亏，返回同一时刻的盈亏快照。
    ///
    /// 相同价格快照重复调用结果相同；历史、持仓与已实现盈亏保持不变。
    /// 溢出时返回错误，未实现盈亏保持上一次的值。
    pub fn revalue(&mut self, prices: &HashMap<String, Decimal>) -> Result<PnlSnapshot, LedgerError> {
        let overflow = || LedgerError::Overflow("revaluing positions".to_string());
        let unrealized = self.mark_to_market(prices).ok_or_else(overflow)?;
        self.realized_pnl.checked_add(unrealized).ok_or_else(overflow)?;
        self.unrealized_pnl = unrealized;
        Ok(self.pnl())
    }

    pub fn history(&self) -> &[TradeRecord] {
        &self.history
    }

    /// 历史成交的导出行
    pub fn history_rows(&self) -> Vec<TradeRow> {
        self.history.iter().map(TradeRow::from).collect()
    }

    pub fn total_trades(&self) -> usize {
        self.history.len()
    }

    pub fn position(&self, asset: &str) -> Option<&AggregatedPosition> {
        self.positions.get(asset)
    }

    /// 全部持仓快照，按资产代码排序
    pub fn positions(&self) -> Vec<AggregatedPosition> {
        self.positions.values().cloned().collect()
    }

    /// 仍有敞口的资产
    pub fn open_assets(&self) -> Vec<String> {
        self.positions
            .values()
            .filter(|p| !p.is_flat())
            .map(|p| p.asset.clone())
            .collect()
    }

    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.unrealized_pnl
    }

    /// 全部成交的带符号名义金额之和
    pub fn net_cash_flow(&self) -> Decimal {
        self.net_cash_flow
    }

    pub fn pnl(&self) -> PnlSnapshot {
        PnlSnapshot::new(self.realized_pnl, self.unrealized_pnl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_weighted_average_from_flat() {
        assert_eq!(weighted_average(dec!(0), dec!(0), dec!(10), dec!(100)), Some(dec!(100)));
        assert_eq!(weighted_average(dec!(10), dec!(100), dec!(10), dec!(120)), Some(dec!(110)));
    }

    #[test]
    fn test_buy_exactly_covering_keeps_average() {
        let t = buy(dec!(-4), dec!(50), dec!(4), dec!(45)).unwrap();
        assert_eq!(t.quantity, dec!(0));
        assert_eq!(t.average_price, dec!(50));
        assert_eq!(t.realized, dec!(20));
    }

    #[test]
    fn test_sell_from_flat_opens_short() {
        let t = sell(dec!(0), dec!(0), dec!(3), dec!(30)).unwrap();
        assert_eq!(t.quantity, dec!(-3));
        assert_eq!(t.average_price, dec!(30));
        assert_eq!(t.realized, dec!(0));
    }

    #[test]
    fn test_transitions_report_overflow() {
        assert_eq!(buy(Decimal::MAX, dec!(1), dec!(1), dec!(1)), None);
        assert_eq!(sell(Decimal::MIN, dec!(1), dec!(1), dec!(1)), None);
        assert_eq!(short(dec!(1), Decimal::MAX, dec!(1), Decimal::MAX), None);
        // 平空时价差乘以数量溢出
        assert_eq!(buy(dec!(-2), Decimal::MAX, dec!(2), dec!(0)), None);
    }
}
