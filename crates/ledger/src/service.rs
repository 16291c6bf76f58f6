use crate::balance::cash_balance;
use crate::ledger::Ledger;
use async_trait::async_trait;
use folio_core::common::time::TimeProvider;
use folio_core::config::{LedgerConfig, SeedHolding};
use folio_core::ledger::entity::TradeRequest;
use folio_core::ledger::port::{LedgerError, LedgerPort};
use folio_core::market::port::PriceSource;
use folio_core::store::port::TradeJournal;
use folio_core::trade::entity::{
    ActionType, AggregatedPosition, PnlSnapshot, TradeFields, TradeRecord, TradeRow,
};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// # Summary
/// `LedgerService` 是账本的单写者入口，实现了 `LedgerPort`。
/// 组合了价格源、成交日志与时钟，对外屏蔽并发与持久化细节。
///
/// # Invariants
/// - 账本只被一把 `RwLock` 保护：记账与重估持写锁，快照读取持读锁。
/// - 取价发生在加锁之前，锁内不做网络 I/O。
/// - 记账结果先在写锁内算好，再写日志，最后落地到内存账本。
///   溢出或日志失败时，日志与内存账本都保持不变。
pub struct LedgerService {
    ledger: RwLock<Ledger>,
    prices: Arc<dyn PriceSource>,
    journal: Arc<dyn TradeJournal>,
    clock: Arc<dyn TimeProvider>,
    config: LedgerConfig,
}

impl LedgerService {
    pub fn new(
        prices: Arc<dyn PriceSource>,
        journal: Arc<dyn TradeJournal>,
        clock: Arc<dyn TimeProvider>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            ledger: RwLock::new(Ledger::new()),
            prices,
            journal,
            clock,
            config,
        }
    }

    /// # Logic
    /// 从成交日志重放出完整账本，替换当前内存状态。
    ///
    /// # Returns
    /// 重放的成交笔数
    pub async fn restore(&self) -> Result<usize, LedgerError> {
        let mut ledger = self.ledger.write().await;
        let trades = self.journal.load_all().await?;
        let count = trades.len();
        *ledger = Ledger::from_history(trades)?;
        info!(
            "Ledger restored from journal: {} trades, {} positions",
            count,
            ledger.positions().len()
        );
        Ok(count)
    }

    /// # Summary
    /// 用初始组合重新播种账本。
    ///
    /// # Logic
    /// 1. 先把全部持仓构造成买入成交，任一非法则整体放弃。
    /// 2. 在空账本上演练一遍，溢出同样整体放弃。
    /// 3. 清空日志与内存账本。
    /// 4. 逐笔写日志并记账。
    pub async fn seed(&self, holdings: &[SeedHolding]) -> Result<usize, LedgerError> {
        let now = self.clock.now();
        let trades = holdings
            .iter()
            .map(|h| {
                TradeRecord::new(TradeFields::stock(
                    h.asset.clone(),
                    now,
                    h.quantity,
                    h.price,
                    ActionType::Buy,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ledger::from_history(trades.iter().cloned())?;

        let mut ledger = self.ledger.write().await;
        self.journal.clear().await?;
        *ledger = Ledger::new();
        for trade in trades {
            let posting = ledger.prepare(&trade)?;
            self.journal.append(&trade).await?;
            ledger.commit(trade, posting);
        }
        info!("Portfolio seeded with {} holdings", ledger.total_trades());
        Ok(ledger.total_trades())
    }

    /// 当前账本的已实现盈亏（测试与诊断用）
    pub async fn realized_pnl(&self) -> Decimal {
        self.ledger.read().await.realized_pnl()
    }

    pub async fn position(&self, asset: &str) -> Option<AggregatedPosition> {
        self.ledger.read().await.position(asset).cloned()
    }

    pub fn starting_cash(&self) -> Decimal {
        self.config.starting_cash
    }
}

#[async_trait]
impl LedgerPort for LedgerService {
    /// # Logic
    /// 1. 以零价格预校验请求，非法输入不触发取价。
    /// 2. 向价格源取当前价，失败则原样返回，账本不变。
    /// 3. 用成交价与时钟时间构造记录并记账。
    async fn submit_trade(&self, request: TradeRequest) -> Result<TradeRecord, LedgerError> {
        TradeRecord::new(request.clone().into_fields(Decimal::ZERO, self.clock.now()))?;

        let asset = request.asset.trim().to_string();
        let price = self.prices.current_price(&asset).await.map_err(|e| {
            warn!("Price lookup for {} failed, trade rejected: {}", asset, e);
            e
        })?;

        let trade = TradeRecord::new(request.into_fields(price, self.clock.now()))?;
        self.apply_trade(trade.clone()).await?;
        info!("Trade recorded: {}", trade);
        Ok(trade)
    }

    /// # Logic
    /// 写锁内依次：预算记账结果 (溢出则返回) → 写日志 → 落地。
    async fn apply_trade(&self, trade: TradeRecord) -> Result<(), LedgerError> {
        let mut ledger = self.ledger.write().await;
        let posting = ledger.prepare(&trade).map_err(|e| {
            warn!("Trade rejected before journaling: {}", e);
            e
        })?;
        self.journal.append(&trade).await?;
        ledger.commit(trade, posting);
        Ok(())
    }

    async fn revalue(&self, prices: HashMap<String, Decimal>) -> Result<PnlSnapshot, LedgerError> {
        self.ledger.write().await.revalue(&prices)
    }

    /// # Logic
    /// 1. 读锁下取出全部未平仓资产。
    /// 2. 锁外并发取价，单个资产失败只记录告警，该资产按均价处理。
    /// 3. 写锁下整体重估，并在同一把锁内取得盈亏快照。
    async fn revalue_live(&self) -> Result<PnlSnapshot, LedgerError> {
        let assets = self.ledger.read().await.open_assets();
        let quotes = join_all(assets.iter().map(|asset| self.prices.current_price(asset))).await;

        let mut prices = HashMap::with_capacity(assets.len());
        for (asset, quote) in assets.into_iter().zip(quotes) {
            match quote {
                Ok(price) => {
                    prices.insert(asset, price);
                }
                Err(e) => warn!("No live price for {}, using average price: {}", asset, e),
            }
        }

        self.ledger.write().await.revalue(&prices)
    }

    async fn history(&self) -> Vec<TradeRow> {
        self.ledger.read().await.history_rows()
    }

    async fn positions(&self) -> Vec<AggregatedPosition> {
        self.ledger.read().await.positions()
    }

    async fn pnl(&self) -> PnlSnapshot {
        self.ledger.read().await.pnl()
    }

    async fn balance(&self) -> Result<Decimal, LedgerError> {
        let net_cash_flow = self.ledger.read().await.net_cash_flow();
        cash_balance(self.config.starting_cash, net_cash_flow)
    }
}
