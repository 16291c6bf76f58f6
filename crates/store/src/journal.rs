use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::store::error::JournalError;
use folio_core::store::port::TradeJournal;
use folio_core::trade::entity::{ActionType, TradeFields, TradeRecord, TradeType};
use rust_decimal::Decimal;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// 日志数据库文件名
const JOURNAL_FILE: &str = "folio.db";

/// trades 表的一行：(id, asset, quantity, price, time, trade_type, action,
/// short_date, base_currency, quote_currency, unit)
type JournalRow = (
    i64,
    String,
    String,
    String,
    DateTime<Utc>,
    String,
    String,
    Option<DateTime<Utc>>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn storage_err(e: impl std::fmt::Display) -> JournalError {
    JournalError::Storage(e.to_string())
}

/// # Summary
/// 基于 SQLite 的只追加成交日志。
/// 数量与价格以文本存储，避免浮点列带来的精度损失。
pub struct SqliteTradeJournal {
    pool: SqlitePool,
}

impl SqliteTradeJournal {
    /// # Summary
    /// 在指定数据目录下打开（必要时创建）日志数据库。
    ///
    /// # Logic
    /// 1. 确保数据目录存在。
    /// 2. 以 WAL 模式连接 `folio.db`，单连接串行写入。
    /// 3. 建表。
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, JournalError> {
        let dir = data_dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| JournalError::Storage(format!("Failed to create data dir: {}", e)))?;
        }

        let db_path = dir.join(JOURNAL_FILE);
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                asset TEXT NOT NULL,
                quantity TEXT NOT NULL,
                price TEXT NOT NULL,
                time DATETIME NOT NULL,
                trade_type TEXT NOT NULL,
                action TEXT NOT NULL,
                short_date DATETIME,
                base_currency TEXT,
                quote_currency TEXT,
                unit TEXT
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(storage_err)?;

        info!("Trade journal opened at {}", db_path.display());
        Ok(Self { pool })
    }

    /// 直接访问底层连接池（测试中用于构造异常数据）
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// # Logic
/// 把一行还原为成交记录，任何一列非法都视为日志损坏。
fn row_to_trade(row: JournalRow) -> Result<TradeRecord, JournalError> {
    let (id, asset, quantity, price, time, trade_type, action, short_date, base, quote, unit) = row;
    let corrupt = |reason: String| JournalError::Corrupt { row: id, reason };

    let quantity = Decimal::from_str(&quantity).map_err(|e| corrupt(format!("quantity: {}", e)))?;
    let price = Decimal::from_str(&price).map_err(|e| corrupt(format!("price: {}", e)))?;
    let trade_type = TradeType::from_str(&trade_type).map_err(|e| corrupt(e.to_string()))?;
    let action = ActionType::from_str(&action).map_err(|e| corrupt(e.to_string()))?;

    TradeRecord::new(TradeFields {
        asset,
        time,
        quantity,
        price,
        trade_type,
        action,
        short_date,
        base_currency: base,
        quote_currency: quote,
        unit,
    })
    .map_err(|e| corrupt(e.to_string()))
}

#[async_trait]
impl TradeJournal for SqliteTradeJournal {
    async fn append(&self, trade: &TradeRecord) -> Result<(), JournalError> {
        sqlx::query(
            r#"
            INSERT INTO trades (asset, quantity, price, time, trade_type, action,
                                short_date, base_currency, quote_currency, unit)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trade.asset())
        .bind(trade.quantity().to_string())
        .bind(trade.price().to_string())
        .bind(trade.time())
        .bind(trade.trade_type().as_str())
        .bind(trade.action_type().as_str())
        .bind(trade.short_date())
        .bind(trade.base_currency())
        .bind(trade.quote_currency())
        .bind(trade.unit())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        let rows: Vec<JournalRow> = sqlx::query_as(
            r#"
            SELECT id, asset, quantity, price, time, trade_type, action,
                   short_date, base_currency, quote_currency, unit
            FROM trades
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(row_to_trade).collect()
    }

    async fn clear(&self) -> Result<(), JournalError> {
        sqlx::query("DELETE FROM trades")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        info!("Trade journal cleared");
        Ok(())
    }
}
