mod logging;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use folio_api::server::{AppState, start_server};
use folio_core::common::time::RealTimeProvider;
use folio_feed::yahoo::YahooProvider;
use folio_ledger::service::LedgerService;
use folio_store::journal::SqliteTradeJournal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "folio", version, about = "Position ledger and PnL service")]
struct Cli {
    /// 配置目录，读取其中的 default.toml 与 local.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// 清空成交日志并写入配置中的初始组合
    #[arg(long, default_value_t = false)]
    seed: bool,
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 LedgerService 与 API 层。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 实例化基础设施层（Yahoo 报价源、SQLite 成交日志）。
/// 3. 构造账本服务并从日志重放状态。
/// 4. 带 `--seed` 启动时写入初始组合。
/// 5. 启动 HTTP 服务，收到 Ctrl-C 后退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. 配置与日志
    let config = settings::load_settings(&cli.config_dir)?;
    let data_dir = PathBuf::from(&config.database.data_dir);
    let _log_guard = logging::init_logging(&data_dir.join("logs"));
    info!("Folio starting with data dir {}", data_dir.display());

    // 2. 基础设施层
    let prices = Arc::new(YahooProvider::new()?);
    let journal = Arc::new(SqliteTradeJournal::open(&data_dir).await?);

    // 3. 账本服务
    let ledger = Arc::new(LedgerService::new(
        prices.clone(),
        journal,
        Arc::new(RealTimeProvider),
        config.ledger.clone(),
    ));
    ledger.restore().await?;

    // 4. 初始组合
    if cli.seed {
        if config.seed.is_empty() {
            warn!("--seed given but no seed holdings are configured");
        } else {
            ledger.seed(&config.seed).await?;
        }
    }

    // 5. HTTP 服务
    let state = AppState { ledger, prices };
    start_server(state, &config.server, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
    })
    .await?;

    info!("Shutdown signal received. Exiting...");
    Ok(())
}
