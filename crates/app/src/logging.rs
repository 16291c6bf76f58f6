use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// # Summary
/// 初始化全局日志：终端输出 + 按天滚动的文件输出。
///
/// # Logic
/// 1. 过滤级别取 `RUST_LOG`，缺省为 `info`。
/// 2. 文件写入 `{log_dir}/folio.log.YYYY-MM-DD`，经后台线程非阻塞落盘。
///
/// # Returns
/// 文件写入线程的守卫，调用方须持有到进程退出，否则尾部日志会丢失。
pub fn init_logging(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::daily(log_dir, "folio.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}
