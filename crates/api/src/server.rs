//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use folio_core::config::ServerConfig;
use folio_core::ledger::port::LedgerPort;
use folio_core::market::port::PriceSource;

use crate::routes::{market, portfolio, trade};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `ledger` 和 `prices` 在服务启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 账本服务端口
    pub ledger: Arc<dyn LedgerPort>,
    /// 报价源 (用于单资产报价与历史收盘价查询)
    pub prices: Arc<dyn PriceSource>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio 持仓账本 API",
        version = "0.1.0",
        description = "持仓聚合与盈亏引擎的 RESTful API 网关。提供成交提交、持仓查询、现金余额与盈亏估值。"
    ),
    tags(
        (name = "成交 (Trade)", description = "成交提交与历史"),
        (name = "组合 (Portfolio)", description = "聚合持仓、现金余额与盈亏"),
        (name = "行情 (Market)", description = "单资产报价与历史收盘价查询")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建 CORS 中间件，只放行配置中的前端来源。
///
/// # Logic
/// 无法解析为 header 值的来源记录告警后跳过。
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// # Summary
/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `config` - 服务配置，提供 CORS 白名单
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(trade::make_trade))
        .routes(routes!(trade::trade_history))
        .routes(routes!(portfolio::aggregate))
        .routes(routes!(portfolio::get_balance))
        .routes(routes!(portfolio::revalue))
        .routes(routes!(portfolio::pnl))
        .routes(routes!(market::get_asset_price))
        .routes(routes!(market::get_data))
        .with_state(state)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors_layer(config))
}

/// 绑定端口并启动 HTTP 服务，`shutdown` 完成后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `config` - 监听地址与 CORS 白名单
/// * `shutdown` - 退出信号
///
/// # Returns
/// 端口绑定或服务运行失败时返回 IO 错误。
pub async fn start_server<F>(
    state: AppState,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, config);
    let bind_addr = config.bind_addr();

    tracing::info!("Folio API Server listening on {}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
