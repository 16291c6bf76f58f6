//! # 组合路由控制器
//!
//! 持仓聚合、现金余额与盈亏估值。

use axum::extract::State;
use axum::Json;
use folio_core::trade::entity::PnlSnapshot;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, BalanceResponse, PositionResponse, RevalueRequest};

/// 聚合持仓列表 (按资产代码排序，含已平仓资产)
#[utoipa::path(
    get,
    path = "/api/aggregate",
    tag = "组合 (Portfolio)",
    responses(
        (status = 200, description = "聚合持仓", body = ApiResponse<Vec<PositionResponse>>)
    )
)]
pub async fn aggregate(State(state): State<AppState>) -> Json<ApiResponse<Vec<PositionResponse>>> {
    let positions = state
        .ledger
        .positions()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    Json(ApiResponse::ok(positions))
}

/// 现金余额 = 初始资金 + 全部成交的带符号名义金额
#[utoipa::path(
    get,
    path = "/api/getbalance",
    tag = "组合 (Portfolio)",
    responses(
        (status = 200, description = "现金余额", body = ApiResponse<BalanceResponse>),
        (status = 400, description = "余额超出数值范围", body = ApiErrorResponse)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BalanceResponse>>, ApiError> {
    let balance = state.ledger.balance().await?;
    Ok(Json(ApiResponse::ok(BalanceResponse { balance })))
}

/// 按调用方给出的价格快照重估
///
/// 快照中缺失的资产按持仓均价处理，即贡献为零。
/// 返回的盈亏与本次重估在同一把写锁内取得。
#[utoipa::path(
    post,
    path = "/api/revalue",
    tag = "组合 (Portfolio)",
    request_body = RevalueRequest,
    responses(
        (status = 200, description = "重估后的盈亏快照", body = ApiResponse<PnlSnapshot>),
        (status = 400, description = "价格导致盈亏超出数值范围", body = ApiErrorResponse)
    )
)]
pub async fn revalue(
    State(state): State<AppState>,
    Json(req): Json<RevalueRequest>,
) -> Result<Json<ApiResponse<PnlSnapshot>>, ApiError> {
    let pnl = state.ledger.revalue(req.prices).await?;
    Ok(Json(ApiResponse::ok(pnl)))
}

/// 用报价源的实时价格重估并返回盈亏
#[utoipa::path(
    get,
    path = "/api/pnl",
    tag = "组合 (Portfolio)",
    responses(
        (status = 200, description = "实时盈亏快照", body = ApiResponse<PnlSnapshot>),
        (status = 400, description = "价格导致盈亏超出数值范围", body = ApiErrorResponse)
    )
)]
pub async fn pnl(State(state): State<AppState>) -> Result<Json<ApiResponse<PnlSnapshot>>, ApiError> {
    let pnl = state.ledger.revalue_live().await?;
    Ok(Json(ApiResponse::ok(pnl)))
}
