//! # 成交路由控制器
//!
//! 实现 `/api/maketrade` 与 `/api/tradehistory`。

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::ledger::entity::TradeRequest;
use folio_core::trade::entity::TradeRow;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, MakeTradeRequest};

/// 按当前市价提交一笔成交
///
/// 价格取自报价源，时间取自服务端时钟。任何失败都不会修改账本。
#[utoipa::path(
    post,
    path = "/api/maketrade",
    tag = "成交 (Trade)",
    request_body = MakeTradeRequest,
    responses(
        (status = 201, description = "成交已记账", body = ApiResponse<TradeRow>),
        (status = 400, description = "请求参数非法", body = ApiErrorResponse),
        (status = 404, description = "资产没有报价", body = ApiErrorResponse),
        (status = 500, description = "报价源或日志故障", body = ApiErrorResponse)
    )
)]
pub async fn make_trade(
    State(state): State<AppState>,
    Json(req): Json<MakeTradeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TradeRow>>), ApiError> {
    let request = TradeRequest::try_from(req).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let trade = state.ledger.submit_trade(request).await?;
    info!("API trade accepted: {}", trade);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(trade.to_row()))))
}

/// 成交历史
///
/// 按到达顺序返回全部成交；与类别/动作无关的字段为 null。
#[utoipa::path(
    get,
    path = "/api/tradehistory",
    tag = "成交 (Trade)",
    responses(
        (status = 200, description = "成交历史", body = ApiResponse<Vec<TradeRow>>)
    )
)]
pub async fn trade_history(State(state): State<AppState>) -> Json<ApiResponse<Vec<TradeRow>>> {
    Json(ApiResponse::ok(state.ledger.history().await))
}
