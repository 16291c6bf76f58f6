use axum::extract::State;
use axum::Json;

use folio_core::market::entity::{HistoryInterval, HistoryPeriod};
use folio_core::market::error::PriceError;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, ApiResponse, AssetPriceRequest, AssetPriceResponse, HistoryRequest,
    HistoryResponse,
};

/// 取出非空的 Ticker
fn required_ticker(ticker: Option<&str>) -> Result<&str, ApiError> {
    ticker
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Ticker symbol is required".to_string()))
}

/// 查询单个资产的当前价格
#[utoipa::path(
    post,
    path = "/api/getassetprice",
    tag = "行情 (Market)",
    request_body = AssetPriceRequest,
    responses(
        (status = 200, description = "当前价格", body = ApiResponse<AssetPriceResponse>),
        (status = 400, description = "缺少 Ticker", body = ApiErrorResponse),
        (status = 404, description = "资产没有报价", body = ApiErrorResponse)
    )
)]
pub async fn get_asset_price(
    State(state): State<AppState>,
    Json(req): Json<AssetPriceRequest>,
) -> Result<Json<ApiResponse<AssetPriceResponse>>, ApiError> {
    let ticker = required_ticker(req.ticker.as_deref())?;
    let price = state.prices.current_price(ticker).await?;
    Ok(Json(ApiResponse::ok(AssetPriceResponse { price })))
}

/// 查询单个资产的历史收盘价
///
/// 区间缺省为 `1mo`，周期缺省为 `1d`。报价源没有任何数据的代码视为非法代码。
#[utoipa::path(
    post,
    path = "/api/getdata",
    tag = "行情 (Market)",
    request_body = HistoryRequest,
    responses(
        (status = 200, description = "按时间升序的收盘价", body = ApiResponse<HistoryResponse>),
        (status = 400, description = "缺少 Ticker、代码非法或区间/周期不支持", body = ApiErrorResponse)
    )
)]
pub async fn get_data(
    State(state): State<AppState>,
    Json(req): Json<HistoryRequest>,
) -> Result<Json<ApiResponse<HistoryResponse>>, ApiError> {
    let ticker = required_ticker(req.ticker.as_deref())?;
    let period: HistoryPeriod = req.period.as_deref().unwrap_or("1mo").parse()?;
    let interval: HistoryInterval = req.interval.as_deref().unwrap_or("1d").parse()?;

    let points = state
        .prices
        .history(ticker, period, interval)
        .await
        .map_err(|e| match e {
            PriceError::UnknownAsset(_) => {
                ApiError::BadRequest(format!("Invalid ticker symbol: {}", ticker))
            }
            other => other.into(),
        })?;
    Ok(Json(ApiResponse::ok(points.into())))
}
