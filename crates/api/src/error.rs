//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::ledger::port::LedgerError;
use folio_core::market::error::PriceError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 资源未找到 (404)
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 下层业务错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "服务器内部错误".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `PriceError` 转换
impl From<PriceError> for ApiError {
    fn from(err: PriceError) -> Self {
        match &err {
            PriceError::UnknownAsset(_) => ApiError::NotFound(err.to_string()),
            PriceError::InvalidQuery(_) => ApiError::BadRequest(err.to_string()),
            PriceError::Network(_) | PriceError::Parse(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// 从 `LedgerError` 转换
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => ApiError::BadRequest(e.to_string()),
            LedgerError::Price(e) => e.into(),
            LedgerError::Journal(e) => ApiError::Internal(e.to_string()),
            e @ LedgerError::Overflow(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::store::error::JournalError;
    use folio_core::trade::error::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(LedgerError::Validation(ValidationError::EmptyAsset)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(LedgerError::Price(PriceError::UnknownAsset("X".into()))),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(PriceError::Network("timeout".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(LedgerError::Journal(JournalError::Storage("locked".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(LedgerError::Overflow("revaluing positions".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(PriceError::InvalidQuery("unknown period: 7w".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
