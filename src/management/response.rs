//! # API 响应结构
//!
//! 标准 JSON 响应格式：成功与失败共用 `{success, ..., timestamp}` 信封

use crate::error::BrokerError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # 标准成功响应
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// # 标准错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// # 标准错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorInfo,
    pub timestamp: DateTime<Utc>,
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Success(T),
    Created(T),
    SuccessWithoutData(String),
    NoContent,
    AppError(BrokerError),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success(data) => success_body(StatusCode::OK, Some(data), None),
            Self::Created(data) => success_body(StatusCode::CREATED, Some(data), None),
            Self::SuccessWithoutData(message) => {
                success_body::<T>(StatusCode::OK, None, Some(message))
            }
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
            Self::AppError(err) => error_body(&err),
        }
    }
}

impl<T: Serialize> From<BrokerError> for ApiResponse<T> {
    fn from(err: BrokerError) -> Self {
        Self::AppError(err)
    }
}

fn success_body<T: Serialize>(
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
) -> Response {
    (
        status,
        Json(SuccessResponse {
            success: true,
            data,
            message,
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}

/// 错误出口统一在这里收敛
///
/// 上游协议错误的响应体细节只进日志，不回传调用方，避免把
/// 令牌端点内部信息带出边界。
fn error_body(err: &BrokerError) -> Response {
    let message = match err {
        BrokerError::TokenExchange { status, body } => {
            tracing::warn!(upstream_status = status, upstream_body = %body, "令牌交换失败");
            "令牌交换失败".to_string()
        }
        BrokerError::TokenRefresh { status, body } => {
            tracing::warn!(upstream_status = status, upstream_body = %body, "令牌刷新失败");
            "令牌刷新失败".to_string()
        }
        other => other.to_string(),
    };

    (
        err.status_code(),
        Json(ErrorResponse {
            success: false,
            error: ErrorInfo {
                code: err.error_code().to_string(),
                message,
            },
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_into_response_status() {
        let resp: Response = ApiResponse::Success(serde_json::json!({"ok": 1})).into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp: Response = ApiResponse::Created(serde_json::json!({})).into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp: Response = ApiResponse::<()>::NoContent.into_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_error_into_response_status() {
        let resp: Response =
            ApiResponse::<()>::AppError(BrokerError::not_found("连接")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp: Response = ApiResponse::<()>::AppError(BrokerError::TokenExchange {
            status: 400,
            body: "invalid_grant".to_string(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
