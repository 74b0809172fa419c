//! # 连接管理处理器

use crate::connection::{AccessToken, ConnectionStatus};
use crate::error::BrokerError;
use crate::management::response::ApiResponse;
use crate::management::server::AppState;
use axum::extract::{Path, State};

/// `GET /api/connections/{provider}/{external_id}`
///
/// 查询连接状态，未连接不是错误
pub async fn get_connection_status(
    State(state): State<AppState>,
    Path((provider, external_id)): Path<(String, String)>,
) -> ApiResponse<ConnectionStatus> {
    match state.store.get_status(&provider, &external_id).await {
        Ok(status) => ApiResponse::Success(status),
        Err(err) => ApiResponse::AppError(err),
    }
}

/// `GET /api/connections/{provider}/{external_id}/token`
///
/// 取用访问令牌，到期且可刷新时先刷新再返回
pub async fn get_access_token(
    State(state): State<AppState>,
    Path((provider, external_id)): Path<(String, String)>,
) -> ApiResponse<AccessToken> {
    match state.resolver.get_access_token(&provider, &external_id).await {
        Ok(token) => ApiResponse::Success(token),
        Err(err) => ApiResponse::AppError(err),
    }
}

/// `DELETE /api/connections/{provider}/{external_id}`
pub async fn disconnect(
    State(state): State<AppState>,
    Path((provider, external_id)): Path<(String, String)>,
) -> ApiResponse<()> {
    match state.store.remove(&provider, &external_id).await {
        Ok(true) => ApiResponse::NoContent,
        Ok(false) => ApiResponse::AppError(BrokerError::not_found("连接")),
        Err(err) => ApiResponse::AppError(err),
    }
}
