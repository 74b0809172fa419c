//! # 提供商管理处理器

use crate::credentials::ProviderStatus;
use crate::error::BrokerError;
use crate::management::response::ApiResponse;
use crate::management::server::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

/// `GET /api/providers`
///
/// 列出注册表内全部提供商及其配置状态
pub async fn list_providers(
    State(state): State<AppState>,
) -> ApiResponse<Vec<ProviderStatus>> {
    match state.credentials.list_status(&state.registry).await {
        Ok(list) => ApiResponse::Success(list),
        Err(err) => ApiResponse::AppError(err),
    }
}

/// 设置凭据请求体
#[derive(Debug, Deserialize)]
pub struct SetCredentialsRequest {
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Option<String>,
}

/// `PUT /api/providers/{provider}/credentials`
///
/// 管理端 upsert 提供商 OAuth 应用凭据
pub async fn set_provider_credentials(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(req): Json<SetCredentialsRequest>,
) -> ApiResponse<()> {
    if !state.registry.is_valid(&provider) {
        return ApiResponse::AppError(BrokerError::not_found("提供商"));
    }

    match state
        .credentials
        .set(&provider, &req.client_id, &req.client_secret, req.scopes)
        .await
    {
        Ok(()) => ApiResponse::SuccessWithoutData("凭据已保存".to_string()),
        Err(err) => ApiResponse::AppError(err),
    }
}
