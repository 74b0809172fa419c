//! # 连接会话处理器

use crate::management::response::ApiResponse;
use crate::management::server::AppState;
use crate::session::StartedSession;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

/// 创建会话请求体
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub provider: String,
    pub external_id: String,
    /// 完成后跳转地址，可选
    pub redirect_uri: Option<String>,
}

/// `POST /api/connect/sessions`
///
/// 启动一次授权流程，返回会话句柄与授权地址
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResponse<StartedSession> {
    match state
        .sessions
        .start(&req.provider, &req.external_id, req.redirect_uri)
        .await
    {
        Ok(started) => ApiResponse::Created(started),
        Err(err) => ApiResponse::AppError(err),
    }
}
