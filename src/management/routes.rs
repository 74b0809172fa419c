//! # 路由配置
//!
//! 定义所有API路由和路由组织

use crate::management::server::AppState;
use axum::Router;
use axum::routing::{delete, get, post, put};

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 连接流程与连接管理 API
        .nest("/api", api_routes())
        // 提供商重定向回来的回调端点，不供 API 客户端直接调用
        .route(
            "/oauth/callback",
            get(crate::management::handlers::callback::oauth_callback),
        )
        .with_state(state)
}

/// 调用方 API 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/connect/sessions",
            post(crate::management::handlers::sessions::create_session),
        )
        .route(
            "/connections/{provider}/{external_id}",
            get(crate::management::handlers::connections::get_connection_status),
        )
        .route(
            "/connections/{provider}/{external_id}/token",
            get(crate::management::handlers::connections::get_access_token),
        )
        .route(
            "/connections/{provider}/{external_id}",
            delete(crate::management::handlers::connections::disconnect),
        )
        .route(
            "/providers",
            get(crate::management::handlers::providers::list_providers),
        )
        .route(
            "/providers/{provider}/credentials",
            put(crate::management::handlers::providers::set_provider_credentials),
        )
}
