//! # OAuth 回调处理器
//!
//! 提供商重定向回来的落点。这里的失败不抛给人看的 API 错误，
//! 而是统一折算成 `status=error` 的跳转或状态页；上游细节只进
//! 日志，不进重定向地址

use crate::error::BrokerError;
use crate::management::server::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

/// 回调查询参数：成功时带 code/state，拒绝时带 error
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /oauth/callback`
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // 用户在提供商侧拒绝授权
    if let Some(error) = &query.error {
        tracing::warn!(
            error,
            description = query.error_description.as_deref().unwrap_or(""),
            "提供商回调返回错误"
        );
        return status_page(false, "授权被拒绝或失败");
    }

    let (Some(code), Some(csrf_state)) = (&query.code, &query.state) else {
        return status_page(false, "回调参数缺失");
    };

    match state.sessions.complete_from_callback(code, csrf_state).await {
        Ok(result) => match result.redirect_uri {
            Some(target) => redirect_with(&target, "connected", None),
            None => status_page(true, "连接已建立，可以关闭此页面"),
        },
        Err(err) => {
            tracing::warn!(error = %err, "回调处理失败");
            let message = match err {
                BrokerError::SessionExpired => "授权会话已过期，请重新发起连接",
                BrokerError::NotFound { .. } => "授权会话无效或已被使用",
                _ => "连接失败，请重新发起",
            };
            // 留有调用方跳转地址时带错误跳回，否则落到通用状态页
            match state.sessions.redirect_target(csrf_state).await {
                Some(target) => redirect_with(&target, "error", Some(message)),
                None => status_page(false, message),
            }
        }
    }
}

/// 跳回调用方地址，附带结果参数
fn redirect_with(target: &str, status: &str, error: Option<&str>) -> Response {
    let mut url = match url::Url::parse(target) {
        Ok(url) => url,
        Err(_) => return status_page(status == "connected", "跳转地址非法"),
    };
    url.query_pairs_mut().append_pair("status", status);
    if let Some(message) = error {
        url.query_pairs_mut().append_pair("error", message);
    }
    Redirect::to(url.as_str()).into_response()
}

/// 极简终端状态页
fn status_page(ok: bool, message: &str) -> Response {
    let (code, title) = if ok {
        (StatusCode::OK, "连接成功")
    } else {
        (StatusCode::BAD_REQUEST, "连接失败")
    };
    let body = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h1>{title}</h1><p>{message}</p></body></html>"
    );
    (code, Html(body)).into_response()
}
