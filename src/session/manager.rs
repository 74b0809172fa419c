//! # 连接会话管理器
//!
//! 授权流程的状态机：签发携带 CSRF state / PKCE 的短时会话，
//! 回调返回时校验并驱动 pending → completed / expired 的单向迁移

use crate::connection::ConnectionStore;
use crate::credentials::CredentialService;
use crate::error::{BrokerError, Result};
use crate::oauth::{OAuthEngine, build_authorize_url, pkce};
use crate::provider::ProviderRegistry;
use chrono::{Duration, NaiveDateTime, Utc};
use entity::{ConnectSessions, connect_sessions};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;

/// 会话绝对有效期：创建后 10 分钟
const SESSION_TTL_MINUTES: i64 = 10;

/// 流程启动结果
#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    pub session_token: String,
    pub authorization_url: String,
    pub expires_at: NaiveDateTime,
}

/// 回调完成结果，供边界层构建终端跳转
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub provider_key: String,
    /// 调用方在启动时留下的跳转地址
    pub redirect_uri: Option<String>,
}

/// 连接会话管理器
#[derive(Debug, Clone)]
pub struct SessionManager {
    db: DatabaseConnection,
    registry: ProviderRegistry,
    credentials: CredentialService,
    engine: OAuthEngine,
    store: ConnectionStore,
    /// 代理自身的回调地址，作为提供商侧 redirect_uri
    callback_url: String,
}

impl SessionManager {
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        registry: ProviderRegistry,
        credentials: CredentialService,
        engine: OAuthEngine,
        store: ConnectionStore,
        callback_url: String,
    ) -> Self {
        Self {
            db,
            registry,
            credentials,
            engine,
            store,
            callback_url,
        }
    }

    /// 启动一次授权流程
    ///
    /// 提供商侧 redirect_uri 永远是代理自己的回调端点；调用方的
    /// `redirect_uri` 只存下来用作完成后的跳转目标。
    pub async fn start(
        &self,
        provider_key: &str,
        external_id: &str,
        redirect_uri: Option<String>,
    ) -> Result<StartedSession> {
        if provider_key.is_empty() || external_id.is_empty() {
            return Err(BrokerError::validation("provider 与 external_id 不能为空"));
        }

        let descriptor = self
            .registry
            .get(provider_key)
            .ok_or_else(|| BrokerError::not_found("提供商"))?;
        let creds = self.credentials.get_enabled(provider_key).await?;

        let state = pkce::generate_state();
        let session_token = pkce::generate_session_token();

        // 仅当描述符要求 PKCE 时生成 verifier/challenge 对
        let (code_verifier, code_challenge) = if descriptor.pkce {
            let verifier = pkce::generate_verifier();
            let challenge = pkce::challenge_from_verifier(&verifier);
            (Some(verifier), Some(challenge))
        } else {
            (None, None)
        };

        let authorization_url = build_authorize_url(
            descriptor,
            &creds.client_id,
            &self.callback_url,
            &state,
            creds.scopes.as_deref(),
            code_challenge.as_deref(),
        )?;

        let now = Utc::now().naive_utc();
        let expires_at = now + Duration::minutes(SESSION_TTL_MINUTES);

        let active = connect_sessions::ActiveModel {
            session_token: Set(session_token.clone()),
            provider_key: Set(provider_key.to_string()),
            external_id: Set(external_id.to_string()),
            state: Set(state),
            code_verifier: Set(code_verifier),
            status: Set(connect_sessions::STATUS_PENDING.to_string()),
            redirect_uri: Set(redirect_uri),
            created_at: Set(now),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        active.insert(&self.db).await?;

        tracing::info!(provider = provider_key, external_id, "授权流程已启动");

        Ok(StartedSession {
            session_token,
            authorization_url: authorization_url.to_string(),
            expires_at,
        })
    }

    /// 处理提供商回调
    ///
    /// 按 state 查 pending 会话；查不到时不区分"从未存在"与
    /// "已被消费"，避免泄露流程存在性。过期回调顺手把会话标记
    /// 为 expired 再报错。
    pub async fn complete_from_callback(&self, code: &str, state: &str) -> Result<CompletionResult> {
        let session = ConnectSessions::find()
            .filter(connect_sessions::Column::State.eq(state))
            .filter(connect_sessions::Column::Status.eq(connect_sessions::STATUS_PENDING))
            .one(&self.db)
            .await?
            .ok_or_else(|| BrokerError::not_found("会话"))?;

        if session.is_expired() {
            self.transition(&session, connect_sessions::STATUS_EXPIRED)
                .await?;
            return Err(BrokerError::SessionExpired);
        }

        let descriptor = self
            .registry
            .get(&session.provider_key)
            .ok_or_else(|| BrokerError::not_found("提供商"))?;
        let creds = self.credentials.get_enabled(&session.provider_key).await?;

        let token = self
            .engine
            .exchange_code(
                descriptor,
                &creds.client_id,
                &creds.client_secret,
                code,
                &self.callback_url,
                session.code_verifier.as_deref(),
            )
            .await?;

        let fallback_scopes = creds
            .scopes
            .clone()
            .unwrap_or_else(|| descriptor.joined_scopes());
        self.store
            .upsert(&session.provider_key, &session.external_id, &token, &fallback_scopes)
            .await?;

        self.transition(&session, connect_sessions::STATUS_COMPLETED)
            .await?;

        tracing::info!(
            provider = %session.provider_key,
            external_id = %session.external_id,
            "授权流程完成，连接已建立"
        );

        Ok(CompletionResult {
            provider_key: session.provider_key.clone(),
            redirect_uri: session.redirect_uri.clone(),
        })
    }

    /// 失败回调要跳回的调用方地址（仅边界层使用，不对外暴露会话内容）
    pub async fn redirect_target(&self, state: &str) -> Option<String> {
        ConnectSessions::find()
            .filter(connect_sessions::Column::State.eq(state))
            .one(&self.db)
            .await
            .ok()
            .flatten()
            .and_then(|s| s.redirect_uri)
    }

    /// 会话状态迁移（pending → completed / expired，终态不再变更）
    async fn transition(&self, session: &connect_sessions::Model, status: &str) -> Result<()> {
        let mut active: connect_sessions::ActiveModel = session.clone().into();
        active.status = Set(status.to_string());
        active.update(&self.db).await?;
        Ok(())
    }
}
