//! # 令牌解析器
//!
//! 读取路径上的刷新决策：令牌到期且持有刷新令牌时先刷新再返回；
//! 刷新失败降级返回既有令牌，读取不因刷新失败而失败

use crate::credentials::CredentialService;
use crate::error::{BrokerError, Result};
use crate::oauth::OAuthEngine;
use crate::provider::ProviderRegistry;
use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;

use super::store::ConnectionStore;

/// 令牌读取结果
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDateTime>,
    /// 本次读取是否经过了一次成功的刷新
    pub refreshed: bool,
}

/// 令牌解析器
#[derive(Debug, Clone)]
pub struct TokenResolver {
    store: ConnectionStore,
    registry: ProviderRegistry,
    credentials: CredentialService,
    engine: OAuthEngine,
}

impl TokenResolver {
    #[must_use]
    pub const fn new(
        store: ConnectionStore,
        registry: ProviderRegistry,
        credentials: CredentialService,
        engine: OAuthEngine,
    ) -> Self {
        Self {
            store,
            registry,
            credentials,
            engine,
        }
    }

    /// 取出可用的访问令牌
    ///
    /// 决策规则：设置了过期时间且已到期、存有刷新令牌、且提供商
    /// 声明了刷新端点时尝试刷新；其余情况原样返回。刷新失败只记
    /// 日志，降级返回（可能已过期的）既有令牌。
    pub async fn get_access_token(
        &self,
        provider_key: &str,
        external_id: &str,
    ) -> Result<AccessToken> {
        let model = self
            .store
            .find(provider_key, external_id)
            .await?
            .ok_or_else(|| BrokerError::not_found("连接"))?;

        let supports_refresh = self
            .registry
            .get(provider_key)
            .is_some_and(crate::provider::ProviderDescriptor::supports_refresh);

        let should_refresh =
            model.is_token_expired() && model.has_refresh_token() && supports_refresh;

        if should_refresh {
            match self.try_refresh(provider_key, external_id, &model).await {
                Ok(token) => return Ok(token),
                Err(err) => {
                    // 有意吞掉错误：调用方要的是尽力而为的令牌，不是刷新失败
                    tracing::warn!(
                        provider = provider_key,
                        external_id,
                        error = %err,
                        "令牌刷新失败，降级返回既有令牌"
                    );
                }
            }
        }

        Ok(AccessToken {
            access_token: self.store.vault().decrypt(&model.access_token_enc)?,
            expires_at: model.token_expires_at,
            refreshed: false,
        })
    }

    /// 执行一次刷新并用统一 upsert 路径落库
    async fn try_refresh(
        &self,
        provider_key: &str,
        external_id: &str,
        model: &entity::connections::Model,
    ) -> Result<AccessToken> {
        let descriptor = self
            .registry
            .get(provider_key)
            .ok_or_else(|| BrokerError::not_found("提供商"))?;

        let refresh_token_enc = model
            .refresh_token_enc
            .as_deref()
            .ok_or_else(|| BrokerError::internal("刷新路径缺少 refresh_token"))?;
        let refresh_token = self.store.vault().decrypt(refresh_token_enc)?;

        let creds = self.credentials.get_enabled(provider_key).await?;
        let token = self
            .engine
            .refresh(descriptor, &creds.client_id, &creds.client_secret, &refresh_token)
            .await?;

        self.store
            .upsert(provider_key, external_id, &token, &model.scopes)
            .await?;

        let expires_at = token
            .expires_in
            .map(|secs| Utc::now().naive_utc() + Duration::seconds(secs));

        tracing::info!(provider = provider_key, external_id, "访问令牌已刷新");

        Ok(AccessToken {
            access_token: token.access_token,
            expires_at,
            refreshed: true,
        })
    }
}
