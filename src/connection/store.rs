//! # 连接存储
//!
//! (provider_key, external_id) 唯一的已建立授权；初次连接与后续
//! 刷新共用同一条幂等 upsert 写路径

use crate::crypto::CredentialVault;
use crate::error::{BrokerError, Result};
use crate::oauth::TokenResult;
use chrono::{Duration, NaiveDateTime, Utc};
use entity::{Connections, connections};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use serde::Serialize;

/// 对外的连接状态，绝不携带令牌本体
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// 连接存储
#[derive(Debug, Clone)]
pub struct ConnectionStore {
    db: DatabaseConnection,
    vault: CredentialVault,
}

impl ConnectionStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection, vault: CredentialVault) -> Self {
        Self { db, vault }
    }

    /// 写入或更新连接
    ///
    /// 三段机密各自独立加密；`expires_in` 在此换算为绝对时间。
    /// 刷新响应通常不重发 refresh_token，更新时保留已存值。
    pub async fn upsert(
        &self,
        provider_key: &str,
        external_id: &str,
        token: &TokenResult,
        fallback_scopes: &str,
    ) -> Result<()> {
        let access_token_enc = self.vault.encrypt(&token.access_token)?;
        let refresh_token_enc = token
            .refresh_token
            .as_deref()
            .map(|t| self.vault.encrypt(t))
            .transpose()?;
        let raw_response_enc = self.vault.encrypt(&token.raw_json()?)?;

        let now = Utc::now().naive_utc();
        let token_expires_at = token.expires_in.map(|secs| now + Duration::seconds(secs));
        let scopes = token
            .scope
            .clone()
            .unwrap_or_else(|| fallback_scopes.to_string());

        match self.find(provider_key, external_id).await? {
            Some(model) => {
                let mut active: connections::ActiveModel = model.into();
                active.access_token_enc = Set(access_token_enc);
                // 新响应缺少 refresh_token 时保留旧值
                if let Some(enc) = refresh_token_enc {
                    active.refresh_token_enc = Set(Some(enc));
                }
                active.token_expires_at = Set(token_expires_at);
                active.scopes = Set(scopes);
                active.raw_response_enc = Set(raw_response_enc);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = connections::ActiveModel {
                    provider_key: Set(provider_key.to_string()),
                    external_id: Set(external_id.to_string()),
                    access_token_enc: Set(access_token_enc),
                    refresh_token_enc: Set(refresh_token_enc),
                    token_expires_at: Set(token_expires_at),
                    scopes: Set(scopes),
                    raw_response_enc: Set(raw_response_enc),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await?;
            }
        }

        Ok(())
    }

    /// 查询连接状态；不存在不算错误
    pub async fn get_status(
        &self,
        provider_key: &str,
        external_id: &str,
    ) -> Result<ConnectionStatus> {
        match self.find(provider_key, external_id).await? {
            Some(model) => Ok(ConnectionStatus {
                connected: true,
                scopes: Some(model.scopes),
                token_expires_at: model.token_expires_at,
                created_at: Some(model.created_at),
                updated_at: Some(model.updated_at),
            }),
            None => Ok(ConnectionStatus {
                connected: false,
                scopes: None,
                token_expires_at: None,
                created_at: None,
                updated_at: None,
            }),
        }
    }

    /// 硬删除连接，返回是否确实存在过
    pub async fn remove(&self, provider_key: &str, external_id: &str) -> Result<bool> {
        match self.find(provider_key, external_id).await? {
            Some(model) => {
                model.delete(&self.db).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 按唯一键查行（模块内部及令牌解析器使用）
    pub(crate) async fn find(
        &self,
        provider_key: &str,
        external_id: &str,
    ) -> Result<Option<connections::Model>> {
        Connections::find()
            .filter(connections::Column::ProviderKey.eq(provider_key))
            .filter(connections::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(BrokerError::from)
    }

    pub(crate) const fn vault(&self) -> &CredentialVault {
        &self.vault
    }
}
