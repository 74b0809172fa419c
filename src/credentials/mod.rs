//! # 提供商凭据服务
//!
//! 部署方 OAuth 应用凭据的管理：client_secret 经保险库加密后落库，
//! 读取路径只返回解密后的内存值

use crate::crypto::CredentialVault;
use crate::error::{BrokerError, Result};
use crate::provider::ProviderRegistry;
use chrono::Utc;
use entity::{ProviderCredentials, provider_credentials};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;

/// 解密后的可用凭据
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// 部署方配置的作用域覆盖
    pub scopes: Option<String>,
}

/// 提供商配置状态（管理端列表使用，不含任何机密）
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub key: String,
    pub display_name: String,
    pub configured: bool,
    pub enabled: bool,
    pub supports_refresh: bool,
}

/// 提供商凭据服务
#[derive(Debug, Clone)]
pub struct CredentialService {
    db: DatabaseConnection,
    vault: CredentialVault,
}

impl CredentialService {
    #[must_use]
    pub const fn new(db: DatabaseConnection, vault: CredentialVault) -> Self {
        Self { db, vault }
    }

    /// 管理端 upsert：每个提供商一行，重复设置走更新
    pub async fn set(
        &self,
        provider_key: &str,
        client_id: &str,
        client_secret: &str,
        scopes: Option<String>,
    ) -> Result<()> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(BrokerError::validation("client_id 与 client_secret 不能为空"));
        }

        let secret_enc = self.vault.encrypt(client_secret)?;
        let now = Utc::now().naive_utc();

        let existing = ProviderCredentials::find()
            .filter(provider_credentials::Column::ProviderKey.eq(provider_key))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut active: provider_credentials::ActiveModel = model.into();
                active.client_id = Set(client_id.to_string());
                active.client_secret_enc = Set(secret_enc);
                active.scopes = Set(scopes);
                active.enabled = Set(true);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = provider_credentials::ActiveModel {
                    provider_key: Set(provider_key.to_string()),
                    client_id: Set(client_id.to_string()),
                    client_secret_enc: Set(secret_enc),
                    scopes: Set(scopes),
                    enabled: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await?;
            }
        }

        Ok(())
    }

    /// 读取启用状态的凭据并解密 client_secret
    ///
    /// 未配置或已停用都归为 `ProviderNotConfigured`
    pub async fn get_enabled(&self, provider_key: &str) -> Result<ResolvedCredentials> {
        let model = ProviderCredentials::find()
            .filter(provider_credentials::Column::ProviderKey.eq(provider_key))
            .filter(provider_credentials::Column::Enabled.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| BrokerError::provider_not_configured(provider_key))?;

        let client_secret = self.vault.decrypt(&model.client_secret_enc)?;

        Ok(ResolvedCredentials {
            client_id: model.client_id,
            client_secret,
            scopes: model.scopes,
        })
    }

    /// 注册表与落库凭据合并出的配置状态列表
    pub async fn list_status(&self, registry: &ProviderRegistry) -> Result<Vec<ProviderStatus>> {
        let rows = ProviderCredentials::find().all(&self.db).await?;

        Ok(registry
            .list()
            .into_iter()
            .map(|descriptor| {
                let row = rows.iter().find(|r| r.provider_key == descriptor.key);
                ProviderStatus {
                    key: descriptor.key.clone(),
                    display_name: descriptor.display_name.clone(),
                    configured: row.is_some(),
                    enabled: row.is_some_and(|r| r.enabled),
                    supports_refresh: descriptor.supports_refresh(),
                }
            })
            .collect())
    }
}
