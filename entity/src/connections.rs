//! # 连接实体定义
//!
//! `connections` 表的 Sea-ORM 实体模型
//! 每行对应一个已建立的 (provider_key, external_id) 授权，令牌全部密文落库

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 已建立的连接实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "connections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub provider_key: String,
    pub external_id: String,
    /// 加密后的访问令牌
    pub access_token_enc: String,
    /// 加密后的刷新令牌（提供商未下发时为空）
    pub refresh_token_enc: Option<String>,
    /// 访问令牌绝对过期时间，空表示永不过期
    pub token_expires_at: Option<DateTime>,
    /// 实际授予的作用域
    pub scopes: String,
    /// 加密后的完整原始令牌响应，保留提供商特有字段
    pub raw_response_enc: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 连接辅助方法
impl Model {
    /// 访问令牌是否已到期（无过期时间视为长期有效）
    pub fn is_token_expired(&self) -> bool {
        self.token_expires_at
            .is_some_and(|at| chrono::Utc::now().naive_utc() >= at)
    }

    /// 是否持有可用的刷新令牌
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token_enc.is_some()
    }
}
