//! # 提供商凭据实体定义
//!
//! `provider_credentials` 表的 Sea-ORM 实体模型
//! 部署方为每个提供商注册的 OAuth 应用凭据，client_secret 密文落库

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 提供商凭据实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_credentials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub provider_key: String,
    pub client_id: String,
    /// 加密后的 client_secret
    pub client_secret_enc: String,
    /// 作用域覆盖，空则使用描述符默认作用域
    pub scopes: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
