//! # 连接会话实体定义
//!
//! `connect_sessions` 表的 Sea-ORM 实体模型
//! 记录一次进行中的授权尝试，携带 CSRF state 与可选的 PKCE verifier

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 会话状态：等待回调
pub const STATUS_PENDING: &str = "pending";
/// 会话状态：令牌交换成功，流程结束
pub const STATUS_COMPLETED: &str = "completed";
/// 会话状态：超时后收到回调，流程作废
pub const STATUS_EXPIRED: &str = "expired";

/// 连接会话实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "connect_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 调用方持有的会话句柄（64位十六进制）
    #[sea_orm(unique)]
    pub session_token: String,
    pub provider_key: String,
    pub external_id: String,
    /// CSRF state，随重定向往返（48位十六进制）
    #[sea_orm(unique)]
    pub state: String,
    /// 仅当提供商要求 PKCE 时存在
    pub code_verifier: Option<String>,
    pub status: String, // pending, completed, expired
    /// 调用方期望的完成后跳转地址
    pub redirect_uri: Option<String>,
    pub created_at: DateTime,
    pub expires_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 连接会话辅助方法
impl Model {
    /// 检查会话是否已过期（以读取时刻判断，不落库）
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().naive_utc() > self.expires_at
    }

    /// 检查会话是否仍然待处理
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING && !self.is_expired()
    }
}
