//! # 错误类型定义

use axum::http::StatusCode;
use thiserror::Error;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum BrokerError {
    /// 配置相关错误（密钥缺失/格式错误、凭据缺失）
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 网络通信错误（与提供商令牌端点交互失败）
    #[error("网络错误: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 资源不存在（提供商、会话或连接）
    #[error("{resource}不存在")]
    NotFound { resource: String },

    /// 调用方输入非法，进入任何 I/O 之前拒绝
    #[error("参数校验失败: {message}")]
    Validation { message: String },

    /// 提供商未配置凭据或已停用
    #[error("提供商未配置: {provider}")]
    ProviderNotConfigured { provider: String },

    /// 会话已超时，回调到达过晚
    #[error("授权会话已过期")]
    SessionExpired,

    /// 令牌交换被提供商拒绝，保留上游状态与响应体用于诊断
    #[error("令牌交换失败: HTTP {status}")]
    TokenExchange { status: u16, body: String },

    /// 令牌刷新被提供商拒绝
    #[error("令牌刷新失败: HTTP {status}")]
    TokenRefresh { status: u16, body: String },

    /// 描述符未声明刷新端点
    #[error("提供商 {provider} 不支持令牌刷新")]
    RefreshUnsupported { provider: String },

    /// 密文完整性校验失败，该记录作废但进程不退出
    #[error("解密失败: {message}")]
    Decryption { message: String },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl BrokerError {
    /// 创建配置错误
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的网络错误
    pub fn network_with_source<S: Into<String>>(
        message: S,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建资源不存在错误
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 创建参数校验错误
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// 创建提供商未配置错误
    pub fn provider_not_configured<S: Into<String>>(provider: S) -> Self {
        Self::ProviderNotConfigured {
            provider: provider.into(),
        }
    }

    /// 创建解密错误
    pub fn decryption<S: Into<String>>(message: S) -> Self {
        Self::Decryption {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 映射为 HTTP 状态码（管理端统一出口使用）
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ProviderNotConfigured { .. } => StatusCode::CONFLICT,
            Self::SessionExpired => StatusCode::GONE,
            Self::TokenExchange { .. } | Self::TokenRefresh { .. } => StatusCode::BAD_GATEWAY,
            Self::RefreshUnsupported { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 稳定的错误码字符串（响应体的 error.code 字段）
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ProviderNotConfigured { .. } => "PROVIDER_NOT_CONFIGURED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::TokenExchange { .. } => "TOKEN_EXCHANGE_FAILED",
            Self::TokenRefresh { .. } => "TOKEN_REFRESH_FAILED",
            Self::RefreshUnsupported { .. } => "REFRESH_UNSUPPORTED",
            Self::Decryption { .. } => "DECRYPTION_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<sea_orm::DbErr> for BrokerError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
            source: err.into(),
        }
    }
}

impl From<url::ParseError> for BrokerError {
    fn from(err: url::ParseError) -> Self {
        Self::Validation {
            message: format!("URL解析错误: {err}"),
        }
    }
}
