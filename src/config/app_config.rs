//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 代理核心配置
    pub broker: BrokerConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/broker.db".to_string(),
        }
    }
}

/// 代理核心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// 对外可达的回调基地址，用于拼接提供商侧 redirect_uri
    /// 例如 `https://broker.example.com`
    pub callback_base_url: String,
    /// 凭据保险库密钥，64 个十六进制字符（32 字节）
    pub encryption_key: String,
}

impl BrokerConfig {
    /// 提供商重定向回来的完整回调地址
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!(
            "{}/oauth/callback",
            self.callback_base_url.trim_end_matches('/')
        )
    }
}
