//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和校验

mod app_config;

pub use app_config::{AppConfig, BrokerConfig, DatabaseConfig, ServerConfig};

use std::env;
use std::path::Path;

/// 加载配置文件
///
/// 读取 `config/config.{RUST_ENV}.toml`，再用环境变量覆盖敏感项：
/// `DATABASE_URL`、`BROKER_CALLBACK_BASE_URL`、`BROKER_ENCRYPTION_KEY`。
pub fn load_config() -> crate::error::Result<AppConfig> {
    let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    let config_file = format!("config/config.{env_name}.toml");

    if !Path::new(&config_file).exists() {
        return Err(crate::error::BrokerError::config(format!(
            "配置文件不存在: {config_file}"
        )));
    }

    let config_content = std::fs::read_to_string(&config_file).map_err(|e| {
        crate::error::BrokerError::config_with_source(format!("读取配置文件失败: {config_file}"), e)
    })?;

    let mut config: AppConfig = toml::from_str(&config_content)
        .map_err(|e| crate::error::BrokerError::config_with_source("配置文件解析失败", e))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// 环境变量覆盖文件配置，密钥类配置优先走环境变量
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Ok(base) = env::var("BROKER_CALLBACK_BASE_URL") {
        config.broker.callback_base_url = base;
    }
    if let Ok(key) = env::var("BROKER_ENCRYPTION_KEY") {
        config.broker.encryption_key = key;
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    if config.server.port == 0 {
        return Err(crate::error::BrokerError::config(format!(
            "无效的服务器端口: {}",
            config.server.port
        )));
    }

    if config.broker.callback_base_url.is_empty() {
        return Err(crate::error::BrokerError::config(
            "callback_base_url 不能为空",
        ));
    }

    // 密钥格式在此先行拦截，保险库首次使用时仍会复核
    if config.broker.encryption_key.len() != 64
        || hex::decode(&config.broker.encryption_key).is_err()
    {
        return Err(crate::error::BrokerError::config(
            "encryption_key 必须是64个字符的十六进制字符串（32字节）",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            broker: BrokerConfig {
                callback_base_url: "https://broker.example.com".to_string(),
                encryption_key: "ab".repeat(32),
            },
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_short_encryption_key() {
        let mut config = base_config();
        config.broker.encryption_key = "abcd".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_non_hex_encryption_key() {
        let mut config = base_config();
        config.broker.encryption_key = "zz".repeat(32);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_callback_url_strips_trailing_slash() {
        let broker = BrokerConfig {
            callback_base_url: "https://broker.example.com/".to_string(),
            encryption_key: "ab".repeat(32),
        };
        assert_eq!(
            broker.callback_url(),
            "https://broker.example.com/oauth/callback"
        );
    }
}
