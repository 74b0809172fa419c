//! # Connect Broker Library
//!
//! OAuth 2.0 连接代理核心库：驱动第三方授权码流程、
//! 密文存储令牌并在过期时透明刷新

pub mod config;
pub mod connection;
pub mod credentials;
pub mod crypto;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
pub mod oauth;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{BrokerError, Result};
