//! # Entity 模块
//!
//! 包含连接代理所有 Sea-ORM 实体定义

pub mod connect_sessions;
pub mod connections;
pub mod provider_credentials;


pub use connect_sessions::Entity as ConnectSessions;
pub use connections::Entity as Connections;
pub use provider_credentials::Entity as ProviderCredentials;
