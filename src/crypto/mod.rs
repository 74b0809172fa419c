//! # 加密模块
//!
//! 机密字段落库前的对称认证加密

mod vault;

pub use vault::CredentialVault;
