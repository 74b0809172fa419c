//! # 提供商注册表模块
//!
//! 声明式描述每个第三方的 OAuth 方言，供协议引擎消费

mod builtin;
mod registry;

pub use registry::{CredentialsIn, ProviderDescriptor, ProviderRegistry, TokenResponseFormat};
