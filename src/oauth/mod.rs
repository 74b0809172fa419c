//! # OAuth 协议引擎模块
//!
//! 构建授权地址、执行授权码交换与令牌刷新，由提供商描述符参数化

mod engine;
pub mod pkce;
mod token;

pub use engine::{OAuthEngine, build_authorize_url};
pub use token::TokenResult;
