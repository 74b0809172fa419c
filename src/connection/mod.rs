//! # 连接存储与令牌解析模块
//!
//! 已建立授权的持久化，以及带刷新决策的令牌读取路径

mod resolver;
mod store;

pub use resolver::{AccessToken, TokenResolver};
pub use store::{ConnectionStatus, ConnectionStore};
