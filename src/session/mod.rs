//! # 连接会话模块
//!
//! 进行中授权尝试的签发与回调校验

mod manager;

pub use manager::{CompletionResult, SessionManager, StartedSession};
