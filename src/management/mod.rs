//! # 管理端模块
//!
//! HTTP 边界：路由、处理器与统一响应信封

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{AppState, serve};
