//! # API 处理器集合

pub mod callback;
pub mod connections;
pub mod providers;
pub mod sessions;
