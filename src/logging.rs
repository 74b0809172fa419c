//! # 日志配置模块
//!
//! 基于 tracing-subscriber 的日志初始化，默认关闭数据库查询噪音

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志系统
///
/// `RUST_LOG` 优先；未设置时使用给定级别并静默 sqlx 查询日志。
/// 令牌、密钥等敏感内容一律不进日志，调用处只记录元信息。
pub fn init_logging(log_level: Option<&String>) {
    let level = log_level.map_or("info", std::string::String::as_str);

    // 默认配置：禁止数据库查询的详细日志
    let default_filter = format!(
        "{level},connect_broker=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn"
    );

    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
