//! # Connect Broker 主程序
//!
//! OAuth 2.0 连接代理服务

use connect_broker::{
    BrokerError, Result,
    config::load_config,
    database, logging,
    management::{AppState, serve},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init_logging(None);

    // 加载配置（文件 + 环境变量覆盖）
    let config = load_config()?;

    // 初始化数据库并执行迁移
    let db = database::init_database(&config.database.url)
        .await
        .map_err(|e| BrokerError::Database {
            message: format!("数据库连接失败: {e}"),
            source: Some(e.into()),
        })?;
    database::run_migrations(&db)
        .await
        .map_err(|e| BrokerError::Database {
            message: format!("数据库迁移失败: {e}"),
            source: Some(e.into()),
        })?;

    // 装配组件并启动服务
    let state = AppState::build(db, &config)?;
    info!("服务启动");
    if let Err(e) = serve(state, &config.server.host, config.server.port).await {
        error!("服务启动失败: {e:?}");
        std::process::exit(1);
    }

    info!("服务正常关闭");
    Ok(())
}
