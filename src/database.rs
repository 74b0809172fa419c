//! # 数据库模块
//!
//! 数据库连接和迁移管理

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use tracing::{debug, info};

/// 初始化数据库连接
///
/// SQLite 场景下先确保数据库文件与父目录存在
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    info!("正在连接数据库");

    if let Some(db_path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    {
        // 内存库无需建文件
        if !db_path.starts_with(':') {
            ensure_sqlite_file(db_path)?;
        }
    }

    let db = Database::connect(database_url).await?;

    info!("数据库连接成功");
    Ok(db)
}

fn ensure_sqlite_file(db_path: &str) -> Result<(), DbErr> {
    let db_file_path = Path::new(db_path);

    if let Some(parent_dir) = db_file_path.parent() {
        if !parent_dir.exists() {
            debug!("创建数据库目录: {}", parent_dir.display());
            std::fs::create_dir_all(parent_dir).map_err(|e| {
                DbErr::Custom(format!("无法创建数据库目录 {}: {}", parent_dir.display(), e))
            })?;
        }
    }

    if !db_file_path.exists() {
        debug!("创建数据库文件: {}", db_file_path.display());
        std::fs::File::create(db_file_path).map_err(|e| {
            DbErr::Custom(format!("无法创建数据库文件 {}: {}", db_file_path.display(), e))
        })?;
    }

    Ok(())
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    info!("开始运行数据库迁移...");
    ::migration::Migrator::up(db, None).await?;
    info!("数据库迁移完成");
    Ok(())
}
