//! # 管理服务
//!
//! 应用状态装配与 HTTP 服务启动；所有句柄显式构造注入，
//! 不使用进程级单例

use crate::config::AppConfig;
use crate::connection::{ConnectionStore, TokenResolver};
use crate::credentials::CredentialService;
use crate::crypto::CredentialVault;
use crate::error::Result;
use crate::oauth::OAuthEngine;
use crate::provider::ProviderRegistry;
use crate::session::SessionManager;
use sea_orm::DatabaseConnection;

/// 应用共享状态
///
/// 各组件内部持有的数据库/HTTP 句柄都是可克隆的轻量引用
#[derive(Clone)]
pub struct AppState {
    pub registry: ProviderRegistry,
    pub credentials: CredentialService,
    pub sessions: SessionManager,
    pub store: ConnectionStore,
    pub resolver: TokenResolver,
}

impl AppState {
    /// 按依赖序装配全部组件
    pub fn build(db: DatabaseConnection, config: &AppConfig) -> Result<Self> {
        let vault = CredentialVault::from_hex(&config.broker.encryption_key)?;
        let registry = ProviderRegistry::builtin();
        let engine = OAuthEngine::new();

        let credentials = CredentialService::new(db.clone(), vault.clone());
        let store = ConnectionStore::new(db.clone(), vault);
        let resolver = TokenResolver::new(
            store.clone(),
            registry.clone(),
            credentials.clone(),
            engine.clone(),
        );
        let sessions = SessionManager::new(
            db,
            registry.clone(),
            credentials.clone(),
            engine,
            store.clone(),
            config.broker.callback_url(),
        );

        Ok(Self {
            registry,
            credentials,
            sessions,
            store,
            resolver,
        })
    }
}

/// 启动 HTTP 服务并阻塞运行
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = super::routes::create_routes(state);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        crate::error::BrokerError::config_with_source(format!("监听地址绑定失败: {addr}"), e)
    })?;

    tracing::info!(addr = %addr, "管理服务已启动");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::BrokerError::internal(format!("HTTP 服务异常退出: {e}")))
}
