//! 连接存储与令牌解析器测试
//!
//! 关注点：upsert 的幂等与 refresh_token 保留、过期换算为绝对
//! 时间、以及不满足刷新条件时解析器不发起任何网络请求

use chrono::{Duration, Utc};
use connect_broker::connection::{ConnectionStore, TokenResolver};
use connect_broker::credentials::CredentialService;
use connect_broker::crypto::CredentialVault;
use connect_broker::database;
use connect_broker::oauth::{OAuthEngine, TokenResult};
use connect_broker::provider::ProviderRegistry;
use entity::{Connections, connections};
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

async fn test_db() -> (tempfile::TempDir, sea_orm::DatabaseConnection) {
    let tmp = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}/test.db", tmp.path().display());
    let db = database::init_database(&db_url).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    (tmp, db)
}

fn test_store(db: &sea_orm::DatabaseConnection) -> ConnectionStore {
    ConnectionStore::new(db.clone(), CredentialVault::new(&[3u8; 32]))
}

fn token(access: &str, refresh: Option<&str>, expires_in: Option<i64>, scope: Option<&str>) -> TokenResult {
    let mut raw = serde_json::Map::new();
    raw.insert(
        "access_token".to_string(),
        serde_json::Value::String(access.to_string()),
    );
    TokenResult {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_in,
        scope: scope.map(str::to_string),
        raw,
    }
}

#[tokio::test]
async fn upsert_twice_keeps_single_row() {
    let (_tmp, db) = test_db().await;
    let store = test_store(&db);

    store
        .upsert("github", "user-1", &token("tok1", Some("ref1"), Some(3600), None), "repo")
        .await
        .unwrap();
    store
        .upsert("github", "user-1", &token("tok2", None, Some(7200), None), "repo")
        .await
        .unwrap();

    let rows = Connections::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);

    // 第二次响应没带 refresh_token，旧值保留；access_token 已换新
    let row = &rows[0];
    assert!(row.refresh_token_enc.is_some());
    let vault = CredentialVault::new(&[3u8; 32]);
    assert_eq!(vault.decrypt(&row.access_token_enc).unwrap(), "tok2");
    assert_eq!(
        vault.decrypt(row.refresh_token_enc.as_deref().unwrap()).unwrap(),
        "ref1"
    );
}

#[tokio::test]
async fn expires_in_becomes_absolute_timestamp() {
    let (_tmp, db) = test_db().await;
    let store = test_store(&db);

    let before = Utc::now().naive_utc();
    store
        .upsert("github", "user-1", &token("tok1", None, Some(3600), None), "repo")
        .await
        .unwrap();
    let after = Utc::now().naive_utc();

    let row = Connections::find().one(&db).await.unwrap().unwrap();
    let expires_at = row.token_expires_at.unwrap();
    assert!(expires_at >= before + Duration::seconds(3600));
    assert!(expires_at <= after + Duration::seconds(3600));

    // 不带 expires_in 的提供商（如 GitHub 经典令牌）不设过期时间
    store
        .upsert("github", "user-2", &token("tok2", None, None, None), "repo")
        .await
        .unwrap();
    let status = store.get_status("github", "user-2").await.unwrap();
    assert!(status.connected);
    assert!(status.token_expires_at.is_none());
}

#[tokio::test]
async fn scope_from_response_beats_fallback() {
    let (_tmp, db) = test_db().await;
    let store = test_store(&db);

    store
        .upsert("github", "user-1", &token("tok1", None, None, Some("repo,user")), "repo")
        .await
        .unwrap();
    let status = store.get_status("github", "user-1").await.unwrap();
    assert_eq!(status.scopes.as_deref(), Some("repo,user"));

    store
        .upsert("slack", "user-1", &token("tok2", None, None, None), "chat:write")
        .await
        .unwrap();
    let status = store.get_status("slack", "user-1").await.unwrap();
    assert_eq!(status.scopes.as_deref(), Some("chat:write"));
}

/// 内置 github 描述符不声明刷新端点；令牌即使过期且存有
/// refresh_token，解析器也必须原样返回而不是发起网络请求
#[tokio::test]
async fn resolver_skips_refresh_without_endpoint() {
    let (_tmp, db) = test_db().await;
    let vault = CredentialVault::new(&[3u8; 32]);
    let store = ConnectionStore::new(db.clone(), vault.clone());
    let registry = ProviderRegistry::builtin();
    let credentials = CredentialService::new(db.clone(), vault);
    let resolver = TokenResolver::new(store.clone(), registry, credentials, OAuthEngine::new());

    store
        .upsert("github", "user-1", &token("stale", Some("ref1"), Some(3600), None), "repo")
        .await
        .unwrap();

    // 手动把过期时间拨回过去
    let model = Connections::find().one(&db).await.unwrap().unwrap();
    let mut active: connections::ActiveModel = model.into();
    active.token_expires_at = Set(Some(Utc::now().naive_utc() - Duration::seconds(5)));
    active.update(&db).await.unwrap();

    let result = resolver.get_access_token("github", "user-1").await.unwrap();
    assert_eq!(result.access_token, "stale");
    assert!(!result.refreshed);
}

/// 过期但没有 refresh_token：同样原样返回
#[tokio::test]
async fn resolver_returns_stale_without_refresh_token() {
    let (_tmp, db) = test_db().await;
    let vault = CredentialVault::new(&[3u8; 32]);
    let store = ConnectionStore::new(db.clone(), vault.clone());
    let registry = ProviderRegistry::builtin();
    let credentials = CredentialService::new(db.clone(), vault);
    let resolver = TokenResolver::new(store.clone(), registry, credentials, OAuthEngine::new());

    store
        .upsert("google", "user-1", &token("stale", None, Some(3600), None), "openid")
        .await
        .unwrap();
    let model = Connections::find().one(&db).await.unwrap().unwrap();
    let mut active: connections::ActiveModel = model.into();
    active.token_expires_at = Set(Some(Utc::now().naive_utc() - Duration::seconds(5)));
    active.update(&db).await.unwrap();

    let result = resolver.get_access_token("google", "user-1").await.unwrap();
    assert_eq!(result.access_token, "stale");
    assert!(!result.refreshed);
}
