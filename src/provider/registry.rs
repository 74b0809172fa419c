//! # 提供商描述符与注册表
//!
//! 所有方言差异（作用域分隔符、凭据传递方式、响应编码等）都是数据，
//! 引擎共享一份逻辑，不为单个提供商分支

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 令牌响应编码
///
/// 引擎严格按描述符声明解析，不从响应头猜测
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenResponseFormat {
    /// JSON 响应体
    Json,
    /// application/x-www-form-urlencoded 响应体（如 GitHub）
    Form,
}

/// 客户端凭据传递方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialsIn {
    /// client_id / client_secret 放在表单体
    Body,
    /// HTTP Basic-Auth 头（`client_id:client_secret`）
    BasicAuthHeader,
}

/// 提供商描述符
///
/// 启动时装载，注册后不可变；key 全局唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub key: String,
    pub display_name: String,
    pub authorize_url: String,
    pub token_url: String,
    /// 空表示令牌不过期、不可刷新
    pub refresh_url: Option<String>,
    pub default_scopes: Vec<String>,
    pub scope_separator: String,
    pub token_response_format: TokenResponseFormat,
    /// 固定附加到授权地址的查询参数，最后应用、可覆盖计算参数
    pub extra_authorize_params: Vec<(String, String)>,
    pub pkce: bool,
    pub credentials_in: CredentialsIn,
}

impl ProviderDescriptor {
    /// 描述符默认作用域拼接为一个 scope 串
    #[must_use]
    pub fn joined_scopes(&self) -> String {
        self.default_scopes.join(&self.scope_separator)
    }

    /// 提供商是否支持刷新令牌
    #[must_use]
    pub const fn supports_refresh(&self) -> bool {
        self.refresh_url.is_some()
    }
}

/// 提供商注册表
///
/// 纯查找，无副作用；唯一的失败形态是"不存在"
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    descriptors: HashMap<String, ProviderDescriptor>,
    ordered_keys: Vec<String>,
}

impl ProviderRegistry {
    /// 从描述符列表构建注册表
    ///
    /// # Panics
    ///
    /// key 重复属于程序错误，构建时直接 panic
    #[must_use]
    pub fn new(descriptors: Vec<ProviderDescriptor>) -> Self {
        let mut map = HashMap::with_capacity(descriptors.len());
        let mut ordered_keys = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let key = descriptor.key.clone();
            assert!(
                map.insert(key.clone(), descriptor).is_none(),
                "duplicate provider key: {key}"
            );
            ordered_keys.push(key);
        }
        Self {
            descriptors: map,
            ordered_keys,
        }
    }

    /// 内置提供商表
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(super::builtin::descriptors())
    }

    /// 按 key 查找描述符
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProviderDescriptor> {
        self.descriptors.get(key)
    }

    /// 按注册顺序列出全部描述符
    #[must_use]
    pub fn list(&self) -> Vec<&ProviderDescriptor> {
        self.ordered_keys
            .iter()
            .filter_map(|k| self.descriptors.get(k))
            .collect()
    }

    /// key 是否已注册
    #[must_use]
    pub fn is_valid(&self, key: &str) -> bool {
        self.descriptors.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_lookup() {
        let registry = ProviderRegistry::builtin();
        assert!(registry.is_valid("github"));
        assert!(registry.is_valid("google"));
        assert!(!registry.is_valid("myspace"));
        assert!(registry.get("github").is_some());
        assert!(registry.get("myspace").is_none());
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let registry = ProviderRegistry::builtin();
        let keys: Vec<&str> = registry.list().iter().map(|d| d.key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len(), "keys must be unique");
        assert_eq!(keys.first(), Some(&"github"));
    }

    #[test]
    fn test_github_is_non_refreshable_form_encoded() {
        let registry = ProviderRegistry::builtin();
        let github = registry.get("github").unwrap();
        assert!(!github.supports_refresh());
        assert_eq!(github.token_response_format, TokenResponseFormat::Form);
    }

    #[test]
    fn test_google_requires_offline_access_params() {
        let registry = ProviderRegistry::builtin();
        let google = registry.get("google").unwrap();
        assert!(google.supports_refresh());
        assert!(
            google
                .extra_authorize_params
                .iter()
                .any(|(k, v)| k == "access_type" && v == "offline")
        );
    }

    #[test]
    #[should_panic(expected = "duplicate provider key")]
    fn test_duplicate_key_panics() {
        let github = ProviderRegistry::builtin().get("github").unwrap().clone();
        let _ = ProviderRegistry::new(vec![github.clone(), github]);
    }
}
