//! # 内置提供商描述符表
//!
//! 各提供商 OAuth 方言的声明式描述；新增提供商只需要加一条数据

use super::registry::{CredentialsIn, ProviderDescriptor, TokenResponseFormat};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// 内置提供商列表
#[must_use]
pub fn descriptors() -> Vec<ProviderDescriptor> {
    vec![
        // GitHub：令牌端点返回 form 编码，令牌长期有效、无刷新端点
        ProviderDescriptor {
            key: "github".to_string(),
            display_name: "GitHub".to_string(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            refresh_url: None,
            default_scopes: strings(&["repo"]),
            scope_separator: " ".to_string(),
            token_response_format: TokenResponseFormat::Form,
            extra_authorize_params: Vec::new(),
            pkce: false,
            credentials_in: CredentialsIn::Body,
        },
        // Google：必须 access_type=offline 才会下发 refresh_token
        ProviderDescriptor {
            key: "google".to_string(),
            display_name: "Google".to_string(),
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            refresh_url: Some("https://oauth2.googleapis.com/token".to_string()),
            default_scopes: strings(&["https://www.googleapis.com/auth/userinfo.email"]),
            scope_separator: " ".to_string(),
            token_response_format: TokenResponseFormat::Json,
            extra_authorize_params: pairs(&[("access_type", "offline"), ("prompt", "consent")]),
            pkce: true,
            credentials_in: CredentialsIn::Body,
        },
        // Slack：作用域用逗号分隔
        ProviderDescriptor {
            key: "slack".to_string(),
            display_name: "Slack".to_string(),
            authorize_url: "https://slack.com/oauth/v2/authorize".to_string(),
            token_url: "https://slack.com/api/oauth.v2.access".to_string(),
            refresh_url: Some("https://slack.com/api/oauth.v2.access".to_string()),
            default_scopes: strings(&["chat:write", "channels:read"]),
            scope_separator: ",".to_string(),
            token_response_format: TokenResponseFormat::Json,
            extra_authorize_params: Vec::new(),
            pkce: false,
            credentials_in: CredentialsIn::Body,
        },
        // Notion：凭据走 Basic-Auth 头
        ProviderDescriptor {
            key: "notion".to_string(),
            display_name: "Notion".to_string(),
            authorize_url: "https://api.notion.com/v1/oauth/authorize".to_string(),
            token_url: "https://api.notion.com/v1/oauth/token".to_string(),
            refresh_url: None,
            default_scopes: Vec::new(),
            scope_separator: " ".to_string(),
            token_response_format: TokenResponseFormat::Json,
            extra_authorize_params: pairs(&[("owner", "user")]),
            pkce: false,
            credentials_in: CredentialsIn::BasicAuthHeader,
        },
    ]
}
