//! # OAuth 协议引擎
//!
//! 一份引擎逻辑消费所有提供商描述符：授权地址构建为确定性的
//! 字符串拼装，码交换与刷新共用一条表单 POST 路径

use crate::error::{BrokerError, Result};
use crate::provider::{CredentialsIn, ProviderDescriptor, TokenResponseFormat};

use super::token::TokenResult;
use std::time::Duration;
use url::Url;

/// 构建授权地址
///
/// 计算参数（client_id、redirect_uri、state、scope、response_type、
/// PKCE 参数）先行；描述符的固定参数最后应用且同名覆盖，
/// 描述符因此可以改写任何计算参数。
pub fn build_authorize_url(
    descriptor: &ProviderDescriptor,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    scopes_override: Option<&str>,
    code_challenge: Option<&str>,
) -> Result<Url> {
    let mut url = Url::parse(&descriptor.authorize_url)?;

    let mut params: Vec<(String, String)> = vec![
        ("client_id".to_string(), client_id.to_string()),
        ("redirect_uri".to_string(), redirect_uri.to_string()),
        ("state".to_string(), state.to_string()),
    ];

    let scope = scopes_override
        .map(std::string::ToString::to_string)
        .unwrap_or_else(|| descriptor.joined_scopes());
    if !scope.is_empty() {
        params.push(("scope".to_string(), scope));
    }

    let descriptor_defines_response_type = descriptor
        .extra_authorize_params
        .iter()
        .any(|(k, _)| k == "response_type");
    if !descriptor_defines_response_type {
        params.push(("response_type".to_string(), "code".to_string()));
    }

    if descriptor.pkce {
        if let Some(challenge) = code_challenge {
            params.push(("code_challenge".to_string(), challenge.to_string()));
            params.push(("code_challenge_method".to_string(), "S256".to_string()));
        }
    }

    // 描述符参数最后应用，同名覆盖计算参数
    for (key, value) in &descriptor.extra_authorize_params {
        params.retain(|(k, _)| k != key);
        params.push((key.clone(), value.clone()));
    }

    url.query_pairs_mut().extend_pairs(params);
    Ok(url)
}

/// 令牌端点调用类别，决定失败时的错误形态
#[derive(Debug, Clone, Copy)]
enum GrantKind {
    Exchange,
    Refresh,
}

/// OAuth 协议引擎
///
/// 除构建授权地址外的两条路径（码交换、刷新）都是对描述符
/// 令牌端点的表单 POST，响应按描述符声明的编码解析。
#[derive(Debug, Clone)]
pub struct OAuthEngine {
    http: reqwest::Client,
}

impl OAuthEngine {
    /// 创建引擎，自带超时的 HTTP 客户端
    #[must_use]
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("connect-broker/0.1")
            .build()
            .unwrap_or_default();
        Self { http }
    }

    /// 复用外部构建的 HTTP 客户端
    #[must_use]
    pub const fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// 授权码交换访问令牌
    pub async fn exchange_code(
        &self,
        descriptor: &ProviderDescriptor,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenResult> {
        let mut form: Vec<(&str, String)> = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", redirect_uri.to_string()),
        ];

        if descriptor.pkce {
            if let Some(verifier) = code_verifier {
                form.push(("code_verifier", verifier.to_string()));
            }
        }

        self.send_token_request(
            descriptor,
            &descriptor.token_url,
            form,
            client_id,
            client_secret,
            GrantKind::Exchange,
        )
        .await
    }

    /// 刷新访问令牌
    pub async fn refresh(
        &self,
        descriptor: &ProviderDescriptor,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResult> {
        if !descriptor.supports_refresh() {
            return Err(BrokerError::RefreshUnsupported {
                provider: descriptor.key.clone(),
            });
        }

        // 描述符数据不一致时退回令牌端点
        let endpoint = descriptor
            .refresh_url
            .as_deref()
            .unwrap_or(&descriptor.token_url)
            .to_string();

        let form: Vec<(&str, String)> = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
        ];

        self.send_token_request(
            descriptor,
            &endpoint,
            form,
            client_id,
            client_secret,
            GrantKind::Refresh,
        )
        .await
    }

    /// 发送令牌端点请求并按声明编码解析响应
    async fn send_token_request(
        &self,
        descriptor: &ProviderDescriptor,
        endpoint: &str,
        mut form: Vec<(&str, String)>,
        client_id: &str,
        client_secret: &str,
        kind: GrantKind,
    ) -> Result<TokenResult> {
        let mut request = self
            .http
            .post(endpoint)
            .header("Accept", "application/json");

        match descriptor.credentials_in {
            CredentialsIn::Body => {
                form.push(("client_id", client_id.to_string()));
                form.push(("client_secret", client_secret.to_string()));
            }
            CredentialsIn::BasicAuthHeader => {
                request = request.basic_auth(client_id, Some(client_secret));
            }
        }

        let response = request.form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                provider = %descriptor.key,
                status = status.as_u16(),
                "令牌端点返回非成功状态"
            );
            return Err(Self::grant_error(kind, status.as_u16(), body));
        }

        // 编码由描述符声明，绝不从响应头猜测
        let parsed = match descriptor.token_response_format {
            TokenResponseFormat::Json => TokenResult::from_json(&body)
                .map_err(|_| Self::grant_error(kind, status.as_u16(), body.clone()))?,
            TokenResponseFormat::Form => TokenResult::from_form(&body),
        };

        // 2xx 但没有 access_token（例如 form 编码的错误响应）同样按协议错误处理
        parsed.ok_or_else(|| Self::grant_error(kind, status.as_u16(), body))
    }

    const fn grant_error(kind: GrantKind, status: u16, body: String) -> BrokerError {
        match kind {
            GrantKind::Exchange => BrokerError::TokenExchange { status, body },
            GrantKind::Refresh => BrokerError::TokenRefresh { status, body },
        }
    }
}

impl Default for OAuthEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderRegistry;
    use std::collections::HashMap;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn github() -> ProviderDescriptor {
        ProviderRegistry::builtin().get("github").unwrap().clone()
    }

    fn google() -> ProviderDescriptor {
        ProviderRegistry::builtin().get("google").unwrap().clone()
    }

    #[test]
    fn test_authorize_url_basic_params() {
        let url = build_authorize_url(
            &github(),
            "cid",
            "https://broker.example.com/oauth/callback",
            "state123",
            None,
            None,
        )
        .unwrap();

        let q = query_map(&url);
        assert_eq!(q["client_id"], "cid");
        assert_eq!(q["redirect_uri"], "https://broker.example.com/oauth/callback");
        assert_eq!(q["state"], "state123");
        assert_eq!(q["scope"], "repo");
        assert_eq!(q["response_type"], "code");
    }

    #[test]
    fn test_authorize_url_scope_override() {
        let url =
            build_authorize_url(&github(), "cid", "https://cb", "s", Some("repo gist"), None)
                .unwrap();
        assert_eq!(query_map(&url)["scope"], "repo gist");
    }

    #[test]
    fn test_authorize_url_omits_empty_scope() {
        let mut descriptor = github();
        descriptor.default_scopes.clear();
        let url = build_authorize_url(&descriptor, "cid", "https://cb", "s", None, None).unwrap();
        assert!(!query_map(&url).contains_key("scope"));
    }

    #[test]
    fn test_pkce_params_present_iff_required_and_supplied() {
        let url =
            build_authorize_url(&google(), "cid", "https://cb", "s", None, Some("challenge1"))
                .unwrap();
        let q = query_map(&url);
        assert_eq!(q["code_challenge"], "challenge1");
        assert_eq!(q["code_challenge_method"], "S256");

        // pkce=false 时即使给了 challenge 也不输出
        let url =
            build_authorize_url(&github(), "cid", "https://cb", "s", None, Some("challenge1"))
                .unwrap();
        let q = query_map(&url);
        assert!(!q.contains_key("code_challenge"));
        assert!(!q.contains_key("code_challenge_method"));

        // pkce=true 但未提供 challenge 时同样不输出
        let url = build_authorize_url(&google(), "cid", "https://cb", "s", None, None).unwrap();
        assert!(!query_map(&url).contains_key("code_challenge"));
    }

    #[test]
    fn test_descriptor_extra_params_win_over_computed() {
        let mut descriptor = github();
        descriptor.extra_authorize_params = vec![
            ("response_type".to_string(), "code id_token".to_string()),
            ("audience".to_string(), "api://broker".to_string()),
        ];

        let url = build_authorize_url(&descriptor, "cid", "https://cb", "s", None, None).unwrap();
        let q = query_map(&url);
        assert_eq!(q["response_type"], "code id_token");
        assert_eq!(q["audience"], "api://broker");

        // 不应出现重复的 response_type
        let count = url
            .query_pairs()
            .filter(|(k, _)| k == "response_type")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_google_extra_params_applied() {
        let url = build_authorize_url(&google(), "cid", "https://cb", "s", None, None).unwrap();
        let q = query_map(&url);
        assert_eq!(q["access_type"], "offline");
        assert_eq!(q["prompt"], "consent");
    }

    #[tokio::test]
    async fn test_refresh_unsupported_without_endpoint() {
        let engine = OAuthEngine::new();
        let err = engine
            .refresh(&github(), "cid", "secret", "ref")
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::RefreshUnsupported { .. }));
    }
}
