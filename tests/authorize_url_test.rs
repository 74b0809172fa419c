//! 授权地址构建测试
//!
//! 关注点：
//! 1. 基础参数齐全且不重复
//! 2. PKCE 参数按描述符开关输出
//! 3. 描述符固定参数可覆盖计算参数（如 response_type）
//! 4. 作用域分隔符按描述符拼接

use connect_broker::oauth::build_authorize_url;
use connect_broker::provider::{ProviderDescriptor, ProviderRegistry};
use rstest::rstest;
use std::collections::HashMap;
use url::Url;

fn query_map(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn descriptor(key: &str) -> ProviderDescriptor {
    ProviderRegistry::builtin().get(key).unwrap().clone()
}

#[test]
fn github_url_contains_required_params() {
    let url = build_authorize_url(
        &descriptor("github"),
        "client-1",
        "https://broker.example.com/oauth/callback",
        "state-abc",
        None,
        None,
    )
    .unwrap();

    assert!(url.as_str().starts_with("https://github.com/login/oauth/authorize?"));
    let q = query_map(&url);
    assert_eq!(q["client_id"], "client-1");
    assert_eq!(q["state"], "state-abc");
    assert_eq!(q["scope"], "repo");
    assert_eq!(q["response_type"], "code");
}

#[rstest]
#[case("github", false)]
#[case("google", true)]
fn pkce_params_follow_descriptor_flag(#[case] key: &str, #[case] expect_pkce: bool) {
    let url = build_authorize_url(
        &descriptor(key),
        "cid",
        "https://cb",
        "s",
        None,
        Some("challenge-value"),
    )
    .unwrap();

    let q = query_map(&url);
    assert_eq!(q.contains_key("code_challenge"), expect_pkce);
    assert_eq!(
        q.get("code_challenge_method").map(String::as_str),
        expect_pkce.then_some("S256")
    );
}

#[test]
fn descriptor_params_override_and_never_duplicate() {
    let mut d = descriptor("github");
    d.extra_authorize_params = vec![
        ("response_type".to_string(), "code token".to_string()),
        ("allow_signup".to_string(), "false".to_string()),
    ];

    let url = build_authorize_url(&d, "cid", "https://cb", "s", None, None).unwrap();
    let q = query_map(&url);
    assert_eq!(q["response_type"], "code token");
    assert_eq!(q["allow_signup"], "false");

    for name in ["response_type", "client_id", "state", "scope"] {
        let count = url.query_pairs().filter(|(k, _)| k == name).count();
        assert_eq!(count, 1, "parameter {name} must appear exactly once");
    }
}

#[test]
fn slack_scopes_join_with_comma() {
    let url = build_authorize_url(&descriptor("slack"), "cid", "https://cb", "s", None, None)
        .unwrap();
    assert_eq!(query_map(&url)["scope"], "chat:write,channels:read");
}

#[test]
fn scope_override_replaces_defaults() {
    let url = build_authorize_url(
        &descriptor("github"),
        "cid",
        "https://cb",
        "s",
        Some("repo gist workflow"),
        None,
    )
    .unwrap();
    assert_eq!(query_map(&url)["scope"], "repo gist workflow");
}
