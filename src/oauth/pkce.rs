//! # PKCE 与随机值生成
//!
//! 实现 RFC 7636 的 Code Verifier / Code Challenge 机制，
//! 以及 CSRF state 与会话句柄的随机生成
//!
//! ## 核心原理
//! 1. 生成随机 Code Verifier（43-128 个字符）
//! 2. 通过 SHA256 哈希生成 Code Challenge
//! 3. 授权请求时发送 Code Challenge
//! 4. 令牌交换时发送 Code Verifier 进行验证

use base64::engine::{Engine, general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Code Verifier 固定长度（RFC 7636 允许 43-128）
const CODE_VERIFIER_LENGTH: usize = 64;

/// Verifier 合法字符集：URL 安全 base64 字母表限定为 [A-Za-z0-9._~-]
const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// CSRF state 的随机字节数（48 位十六进制）
const STATE_BYTES: usize = 24;
/// 会话句柄的随机字节数（64 位十六进制）
const SESSION_TOKEN_BYTES: usize = 32;

/// 生成随机 Code Verifier
///
/// 所有随机值都来自操作系统 CSPRNG，verifier 不可预测是
/// PKCE 防授权码截获的前提。
#[must_use]
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; CODE_VERIFIER_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| VERIFIER_CHARSET[*b as usize % VERIFIER_CHARSET.len()] as char)
        .collect()
}

/// 从 Code Verifier 计算 S256 Code Challenge
///
/// 返回 verifier SHA-256 摘要的 base64url 编码（无填充）
#[must_use]
pub fn challenge_from_verifier(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// 生成 CSRF state：24 随机字节 → 48 位十六进制
#[must_use]
pub fn generate_state() -> String {
    random_hex(STATE_BYTES)
}

/// 生成调用方持有的会话句柄：32 随机字节 → 64 位十六进制
#[must_use]
pub fn generate_session_token() -> String {
    random_hex(SESSION_TOKEN_BYTES)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
