//! # 凭据保险库
//!
//! 对落库的机密字符串做 AES-256-GCM 认证加密
//! 密文线格式：base64( nonce(12字节) || authTag(16字节) || ciphertext )
//!
//! 保险库对内容不做任何假设，访问令牌、刷新令牌与原始响应
//! 各自独立调用一次加密。

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose};

/// GCM 随机数长度
const NONCE_LEN: usize = 12;
/// GCM 认证标签长度
const TAG_LEN: usize = 16;
/// 合法密文载荷的最小长度（nonce + tag，密文体可为空）
const MIN_PAYLOAD_LEN: usize = NONCE_LEN + TAG_LEN;

/// 凭据保险库
///
/// 密钥为进程级配置，启动时提供一次；错误的密钥长度在构造时
/// 即失败，而不是等到首次读写时返回乱码。
#[derive(Clone)]
pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl CredentialVault {
    /// 用 32 字节对称密钥创建保险库
    #[must_use]
    pub fn new(key: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(key.into());
        Self { cipher }
    }

    /// 从 64 位十六进制字符串创建保险库
    pub fn from_hex(key_hex: &str) -> crate::error::Result<Self> {
        if key_hex.len() != 64 {
            return Err(crate::error::BrokerError::config(
                "保险库密钥必须是64个字符的十六进制字符串（32字节）",
            ));
        }

        let key_bytes = hex::decode(key_hex)
            .map_err(|e| crate::error::BrokerError::config_with_source("保险库密钥格式错误", e))?;

        let key: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| crate::error::BrokerError::config("保险库密钥必须是32字节"))?;

        Ok(Self::new(&key))
    }

    /// 加密字符串
    ///
    /// 每次调用都从 CSPRNG 生成新的 12 字节 nonce；同一密钥下
    /// nonce 复用会破坏 GCM 的保密性与完整性。
    pub fn encrypt(&self, plaintext: &str) -> crate::error::Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // aes-gcm 输出为 ciphertext || tag，线格式要求 tag 前置
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| {
                crate::error::BrokerError::internal(format!("AES-GCM encryption failed: {e}"))
            })?;
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(tag);
        payload.extend_from_slice(ciphertext);

        Ok(general_purpose::STANDARD.encode(payload))
    }

    /// 解密字符串
    ///
    /// 载荷格式非法或认证标签不匹配时返回解密错误，绝不返回
    /// 未经认证的明文。
    pub fn decrypt(&self, payload: &str) -> crate::error::Result<String> {
        let raw = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| crate::error::BrokerError::decryption(format!("密文不是合法base64: {e}")))?;

        if raw.len() < MIN_PAYLOAD_LEN {
            return Err(crate::error::BrokerError::decryption(format!(
                "密文载荷过短: {}字节，至少{}字节",
                raw.len(),
                MIN_PAYLOAD_LEN
            )));
        }

        let nonce = Nonce::from_slice(&raw[..NONCE_LEN]);
        let tag = &raw[NONCE_LEN..MIN_PAYLOAD_LEN];
        let ciphertext = &raw[MIN_PAYLOAD_LEN..];

        // 还原 aes-gcm 期望的 ciphertext || tag 排布
        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let plaintext = self
            .cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|_| crate::error::BrokerError::decryption("认证标签校验失败"))?;

        String::from_utf8(plaintext)
            .map_err(|e| crate::error::BrokerError::decryption(format!("明文不是有效UTF-8: {e}")))
    }
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 不暴露密钥材料
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose};

    fn test_vault() -> CredentialVault {
        CredentialVault::new(&[7u8; 32])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let vault = test_vault();
        let plaintext = "gho_abc123_access_token";
        let payload = vault.encrypt(plaintext).unwrap();
        assert_eq!(vault.decrypt(&payload).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_string_roundtrip() {
        let vault = test_vault();
        let payload = vault.encrypt("").unwrap();
        assert_eq!(vault.decrypt(&payload).unwrap(), "");
    }

    #[test]
    fn test_unicode_roundtrip() {
        let vault = test_vault();
        let plaintext = "令牌🔐 with spaces & symbols ~!@#";
        let payload = vault.encrypt(plaintext).unwrap();
        assert_eq!(vault.decrypt(&payload).unwrap(), plaintext);
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let vault = test_vault();
        let a = vault.encrypt("same input").unwrap();
        let b = vault.encrypt("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_byte_corruption_fails() {
        let vault = test_vault();
        let payload = vault.encrypt("secret").unwrap();
        let mut raw = general_purpose::STANDARD.decode(&payload).unwrap();

        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let tampered = general_purpose::STANDARD.encode(&raw);
            let err = vault.decrypt(&tampered).unwrap_err();
            assert!(
                matches!(err, crate::error::BrokerError::Decryption { .. }),
                "byte {i} corruption must fail decryption"
            );
            raw[i] ^= 0x01;
        }
    }

    #[test]
    fn test_short_payload_rejected_before_unpack() {
        let vault = test_vault();
        let short = general_purpose::STANDARD.encode([0u8; 27]);
        let err = vault.decrypt(&short).unwrap_err();
        assert!(matches!(err, crate::error::BrokerError::Decryption { .. }));
    }

    #[test]
    fn test_malformed_base64_rejected() {
        let vault = test_vault();
        assert!(vault.decrypt("not base64 !!!").is_err());
    }

    #[test]
    fn test_from_hex_validates_key() {
        assert!(CredentialVault::from_hex(&"ab".repeat(32)).is_ok());
        assert!(CredentialVault::from_hex("abcd").is_err());
        assert!(CredentialVault::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_wrong_key_fails_decryption() {
        let payload = test_vault().encrypt("secret").unwrap();
        let other = CredentialVault::new(&[8u8; 32]);
        assert!(other.decrypt(&payload).is_err());
    }
}
