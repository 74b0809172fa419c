//! # 令牌响应结构
//!
//! 提供商令牌端点的归一化结果；编码差异在解析层消化

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 归一化后的令牌结果
///
/// `expires_in` 为相对秒数，调用方在收到时换算成绝对时间；
/// `raw` 保留完整原始字段，供提供商特有字段落库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResult {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub raw: Map<String, Value>,
}

impl TokenResult {
    /// 从 JSON 响应体解析
    pub fn from_json(body: &str) -> Result<Option<Self>, serde_json::Error> {
        let raw: Map<String, Value> = serde_json::from_str(body)?;
        Ok(Self::from_raw(raw))
    }

    /// 从 application/x-www-form-urlencoded 响应体解析（如 GitHub）
    #[must_use]
    pub fn from_form(body: &str) -> Option<Self> {
        let raw: Map<String, Value> = url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        Self::from_raw(raw)
    }

    /// 2xx 响应缺少 access_token 视为协议错误，返回 None 由调用方报错
    fn from_raw(raw: Map<String, Value>) -> Option<Self> {
        let access_token = non_empty_string(raw.get("access_token"))?;
        Some(Self {
            access_token,
            refresh_token: non_empty_string(raw.get("refresh_token")),
            expires_in: integer_field(raw.get("expires_in")),
            scope: non_empty_string(raw.get("scope")),
            raw,
        })
    }

    /// 原始响应序列化为 JSON 串（落库前整体加密）
    pub fn raw_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.raw)
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// form 编码里数字以字符串出现，两种形态都接受
fn integer_field(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}
