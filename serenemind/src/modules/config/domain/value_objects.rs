// Config Value Objects
//
// 配置相关的值对象定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 密钥类型
///
/// Debug 输出时隐藏内容，避免密钥进入日志
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::new("AIza-very-secret");
        assert_eq!(format!("{:?}", secret), "Secret(***)");
        assert_eq!(secret.expose(), "AIza-very-secret");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Secret::new("k")).unwrap();
        assert_eq!(json, "\"k\"");
        assert!(Secret::default().is_empty());
    }
}
