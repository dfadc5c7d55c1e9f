use serde::{Deserialize, Serialize};
use std::fmt;

/// 情感标签
///
/// 值对象：分类服务返回的原始标签（如 "sadness"、"joy"、"fear"），
/// 词表由外部服务决定，这里不做枚举收敛
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionLabel(String);

impl EmotionLabel {
    /// 分类失败时使用的隐式标签
    pub const NEUTRAL: &'static str = "neutral";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    pub fn neutral() -> Self {
        Self(Self::NEUTRAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == Self::NEUTRAL
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EmotionLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// 指导内容分桶键
///
/// 固定的键集合，`Default` 兜底所有未识别的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidanceKey {
    Sadness,
    Anxiety,
    Anger,
    Joy,
    Default,
}

impl GuidanceKey {
    pub fn all() -> &'static [GuidanceKey] {
        &[
            GuidanceKey::Sadness,
            GuidanceKey::Anxiety,
            GuidanceKey::Anger,
            GuidanceKey::Joy,
            GuidanceKey::Default,
        ]
    }

    /// 标签到分桶键的映射（大小写敏感，精确匹配）
    pub fn from_label(label: &str) -> Self {
        match label {
            "sadness" => GuidanceKey::Sadness,
            "anxiety" => GuidanceKey::Anxiety,
            "anger" => GuidanceKey::Anger,
            "joy" => GuidanceKey::Joy,
            _ => GuidanceKey::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GuidanceKey::Sadness => "sadness",
            GuidanceKey::Anxiety => "anxiety",
            GuidanceKey::Anger => "anger",
            GuidanceKey::Joy => "joy",
            GuidanceKey::Default => "default",
        }
    }
}

impl From<&EmotionLabel> for GuidanceKey {
    fn from(label: &EmotionLabel) -> Self {
        GuidanceKey::from_label(label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_trimmed() {
        assert_eq!(EmotionLabel::new("  joy \n").as_str(), "joy");
    }

    #[test]
    fn test_neutral_label() {
        assert!(EmotionLabel::neutral().is_neutral());
        assert!(!EmotionLabel::new("anger").is_neutral());
    }

    #[test]
    fn test_guidance_key_mapping() {
        assert_eq!(GuidanceKey::from_label("sadness"), GuidanceKey::Sadness);
        assert_eq!(GuidanceKey::from_label("joy"), GuidanceKey::Joy);
        assert_eq!(GuidanceKey::from_label("neutral"), GuidanceKey::Default);
        assert_eq!(GuidanceKey::from_label("fear"), GuidanceKey::Default);
        // 只接受小写的规范键
        assert_eq!(GuidanceKey::from_label("Sadness"), GuidanceKey::Default);
    }

    #[test]
    fn test_guidance_key_round_trip_through_str() {
        for key in GuidanceKey::all() {
            if *key != GuidanceKey::Default {
                assert_eq!(GuidanceKey::from_label(key.as_str()), *key);
            }
        }
    }
}
