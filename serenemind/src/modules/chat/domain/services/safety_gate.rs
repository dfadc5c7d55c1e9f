use super::super::entities::{HelplineEntry, Message};

/// 默认危机短语
pub const DEFAULT_DISTRESS_PHRASES: &[&str] = &[
    "kill myself",
    "suicide",
    "end my life",
    "can't go on",
    "no reason to live",
    "want to die",
    "hurt myself",
];

/// 危机提示文本（后接热线列表）
pub const DISTRESS_RESPONSE_TEXT: &str = "It sounds like you are in severe distress. Please know that there is help available and you are not alone. It's important to talk to someone who can support you right now. Please reach out to one of these 24/7 helplines:";

/// 默认求助热线
pub fn default_helplines() -> Vec<HelplineEntry> {
    vec![
        HelplineEntry::new("Vandrevala Foundation", "9999666555", "24/7 helpline in India"),
        HelplineEntry::new("iCALL", "9152987821", "Mon-Sat, 10 AM-8 PM"),
        HelplineEntry::new("AASRA", "9820466726", "24/7 helpline"),
    ]
}

/// 安全检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    /// 命中危机短语
    Hit { phrase: String },
    /// 未命中
    Clear,
}

impl SafetyVerdict {
    pub fn is_hit(&self) -> bool {
        matches!(self, SafetyVerdict::Hit { .. })
    }
}

/// 安全闸门
///
/// 领域服务：大小写不敏感的子串匹配。不分词、不做否定判断，
/// 引用或否定句中出现的短语同样命中
#[derive(Debug, Clone)]
pub struct SafetyGate {
    phrases: Vec<String>,
    helplines: Vec<HelplineEntry>,
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new(
            DEFAULT_DISTRESS_PHRASES.iter().map(|p| p.to_string()),
            default_helplines(),
        )
    }
}

impl SafetyGate {
    /// 空短语会匹配任意文本，构造时丢弃
    pub fn new(phrases: impl IntoIterator<Item = String>, helplines: Vec<HelplineEntry>) -> Self {
        let phrases = phrases
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Self { phrases, helplines }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn helplines(&self) -> &[HelplineEntry] {
        &self.helplines
    }

    /// 检查文本
    pub fn evaluate(&self, text: &str) -> SafetyVerdict {
        let folded = text.to_lowercase();
        match self.phrases.iter().find(|p| folded.contains(p.as_str())) {
            Some(phrase) => SafetyVerdict::Hit {
                phrase: phrase.clone(),
            },
            None => SafetyVerdict::Clear,
        }
    }

    /// 构建危机提示消息
    pub fn distress_message(&self) -> Message {
        Message::distress(DISTRESS_RESPONSE_TEXT, self.helplines.clone())
    }
}
