use serde::{Deserialize, Serialize};

/// 消息发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// 用户消息
    User,
    /// 陪伴机器人消息（包括危机提示）
    Bot,
}

/// 求助热线条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelplineEntry {
    pub name: String,
    pub phone: String,
    pub info: String,
}

impl HelplineEntry {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        info: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            info: info.into(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// 消息实体
///
/// 追加后不可变；会话中的顺序即插入顺序。
/// 序列化格式与历史记录兼容：`isDistress` 与 `helplines` 仅在危机消息上出现
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    text: String,
    sender: Sender,
    #[serde(default, skip_serializing_if = "is_false")]
    is_distress: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    helplines: Vec<HelplineEntry>,
}

impl Message {
    /// 创建用户消息
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            is_distress: false,
            helplines: Vec::new(),
        }
    }

    /// 创建普通机器人消息
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_distress: false,
            helplines: Vec::new(),
        }
    }

    /// 创建危机提示消息（附带热线列表）
    pub fn distress(text: impl Into<String>, helplines: Vec<HelplineEntry>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_distress: true,
            helplines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_distress(&self) -> bool {
        self.is_distress
    }

    pub fn helplines(&self) -> &[HelplineEntry] {
        &self.helplines
    }
}
