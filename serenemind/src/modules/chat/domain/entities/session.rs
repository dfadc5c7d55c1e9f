use serde::{Deserialize, Serialize};

use super::{Message, MoodEntry};

/// 一轮对话的提交内容
///
/// 用户消息与回复（机器人/危机/兜底消息）总是成对提交，
/// 情绪记录仅在分类成功时存在
#[derive(Debug, Clone, PartialEq)]
pub struct TurnCommit {
    pub user_message: Message,
    pub reply: Message,
    pub mood: Option<MoodEntry>,
}

/// 会话状态 - 聚合根
///
/// 持有有序的消息历史、有序的情绪历史和显示名称。
/// 消息只追加，从不重排或删除
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    user_name: Option<String>,
    messages: Vec<Message>,
    moods: Vec<MoodEntry>,
}

impl Session {
    /// 创建空会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化记录恢复
    pub fn restore(user_name: Option<String>, messages: Vec<Message>, moods: Vec<MoodEntry>) -> Self {
        Self {
            user_name: normalize_name(user_name),
            messages,
            moods,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn moods(&self) -> &[MoodEntry] {
        &self.moods
    }

    /// 最近的 `n` 条消息（按时间顺序）
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// 设置显示名称；空白名称视为未设置
    pub fn set_user_name(&mut self, name: Option<String>) {
        self.user_name = normalize_name(name);
    }

    /// 提交一轮对话
    pub fn commit(&mut self, turn: TurnCommit) {
        self.messages.push(turn.user_message);
        self.messages.push(turn.reply);
        if let Some(mood) = turn.mood {
            self.moods.push(mood);
        }
    }

    /// 追加一条不属于任何轮次的机器人消息（开场问候）
    pub fn seed(&mut self, message: Message) {
        self.messages.push(message);
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(user: &str, reply: &str, mood: Option<MoodEntry>) -> TurnCommit {
        TurnCommit {
            user_message: Message::user(user),
            reply: Message::bot(reply),
            mood,
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.user_name().is_none());
        assert!(session.messages().is_empty());
        assert!(session.moods().is_empty());
    }

    #[test]
    fn test_commit_appends_pair_and_mood() {
        let mut session = Session::new();
        let mood = MoodEntry::record_now("joy".into(), 0.9).unwrap();

        session.commit(turn("hi", "hello!", Some(mood.clone())));
        session.commit(turn("again", "still here", None));

        assert_eq!(session.messages().len(), 4);
        assert_eq!(session.messages()[0], Message::user("hi"));
        assert_eq!(session.messages()[3], Message::bot("still here"));
        assert_eq!(session.moods(), &[mood]);
    }

    #[test]
    fn test_tail() {
        let mut session = Session::new();
        for i in 0..4 {
            session.commit(turn(&format!("u{}", i), &format!("b{}", i), None));
        }

        let tail = session.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].text(), "b2");
        assert_eq!(tail[2].text(), "b3");
        assert_eq!(session.tail(100).len(), 8);
        assert!(session.tail(0).is_empty());
    }

    #[test]
    fn test_blank_name_is_unset() {
        let mut session = Session::new();
        session.set_user_name(Some("  Asha ".to_string()));
        assert_eq!(session.user_name(), Some("Asha"));

        session.set_user_name(Some("   ".to_string()));
        assert!(session.user_name().is_none());
    }
}
