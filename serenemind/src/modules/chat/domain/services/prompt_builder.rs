use std::fmt;

use super::super::entities::Message;
use super::super::value_objects::EmotionLabel;

/// 默认上下文窗口（包含当前用户消息）
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;
/// 未设置名称时的用户称呼
pub const USER_PLACEHOLDER: &str = "User";
/// 机器人消息在上下文中的称呼
pub const ASSISTANT_SPEAKER: &str = "AI";
pub const DEFAULT_ASSISTANT_NAME: &str = "SereneMind AI";

/// 组装好的生成请求文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 提示词构建器
///
/// 领域服务：把最近的对话窗口、检测到的情绪和指导内容拼成一段指令。
/// 纯文本拼装，无外部调用
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    /// 窗口内最多的消息数（含当前用户消息）
    max_messages: usize,
    assistant_name: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            max_messages: DEFAULT_CONTEXT_WINDOW,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }

    /// 窗口至少保留当前消息
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(1);
        self
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// 滑动窗口：历史的最后 N-1 条加上当前消息，按时间顺序，不补齐
    pub fn window<'a>(&self, history: &'a [Message], current: &'a Message) -> Vec<&'a Message> {
        let keep = self.max_messages - 1;
        let start = history.len().saturating_sub(keep);

        history[start..]
            .iter()
            .chain(std::iter::once(current))
            .collect()
    }

    /// 渲染为 `"<speaker>: <text>"` 行
    pub fn render_window(&self, window: &[&Message], user_name: Option<&str>) -> String {
        let user_speaker = user_name.unwrap_or(USER_PLACEHOLDER);
        window
            .iter()
            .map(|msg| {
                let speaker = if msg.is_user() {
                    user_speaker
                } else {
                    ASSISTANT_SPEAKER
                };
                format!("{}: {}", speaker, msg.text())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 构建生成请求
    ///
    /// `history` 为当前消息之前的会话消息
    pub fn build(
        &self,
        history: &[Message],
        current: &Message,
        emotion: &EmotionLabel,
        guidance: &[&str],
        user_name: Option<&str>,
    ) -> Prompt {
        let window = self.window(history, current);
        let conversation = self.render_window(&window, user_name);
        let knowledge = guidance.join(" ");

        Prompt(format!(
            "You are {assistant}, a friendly, empathetic, and intelligent mental health chatbot. \
The user's name is {name}. Here is the recent conversation history:\n{conversation}\n\n\
The user's latest message is: \"{latest}\". Their primary emotion seems to be '{emotion}'.\n\n\
Based on the conversation history and the user's last message, provide a supportive, caring, and directly relevant response. \
If you know the user's name, use it to make the conversation more personal. Acknowledge what the user said. \
Do NOT repeat previous answers. You can reference these self-care ideas if they are relevant: \"{knowledge}\".\n\n\
Important Rules:\n\
- Do NOT give clinical diagnoses or act as a therapist.\n\
- Keep your response concise, empathetic, and helpful.\n\
- Use emojis to make the tone more friendly.",
            assistant = self.assistant_name,
            name = user_name.unwrap_or("not set"),
            conversation = conversation,
            latest = current.text(),
            emotion = emotion,
            knowledge = knowledge,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("u{}", i))
                } else {
                    Message::bot(format!("b{}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_window_is_bounded_and_ends_with_current() {
        let builder = PromptBuilder::new();
        let history = history(20);
        let current = Message::user("now");

        let window = builder.window(&history, &current);
        assert_eq!(window.len(), 5);
        assert_eq!(window[4].text(), "now");
        let texts: Vec<&str> = window.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["u16", "b17", "u18", "b19", "now"]);
    }

    #[test]
    fn test_short_history_is_not_padded() {
        let builder = PromptBuilder::new();
        let history = history(1);
        let current = Message::user("second");

        let window = builder.window(&history, &current);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].text(), "u0");

        let empty: Vec<Message> = Vec::new();
        assert_eq!(builder.window(&empty, &current).len(), 1);
    }

    #[test]
    fn test_render_uses_name_or_placeholder() {
        let builder = PromptBuilder::new();
        let history = vec![Message::user("hi"), Message::bot("hello")];
        let current = Message::user("how are you");
        let window = builder.window(&history, &current);

        assert_eq!(
            builder.render_window(&window, None),
            "User: hi\nAI: hello\nUser: how are you"
        );
        assert_eq!(
            builder.render_window(&window, Some("Asha")),
            "Asha: hi\nAI: hello\nAsha: how are you"
        );
    }

    #[test]
    fn test_build_embeds_all_parts() {
        let builder = PromptBuilder::new();
        let current = Message::user("I feel low");
        let prompt = builder.build(
            &[],
            &current,
            &EmotionLabel::new("sadness"),
            &["Breathe.", "Journal."],
            Some("Ravi"),
        );
        let text = prompt.as_str();

        assert!(text.starts_with("You are SereneMind AI"));
        assert!(text.contains("The user's name is Ravi."));
        assert!(text.contains("Ravi: I feel low"));
        assert!(text.contains("The user's latest message is: \"I feel low\"."));
        assert!(text.contains("'sadness'"));
        assert!(text.contains("\"Breathe. Journal.\""));
        assert!(text.contains("Do NOT give clinical diagnoses"));
    }

    #[test]
    fn test_build_without_name() {
        let prompt = PromptBuilder::new().with_assistant_name("Calm").build(
            &[],
            &Message::user("hey"),
            &EmotionLabel::neutral(),
            &[],
            None,
        );
        assert!(prompt.as_str().starts_with("You are Calm,"));
        assert!(prompt.as_str().contains("The user's name is not set."));
        assert!(prompt.as_str().contains("User: hey"));
    }

    #[test]
    fn test_window_size_is_at_least_one() {
        let builder = PromptBuilder::new().with_max_messages(0);
        let history = history(3);
        let current = Message::user("only");
        let window = builder.window(&history, &current);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].text(), "only");
    }
}
