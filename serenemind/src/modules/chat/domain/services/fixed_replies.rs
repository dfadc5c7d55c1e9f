use super::super::entities::Message;

/// 生成失败时的兜底回复
pub const GENERATION_FALLBACK_TEXT: &str =
    "I'm here to listen. Could you tell me a little more about what's on your mind? 🤔";

/// 无法连接外部服务时的兜底回复
pub const CONNECTIVITY_FALLBACK_TEXT: &str =
    "I'm having a little trouble connecting right now. Let's try that again in a moment. 🙏";

/// 开场问候
pub fn greeting_message(user_name: Option<&str>, assistant_name: &str) -> Message {
    let salutation = match user_name {
        Some(name) => format!("Hello, {}!", name),
        None => "Hello!".to_string(),
    };
    Message::bot(format!(
        "{} I'm {}, your personal mental wellness companion. How are you doing today? ☀️",
        salutation, assistant_name
    ))
}
