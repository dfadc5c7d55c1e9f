// Chat Domain Layer
// 领域层包含业务实体、值对象、领域服务和领域事件

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{
    HelplineEntry, InvalidMoodScore, Message, MoodEntry, MoodSummary, Sender, Session, TurnCommit,
};
pub use events::*;
pub use services::{
    default_helplines, greeting_message, guidance_bucket, ContentSelector, Prompt, PromptBuilder,
    SafetyGate, SafetyVerdict, CONNECTIVITY_FALLBACK_TEXT, DEFAULT_DISTRESS_PHRASES,
    DISTRESS_RESPONSE_TEXT, GENERATION_FALLBACK_TEXT,
};
pub use value_objects::{EmotionLabel, GuidanceKey, SessionId, TurnOutcome};
