use std::time::Duration;

use crate::modules::chat::domain::{ContentSelector, PromptBuilder, SafetyGate};
use crate::modules::config::AppConfig;

/// 对话编排设置
///
/// 由配置构建，进程内只读共享
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub safety_gate: SafetyGate,
    pub content_selector: ContentSelector,
    pub prompt_builder: PromptBuilder,
    pub assistant_name: String,
    /// 新会话（无历史）是否写入开场问候
    pub greeting: bool,
    pub classifier_timeout: Duration,
    pub generator_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        let prompt_builder = PromptBuilder::new();
        Self {
            safety_gate: SafetyGate::default(),
            content_selector: ContentSelector::new(),
            assistant_name: prompt_builder.assistant_name().to_string(),
            prompt_builder,
            greeting: true,
            classifier_timeout: Duration::from_secs(30),
            generator_timeout: Duration::from_secs(60),
        }
    }
}

impl ChatSettings {
    pub fn with_greeting(mut self, greeting: bool) -> Self {
        self.greeting = greeting;
        self
    }

    pub fn with_timeouts(mut self, classifier: Duration, generator: Duration) -> Self {
        self.classifier_timeout = classifier;
        self.generator_timeout = generator;
        self
    }
}

impl From<&AppConfig> for ChatSettings {
    fn from(config: &AppConfig) -> Self {
        let assistant_name = config.conversation.assistant_name.clone();
        Self {
            safety_gate: SafetyGate::new(
                config.safety.distress_phrases.iter().cloned(),
                config.safety.helplines.clone(),
            ),
            content_selector: ContentSelector::new(),
            prompt_builder: PromptBuilder::new()
                .with_max_messages(config.conversation.context_window)
                .with_assistant_name(assistant_name.clone()),
            assistant_name,
            greeting: config.conversation.greeting,
            classifier_timeout: Duration::from_secs(config.classifier.timeout_secs),
            generator_timeout: Duration::from_secs(config.generator.timeout_secs),
        }
    }
}
