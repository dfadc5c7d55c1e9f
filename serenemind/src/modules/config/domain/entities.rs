// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::value_objects::Secret;
use crate::modules::chat::domain::{default_helplines, HelplineEntry, DEFAULT_DISTRESS_PHRASES};
use crate::modules::chat::infrastructure::adapters::{
    DEFAULT_CLASSIFIER_URL, DEFAULT_GENERATOR_BASE_URL, DEFAULT_GENERATOR_MODEL,
};

/// 上下文窗口上限
pub const MAX_CONTEXT_WINDOW: usize = 50;

/// 情绪分类服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    pub url: String,
    pub api_token: Secret,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLASSIFIER_URL.to_string(),
            api_token: Secret::default(),
            timeout_secs: 30,
        }
    }
}

/// 回复生成服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Secret,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATOR_BASE_URL.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: Secret::default(),
            timeout_secs: 60,
        }
    }
}

/// 安全闸门配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyConfig {
    pub distress_phrases: Vec<String>,
    pub helplines: Vec<HelplineEntry>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            distress_phrases: DEFAULT_DISTRESS_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            helplines: default_helplines(),
        }
    }
}

/// 对话配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationConfig {
    pub context_window: usize,
    pub assistant_name: String,
    pub greeting: bool,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            context_window: 5,
            assistant_name: "SereneMind AI".to_string(),
            greeting: true,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// 应用配置聚合根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub generator: GeneratorConfig,
    pub safety: SafetyConfig,
    pub conversation: ConversationConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// 创建新的默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 验证配置是否有效，返回全部问题
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.classifier.url.trim().is_empty() {
            errors.push("Classifier url must not be empty".to_string());
        }
        if self.classifier.timeout_secs == 0 {
            errors.push("Classifier timeout must be at least 1 second".to_string());
        }

        if self.generator.base_url.trim().is_empty() {
            errors.push("Generator base url must not be empty".to_string());
        }
        if self.generator.model.trim().is_empty() {
            errors.push("Generator model must not be empty".to_string());
        }
        if self.generator.timeout_secs == 0 {
            errors.push("Generator timeout must be at least 1 second".to_string());
        }

        if self.safety.distress_phrases.iter().all(|p| p.trim().is_empty()) {
            errors.push("At least one distress phrase is required".to_string());
        }
        if self.safety.helplines.len() != 3 {
            errors.push(format!(
                "Exactly three helplines are required, got {}",
                self.safety.helplines.len()
            ));
        }

        if self.conversation.context_window == 0
            || self.conversation.context_window > MAX_CONTEXT_WINDOW
        {
            errors.push(format!(
                "Context window must be between 1 and {}",
                MAX_CONTEXT_WINDOW
            ));
        }
        if self.conversation.assistant_name.trim().is_empty() {
            errors.push("Assistant name must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
