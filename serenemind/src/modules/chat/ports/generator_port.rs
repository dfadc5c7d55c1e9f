use async_trait::async_trait;
use thiserror::Error;

use super::super::domain::Prompt;

/// 回复生成错误类型
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator unreachable: {0}")]
    Unreachable(String),

    #[error("Generator timed out after {0}s")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Generator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed generator response: {0}")]
    Malformed(String),

    #[error("Generator returned no candidates")]
    NoCandidates,
}

/// 生成的回复文本（原样使用，不做后处理）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText(pub String);

impl GeneratedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 回复生成端口
#[async_trait]
pub trait ResponseGeneratorPort: Send + Sync {
    /// 提供商标识（用于日志）
    fn provider_id(&self) -> &str;

    /// 根据提示词生成回复
    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedText, GenerationError>;
}
