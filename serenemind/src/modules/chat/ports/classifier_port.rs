use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::super::domain::EmotionLabel;

/// 情绪分类错误类型
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// 无法建立连接（触发连接兜底）
    #[error("Classifier unreachable: {0}")]
    Unreachable(String),

    #[error("Classifier timed out after {0}s")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed classifier response: {0}")]
    Malformed(String),

    #[error("Classifier returned no candidates")]
    EmptyCandidates,
}

impl ClassificationError {
    /// 是否为连接失败（服务完全不可达）
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClassificationError::Unreachable(_))
    }
}

/// 分类服务返回的单个候选
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionCandidate {
    pub label: String,
    pub score: f64,
}

impl EmotionCandidate {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// 分类结果：得分最高的候选
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub emotion: EmotionLabel,
    pub score: f64,
}

impl ClassificationResult {
    /// 从候选列表中选出得分最高者
    ///
    /// 并列时保留最先出现的候选
    pub fn from_candidates(
        candidates: impl IntoIterator<Item = EmotionCandidate>,
    ) -> Result<Self, ClassificationError> {
        let mut best: Option<EmotionCandidate> = None;

        for candidate in candidates {
            if !candidate.score.is_finite() || !(0.0..=1.0).contains(&candidate.score) {
                return Err(ClassificationError::Malformed(format!(
                    "score {} for label '{}' is outside [0, 1]",
                    candidate.score, candidate.label
                )));
            }
            if candidate.label.trim().is_empty() {
                return Err(ClassificationError::Malformed("empty label".to_string()));
            }

            let replace = match &best {
                Some(current) => candidate.score > current.score,
                None => true,
            };
            if replace {
                best = Some(candidate);
            }
        }

        let best = best.ok_or(ClassificationError::EmptyCandidates)?;
        Ok(Self {
            emotion: EmotionLabel::new(best.label),
            score: best.score,
        })
    }
}

/// 情绪分类端口
#[async_trait]
pub trait EmotionClassifierPort: Send + Sync {
    /// 提供商标识（用于日志）
    fn provider_id(&self) -> &str;

    /// 对文本进行情绪分类
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationError>;
}
