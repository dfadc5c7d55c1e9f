// Hugging Face 推理接口情绪分类适配器
//
// 请求体为 {"inputs": text}，响应为候选列表（可能被嵌套一层）

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::modules::chat::ports::{
    ClassificationError, ClassificationResult, EmotionCandidate, EmotionClassifierPort,
};

pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base";

/// 分类适配器配置
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLASSIFIER_URL.to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<EmotionCandidate>>),
    Flat(Vec<EmotionCandidate>),
}

/// Hugging Face 情绪分类适配器
pub struct HuggingFaceClassifier {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceClassifier {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ClassificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassificationError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 解析响应体为候选列表
    fn parse_response(body: &str) -> Result<Vec<EmotionCandidate>, ClassificationError> {
        let parsed: InferenceResponse = serde_json::from_str(body)
            .map_err(|e| ClassificationError::Malformed(e.to_string()))?;

        Ok(match parsed {
            InferenceResponse::Nested(lists) => lists.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(list) => list,
        })
    }

    /// 错误文本不带 URL
    fn map_send_error(&self, e: reqwest::Error) -> ClassificationError {
        let e = e.without_url();
        if e.is_timeout() {
            ClassificationError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            ClassificationError::Unreachable(e.to_string())
        } else {
            ClassificationError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl EmotionClassifierPort for HuggingFaceClassifier {
    fn provider_id(&self) -> &str {
        "huggingface"
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationError> {
        debug!("[HuggingFace] Sending classification request ({} chars)", text.chars().count());

        let mut request = self
            .client
            .post(&self.config.url)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!("[HuggingFace] API error: {} - {}", status, body);
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let candidates = Self::parse_response(&body)?;
        ClassificationResult::from_candidates(candidates)
    }
}
