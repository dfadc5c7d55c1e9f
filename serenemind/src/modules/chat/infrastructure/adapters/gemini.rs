// Gemini generateContent 回复生成适配器

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::modules::chat::domain::Prompt;
use crate::modules::chat::ports::{GeneratedText, GenerationError, ResponseGeneratorPort};

pub const DEFAULT_GENERATOR_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATOR_MODEL: &str = "gemini-2.5-flash-preview-05-20";
/// 密钥放在请求头中，不出现在 URL 里
const API_KEY_HEADER: &str = "x-goog-api-key";

/// 生成适配器配置
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATOR_BASE_URL.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}

/// Gemini API 请求格式
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GenerateContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Gemini API 响应格式
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini 回复生成适配器
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// 取第一个候选的第一段文本
    fn parse_response(body: &str) -> Result<GeneratedText, GenerationError> {
        let parsed: GenerateResponse =
            serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::NoCandidates)?;

        candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(GeneratedText)
            .ok_or_else(|| GenerationError::Malformed("candidate has no text part".to_string()))
    }

    /// 错误文本不带 URL
    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        let e = e.without_url();
        if e.is_timeout() {
            GenerationError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            GenerationError::Unreachable(e.to_string())
        } else {
            GenerationError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ResponseGeneratorPort for GeminiGenerator {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedText, GenerationError> {
        debug!("[Gemini] Sending generateContent request: {}", self.config.model);

        let body = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![RequestPart {
                    text: prompt.as_str(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.api_url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!("[Gemini] API error: {} - {}", status, text);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Self::parse_response(&text)
    }
}
