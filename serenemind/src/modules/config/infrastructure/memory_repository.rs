// In-Memory Config Repository
//
// 在内存中保存配置 JSON 文档（用于测试和开发），读写与文件仓储走同一套序列化

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 内存配置仓储
#[derive(Default)]
pub struct InMemoryConfigRepository {
    document: RwLock<Option<String>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以原始 JSON 文档初始化，缺失字段在加载时取默认值
    pub fn with_json(document: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(document.into())),
        }
    }

    pub fn with_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_json(serde_json::to_string(config)?))
    }

    /// 当前保存的文档
    pub async fn document(&self) -> Option<String> {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match self.document.read().await.as_deref() {
            Some(document) => Ok(serde_json::from_str(document)?),
            None => Ok(AppConfig::default()),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let document = serde_json::to_string_pretty(config)?;
        *self.document.write().await = Some(document);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConfigError> {
        self.document.write().await.take();
        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(self.document.read().await.is_some())
    }
}
