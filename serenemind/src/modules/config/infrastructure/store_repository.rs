// File-based Config Repository
//
// 基于 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// 文件配置仓储
///
/// 文件不存在时使用默认配置；缺失的字段同样取默认值
pub struct StoreConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: Arc<RwLock<Option<AppConfig>>>,
}

impl StoreConfigRepository {
    /// 使用目录下的 `config.json`
    ///
    /// # Arguments
    /// * `config_dir` - 配置目录
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self::with_path(config_dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// 使用指定的配置文件路径
    pub fn with_path(config_path: PathBuf) -> Self {
        Self {
            config_path,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<AppConfig>, ConfigError> {
        if !tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?
        {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        let config: AppConfig = serde_json::from_str(&content)?;

        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for StoreConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        // 从文件加载
        let config = self.load_from_file().await?.unwrap_or_default();

        // 更新缓存
        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        let mut cache = self.cache.write().await;
        *cache = Some(config.clone());

        Ok(())
    }

    async fn clear(&self) -> Result<(), ConfigError> {
        if self.exists().await? {
            tokio::fs::remove_file(&self.config_path)
                .await
                .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        }

        let mut cache = self.cache.write().await;
        *cache = None;

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_means_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = StoreConfigRepository::new(temp_dir.path());

        assert!(!repo.exists().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), AppConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.conversation.assistant_name = "Calm".to_string();

        {
            let repo = StoreConfigRepository::new(temp_dir.path());
            repo.save(&config).await.unwrap();
        }

        let repo = StoreConfigRepository::new(temp_dir.path());
        assert_eq!(repo.load().await.unwrap().conversation.assistant_name, "Calm");

        repo.clear().await.unwrap();
        assert!(!repo.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "{ nope").unwrap();

        let repo = StoreConfigRepository::new(temp_dir.path());
        assert!(matches!(
            repo.load().await,
            Err(ConfigError::SerializationError(_))
        ));
    }
}
