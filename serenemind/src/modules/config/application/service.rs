// Config Service
//
// 配置服务门面：加载、环境变量覆盖、校验

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::modules::config::domain::{AppConfig, Secret};
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const ENV_GENERATOR_API_KEY: &str = "SERENEMIND_GENERATOR_API_KEY";
pub const ENV_CLASSIFIER_TOKEN: &str = "SERENEMIND_CLASSIFIER_TOKEN";
pub const ENV_DATA_DIR: &str = "SERENEMIND_DATA_DIR";

/// 配置服务实现
pub struct ConfigService {
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigService {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }

    /// 获取仓储引用
    pub fn repository(&self) -> &Arc<dyn ConfigRepository> {
        &self.repository
    }

    /// 加载配置，应用进程环境变量覆盖并校验
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok()).await
    }

    /// 同 [`ConfigService::load`]，环境变量来源可替换
    pub async fn load_with_env<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.repository.load().await?;
        apply_env_overrides(&mut config, lookup);

        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        info!(
            "[ConfigService] Configuration loaded (generator model: {}, data dir: {})",
            config.generator.model,
            config.storage.data_dir.display()
        );

        Ok(config)
    }

    /// 校验后保存
    pub async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;
        self.repository.save(config).await
    }

    /// 重置为默认配置
    pub async fn reset(&self) -> Result<AppConfig, ConfigError> {
        self.repository.clear().await?;
        self.repository.load().await
    }
}

/// 应用环境变量覆盖；空值忽略
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(ENV_GENERATOR_API_KEY) {
        debug!("[ConfigService] Generator api key taken from {}", ENV_GENERATOR_API_KEY);
        config.generator.api_key = Secret::new(key);
    }
    if let Some(token) = non_empty(ENV_CLASSIFIER_TOKEN) {
        debug!("[ConfigService] Classifier token taken from {}", ENV_CLASSIFIER_TOKEN);
        config.classifier.api_token = Secret::new(token);
    }
    if let Some(dir) = non_empty(ENV_DATA_DIR) {
        config.storage.data_dir = PathBuf::from(dir);
    }
}
