// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置实体和值对象
// - ports: 端口层，定义配置读写的抽象接口
// - infrastructure: 基础设施层，实现具体的配置存储适配器
// - application: 应用层，负责加载、覆盖与校验

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    AppConfig, ClassifierConfig, ConversationConfig, GeneratorConfig, SafetyConfig, Secret,
    StorageConfig,
};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{InMemoryConfigRepository, StoreConfigRepository};

// Application
pub use application::{
    apply_env_overrides, ConfigService, ENV_CLASSIFIER_TOKEN, ENV_DATA_DIR, ENV_GENERATOR_API_KEY,
};

use std::path::Path;
use std::sync::Arc;

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    service: ConfigService,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 使用文件存储创建
    pub fn new_with_store(config_dir: impl AsRef<Path>) -> Self {
        Self::with_repository(Arc::new(StoreConfigRepository::new(config_dir)))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 获取配置服务
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// 加载配置
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        self.service.load().await
    }
}
