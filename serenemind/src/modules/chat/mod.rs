// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含实体、值对象、领域服务和领域事件
// - ports: 端口层，定义与外部世界的抽象接口
// - infrastructure: 基础设施层，实现端口的具体适配器
// - application: 应用层，实现 CQRS 命令和查询处理器及会话编排器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    ApplicationError, ChatPorts, ChatSettings, CommandHandler, ListMessagesResponse,
    ListMoodsResponse, Orchestrator, QueryHandler, SendMessageResponse, SetDisplayNameResponse,
};

pub use domain::{
    ChatDomainEvent, EmotionLabel, HelplineEntry, Message, MoodEntry, MoodSummary, Sender,
    Session, SessionId, TurnOutcome,
};

pub use infrastructure::{
    FileKeyValueStore, GeminiConfig, GeminiGenerator, HuggingFaceClassifier, HuggingFaceConfig,
    InMemoryKeyValueStore, ScriptedClassifier, ScriptedGenerator, SessionRecords,
};

pub use ports::{
    ClassificationError, EmotionClassifierPort, GenerationError, KeyValueStore,
    ResponseGeneratorPort, StoreError,
};

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, OnceCell, RwLock};
use tracing::info;

use crate::infrastructure::EventBus;
use crate::modules::config::AppConfig;

/// Chat 模块容器
///
/// 会话注册表：每个 `SessionId` 对应一个编排器，首次使用时创建或从存储恢复。
/// 不同会话互不阻塞，同一会话的轮次串行执行
pub struct ChatModule {
    ports: ChatPorts,
    settings: Arc<ChatSettings>,
    events: Arc<EventBus>,
    sessions: RwLock<HashMap<SessionId, Arc<Orchestrator>>>,
    primary: OnceCell<Arc<Orchestrator>>,
}

impl ChatModule {
    /// 创建新的 ChatModule 实例（内存存储，用于开发测试）
    pub fn new(
        classifier: Arc<dyn EmotionClassifierPort>,
        generator: Arc<dyn ResponseGeneratorPort>,
        settings: ChatSettings,
    ) -> Self {
        Self::with_ports(
            ChatPorts {
                classifier,
                generator,
                store: Arc::new(InMemoryKeyValueStore::new()),
            },
            settings,
        )
    }

    /// 按配置创建：HTTP 适配器 + 文件存储
    ///
    /// # Errors
    /// 无法初始化 HTTP 客户端或数据目录时返回错误
    pub async fn new_with_persistence(config: &AppConfig) -> Result<Self, ApplicationError> {
        let classifier = HuggingFaceClassifier::new(HuggingFaceConfig {
            url: config.classifier.url.clone(),
            api_token: Some(config.classifier.api_token.expose().to_string())
                .filter(|t| !t.trim().is_empty()),
            timeout_secs: config.classifier.timeout_secs,
        })
        .map_err(|e| ApplicationError::AdapterInit(e.to_string()))?;

        let generator = GeminiGenerator::new(GeminiConfig {
            base_url: config.generator.base_url.clone(),
            model: config.generator.model.clone(),
            api_key: config.generator.api_key.expose().to_string(),
            timeout_secs: config.generator.timeout_secs,
        })
        .map_err(|e| ApplicationError::AdapterInit(e.to_string()))?;

        let store = FileKeyValueStore::open(&config.storage.data_dir).await?;
        info!(
            "[ChatModule] Using {} for persistence",
            store.file_path().display()
        );

        Ok(Self::with_ports(
            ChatPorts {
                classifier: Arc::new(classifier),
                generator: Arc::new(generator),
                store: Arc::new(store),
            },
            ChatSettings::from(config),
        ))
    }

    /// 使用自定义端口创建 ChatModule
    pub fn with_ports(ports: ChatPorts, settings: ChatSettings) -> Self {
        Self {
            ports,
            settings: Arc::new(settings),
            events: Arc::new(EventBus::new()),
            sessions: RwLock::new(HashMap::new()),
            primary: OnceCell::new(),
        }
    }

    /// 获取或打开指定会话（键按会话 ID 划分命名空间）
    pub async fn session(&self, id: SessionId) -> Result<Arc<Orchestrator>, ApplicationError> {
        if let Some(existing) = self.sessions.read().await.get(&id) {
            return Ok(existing.clone());
        }

        // 恢复会话涉及存储读写，不持有注册表锁
        let records = SessionRecords::for_session(self.ports.store.clone(), id);
        let opened = Arc::new(self.open(id, records).await?);

        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&id) {
            return Ok(existing.clone());
        }
        sessions.insert(id, opened.clone());
        info!("[ChatModule] Opened session {}", id);

        Ok(opened)
    }

    /// 主会话：使用不带命名空间的键，供单用户宿主（CLI）使用
    pub async fn primary_session(&self) -> Result<Arc<Orchestrator>, ApplicationError> {
        self.primary
            .get_or_try_init(|| async {
                let records = SessionRecords::primary(self.ports.store.clone());
                let orchestrator = self.open(SessionId::new(), records).await?;
                Ok::<_, ApplicationError>(Arc::new(orchestrator))
            })
            .await
            .cloned()
    }

    async fn open(
        &self,
        id: SessionId,
        records: SessionRecords,
    ) -> Result<Orchestrator, ApplicationError> {
        Orchestrator::open(
            id,
            records,
            &self.ports,
            self.settings.clone(),
            self.events.clone(),
        )
        .await
    }

    /// 已打开的命名会话数量
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// 订阅领域事件
    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.events.subscribe()
    }

    // Accessors

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.ports.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::infrastructure::adapters::{ClassifierStep, GeneratorStep};
    use std::time::Duration;

    fn module() -> ChatModule {
        ChatModule::new(
            Arc::new(
                ScriptedClassifier::always(ClassifierStep::emotion("joy", 0.8))
                    .with_delay(Duration::from_millis(20)),
            ),
            Arc::new(ScriptedGenerator::always(GeneratorStep::reply("Lovely! 😊"))),
            ChatSettings::default().with_greeting(false),
        )
    }

    #[tokio::test]
    async fn test_session_is_reused() {
        let module = module();
        let id = SessionId::new();

        let a = module.session(id).await.unwrap();
        let b = module.session(id).await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(module.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_sessions_are_independent() {
        let module = module();
        let ids: Vec<SessionId> = (0..4).map(|_| SessionId::new()).collect();

        let results = futures::future::join_all(ids.iter().map(|id| {
            let module = &module;
            async move {
                let session = module.session(*id).await?;
                session.submit_message(format!("hello from {}", id)).await?;
                session.submit_message("again").await
            }
        }))
        .await;
        assert!(results.iter().all(|r| r.is_ok()));

        for id in &ids {
            let session = module.session(*id).await.unwrap().get_session().await.unwrap();
            assert_eq!(session.messages().len(), 4);
            assert_eq!(session.messages()[0].text(), format!("hello from {}", id));
            assert_eq!(session.moods().len(), 2);
        }
        assert_eq!(module.session_count().await, 4);
    }

    #[tokio::test]
    async fn test_sessions_use_separate_records() {
        let module = module();
        let a = module.session(SessionId::new()).await.unwrap();
        let primary = module.primary_session().await.unwrap();

        a.set_display_name(Some("Asha".into())).await.unwrap();

        assert!(primary.get_session().await.unwrap().user_name().is_none());
        assert!(module
            .store()
            .get("serenemind.userName")
            .await
            .unwrap()
            .is_none());
        let again = module.primary_session().await.unwrap();
        assert!(Arc::ptr_eq(&primary, &again));
    }

    #[tokio::test]
    async fn test_module_events() {
        let module = module();
        let mut rx = module.subscribe();

        let session = module.primary_session().await.unwrap();
        session.submit_message("hi").await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.session_id(), session.session_id());
    }

    /// 读取指定命名空间时变慢的存储
    struct SlowNamespaceStore {
        inner: InMemoryKeyValueStore,
        slow_namespace: String,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for SlowNamespaceStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if key.contains(&self.slow_namespace) {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_opening_session_does_not_block_lookups() {
        let slow_id = SessionId::new();
        let module = Arc::new(ChatModule::with_ports(
            ChatPorts {
                classifier: Arc::new(ScriptedClassifier::always(ClassifierStep::emotion("joy", 0.8))),
                generator: Arc::new(ScriptedGenerator::always(GeneratorStep::reply("ok"))),
                store: Arc::new(SlowNamespaceStore {
                    inner: InMemoryKeyValueStore::new(),
                    slow_namespace: slow_id.storage_namespace(),
                }),
            },
            ChatSettings::default().with_greeting(false),
        ));

        let ready_id = SessionId::new();
        let ready = module.session(ready_id).await.unwrap();

        let opening = {
            let module = module.clone();
            tokio::spawn(async move { module.session(slow_id).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let found = tokio::time::timeout(Duration::from_millis(100), module.session(ready_id))
            .await
            .expect("lookup waited on another session's restore")
            .unwrap();
        assert!(Arc::ptr_eq(&ready, &found));

        opening.await.unwrap().unwrap();
        assert_eq!(module.session_count().await, 2);
    }
}
