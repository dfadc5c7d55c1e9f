// 会话持久化记录
//
// 会话映射为三个独立的键：显示名称、消息历史、情绪历史

use std::sync::Arc;

use crate::modules::chat::domain::{Message, MoodEntry, Session, SessionId};
use crate::modules::chat::ports::{KeyValueStore, StoreError};

const KEY_PREFIX: &str = "serenemind";
const USER_NAME: &str = "userName";
const CHAT_HISTORY: &str = "chatHistory";
const MOOD_HISTORY: &str = "moodHistory";

/// 会话记录读写器
#[derive(Clone)]
pub struct SessionRecords {
    store: Arc<dyn KeyValueStore>,
    namespace: Option<String>,
}

impl SessionRecords {
    /// 使用不带命名空间的键（单会话宿主）
    pub fn primary(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            namespace: None,
        }
    }

    /// 按会话 ID 划分命名空间
    pub fn for_session(store: Arc<dyn KeyValueStore>, id: SessionId) -> Self {
        Self {
            store,
            namespace: Some(id.storage_namespace()),
        }
    }

    fn key(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}.{}", KEY_PREFIX, ns, name),
            None => format!("{}.{}", KEY_PREFIX, name),
        }
    }

    pub fn user_name_key(&self) -> String {
        self.key(USER_NAME)
    }

    pub fn chat_history_key(&self) -> String {
        self.key(CHAT_HISTORY)
    }

    pub fn mood_history_key(&self) -> String {
        self.key(MOOD_HISTORY)
    }

    /// 加载会话；缺失的键使用默认值
    pub async fn load(&self) -> Result<Session, StoreError> {
        let user_name = self.store.get(&self.user_name_key()).await?;
        let messages: Vec<Message> = self.read_json(&self.chat_history_key()).await?;
        let moods: Vec<MoodEntry> = self.read_json(&self.mood_history_key()).await?;

        Ok(Session::restore(user_name, messages, moods))
    }

    pub async fn save_user_name(&self, name: Option<&str>) -> Result<(), StoreError> {
        match name {
            Some(name) => self.store.set(&self.user_name_key(), name.to_string()).await,
            None => self.store.remove(&self.user_name_key()).await,
        }
    }

    /// 写入消息与情绪历史
    pub async fn save_history(&self, session: &Session) -> Result<(), StoreError> {
        let messages = serde_json::to_string(session.messages())?;
        self.store.set(&self.chat_history_key(), messages).await?;

        let moods = serde_json::to_string(session.moods())?;
        self.store.set(&self.mood_history_key(), moods).await
    }

    async fn read_json<T>(&self, key: &str) -> Result<Vec<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::{default_helplines, EmotionLabel, TurnCommit};
    use crate::modules::chat::infrastructure::repositories::{
        FileKeyValueStore, InMemoryKeyValueStore,
    };
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.set_user_name(Some("Asha".to_string()));
        session.seed(Message::bot("Hello, Asha!"));
        session.commit(TurnCommit {
            user_message: Message::user("I feel low"),
            reply: Message::bot("I'm sorry to hear that."),
            mood: Some(
                MoodEntry::new(
                    EmotionLabel::new("sadness"),
                    0.73,
                    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 15).unwrap(),
                )
                .unwrap(),
            ),
        });
        session.commit(TurnCommit {
            user_message: Message::user("I want to die"),
            reply: Message::distress("help", default_helplines()),
            mood: None,
        });
        session
    }

    #[tokio::test]
    async fn test_missing_keys_seed_defaults() {
        let records = SessionRecords::primary(Arc::new(InMemoryKeyValueStore::new()));
        let session = records.load().await.unwrap();

        assert_eq!(session, Session::new());
    }

    #[tokio::test]
    async fn test_round_trip_through_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let session = sample_session();

        {
            let store = Arc::new(FileKeyValueStore::open(temp_dir.path()).await.unwrap());
            let records = SessionRecords::primary(store);
            records.save_user_name(session.user_name()).await.unwrap();
            records.save_history(&session).await.unwrap();
        }

        let store = Arc::new(FileKeyValueStore::open(temp_dir.path()).await.unwrap());
        let restored = SessionRecords::primary(store).load().await.unwrap();

        assert_eq!(restored.user_name(), Some("Asha"));
        assert_eq!(restored.messages(), session.messages());
        assert_eq!(restored.moods().len(), 1);
        assert_eq!(restored.moods()[0].emotion().as_str(), "sadness");
        assert_eq!(restored.moods()[0].score(), 0.73);
        assert_eq!(restored.moods()[0].timestamp(), session.moods()[0].timestamp());
    }

    #[tokio::test]
    async fn test_record_layout() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let records = SessionRecords::primary(store.clone());
        records.save_user_name(Some("Asha")).await.unwrap();
        records.save_history(&sample_session()).await.unwrap();

        assert_eq!(
            store.get("serenemind.userName").await.unwrap().as_deref(),
            Some("Asha")
        );
        let moods = store.get("serenemind.moodHistory").await.unwrap().unwrap();
        assert!(moods.contains("\"timestamp\":\"2026-03-01T09:30:15Z\""));
        let history = store.get("serenemind.chatHistory").await.unwrap().unwrap();
        assert!(history.contains("\"isDistress\":true"));
    }

    #[tokio::test]
    async fn test_clearing_name_removes_key() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let records = SessionRecords::primary(store.clone());
        records.save_user_name(Some("Asha")).await.unwrap();
        records.save_user_name(None).await.unwrap();

        assert!(store.get("serenemind.userName").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_namespaced_sessions_are_isolated() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let a = SessionRecords::for_session(store.clone(), SessionId::new());
        let b = SessionRecords::for_session(store.clone(), SessionId::new());

        a.save_user_name(Some("A")).await.unwrap();
        assert_eq!(a.load().await.unwrap().user_name(), Some("A"));
        assert_eq!(b.load().await.unwrap().user_name(), None);
        assert_ne!(a.user_name_key(), b.user_name_key());
    }

    #[tokio::test]
    async fn test_corrupt_record() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store
            .set("serenemind.moodHistory", "[{\"emotion\":\"joy\",\"score\":7}]".to_string())
            .await
            .unwrap();

        let err = SessionRecords::primary(store).load().await.unwrap_err();
        match err {
            StoreError::Corrupt { key, .. } => assert_eq!(key, "serenemind.moodHistory"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
