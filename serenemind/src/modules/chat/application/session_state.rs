use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, warn};

use super::{ApplicationError, ChatSettings};
use crate::modules::chat::domain::{greeting_message, Session, SessionId, TurnCommit};
use crate::modules::chat::infrastructure::repositories::SessionRecords;

/// 单个会话的共享状态
///
/// - `session`: 读者总是看到完整提交后的状态
/// - `turn_gate`: 同一会话的轮次按提交顺序串行执行
/// - `name_gate`: 名称的内存更新与持久化写入保持同一顺序
pub struct SessionState {
    id: SessionId,
    session: RwLock<Session>,
    turn_gate: Mutex<()>,
    name_gate: Mutex<()>,
    records: SessionRecords,
}

impl SessionState {
    /// 从持久化记录恢复会话；没有任何消息时按设置写入开场问候
    pub async fn open(
        id: SessionId,
        records: SessionRecords,
        settings: &ChatSettings,
    ) -> Result<Self, ApplicationError> {
        let mut session = records.load().await?;
        debug!(
            "[SessionState] Restored session {} ({} messages, {} moods)",
            id,
            session.messages().len(),
            session.moods().len()
        );

        if settings.greeting && session.messages().is_empty() {
            session.seed(greeting_message(
                session.user_name(),
                &settings.assistant_name,
            ));
            if let Err(e) = records.save_history(&session).await {
                warn!("[SessionState] Failed to persist greeting for {}: {}", id, e);
            }
        }

        Ok(Self {
            id,
            session: RwLock::new(session),
            turn_gate: Mutex::new(()),
            name_gate: Mutex::new(()),
            records,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    /// 只读快照
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// 等待前一轮完成；守卫释放前其他轮次不会开始
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn_gate.lock().await
    }

    /// 名称更新在持有守卫期间完成设置与保存
    pub async fn begin_name_update(&self) -> MutexGuard<'_, ()> {
        self.name_gate.lock().await
    }

    /// 原子提交一轮，返回提交后的快照
    pub async fn commit(&self, turn: TurnCommit) -> Session {
        let mut session = self.session.write().await;
        session.commit(turn);
        session.clone()
    }

    /// 设置显示名称，返回规范化后的名称
    pub async fn set_user_name(&self, name: Option<String>) -> Option<String> {
        let mut session = self.session.write().await;
        session.set_user_name(name);
        session.user_name().map(str::to_string)
    }
}
