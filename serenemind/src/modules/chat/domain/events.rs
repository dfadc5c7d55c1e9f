use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::MoodEntry;
use super::value_objects::{SessionId, TurnOutcome};

/// 领域事件基础 trait
pub trait DomainEvent: Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// 轮次开始事件（界面据此显示输入中提示）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStartedEvent {
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for TurnStartedEvent {
    fn event_type(&self) -> &'static str {
        "turn.started"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 轮次完成事件
///
/// 每个开始的轮次都会发布，包括所有兜底路径
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnCompletedEvent {
    pub session_id: SessionId,
    pub outcome: TurnOutcome,
    pub message_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for TurnCompletedEvent {
    fn event_type(&self) -> &'static str {
        "turn.completed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 情绪记录事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecordedEvent {
    pub session_id: SessionId,
    pub mood: MoodEntry,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for MoodRecordedEvent {
    fn event_type(&self) -> &'static str {
        "mood.recorded"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 显示名称变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNameChangedEvent {
    pub session_id: SessionId,
    pub user_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for DisplayNameChangedEvent {
    fn event_type(&self) -> &'static str {
        "session.display_name_changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 聊天领域事件枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatDomainEvent {
    TurnStarted(TurnStartedEvent),
    TurnCompleted(TurnCompletedEvent),
    MoodRecorded(MoodRecordedEvent),
    DisplayNameChanged(DisplayNameChangedEvent),
}

impl ChatDomainEvent {
    pub fn turn_started(session_id: SessionId) -> Self {
        ChatDomainEvent::TurnStarted(TurnStartedEvent {
            session_id,
            timestamp: Utc::now(),
        })
    }

    pub fn turn_completed(session_id: SessionId, outcome: TurnOutcome, message_count: usize) -> Self {
        ChatDomainEvent::TurnCompleted(TurnCompletedEvent {
            session_id,
            outcome,
            message_count,
            timestamp: Utc::now(),
        })
    }

    pub fn mood_recorded(session_id: SessionId, mood: MoodEntry) -> Self {
        ChatDomainEvent::MoodRecorded(MoodRecordedEvent {
            session_id,
            mood,
            timestamp: Utc::now(),
        })
    }

    pub fn display_name_changed(session_id: SessionId, user_name: Option<String>) -> Self {
        ChatDomainEvent::DisplayNameChanged(DisplayNameChangedEvent {
            session_id,
            user_name,
            timestamp: Utc::now(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ChatDomainEvent::TurnStarted(e) => e.event_type(),
            ChatDomainEvent::TurnCompleted(e) => e.event_type(),
            ChatDomainEvent::MoodRecorded(e) => e.event_type(),
            ChatDomainEvent::DisplayNameChanged(e) => e.event_type(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            ChatDomainEvent::TurnStarted(e) => e.session_id,
            ChatDomainEvent::TurnCompleted(e) => e.session_id,
            ChatDomainEvent::MoodRecorded(e) => e.session_id,
            ChatDomainEvent::DisplayNameChanged(e) => e.session_id,
        }
    }
}
