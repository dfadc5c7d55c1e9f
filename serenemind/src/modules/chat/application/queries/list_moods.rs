use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler, SessionState};
use crate::modules::chat::domain::{MoodEntry, MoodSummary};

/// 情绪历史查询
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMoodsQuery {
    /// 只返回该时刻及之后的记录
    pub since: Option<DateTime<Utc>>,
}

impl ListMoodsQuery {
    pub fn since(since: DateTime<Utc>) -> Self {
        Self { since: Some(since) }
    }
}

/// 情绪历史响应
#[derive(Debug, Clone)]
pub struct ListMoodsResponse {
    pub moods: Vec<MoodEntry>,
    /// 基于过滤后的记录
    pub summary: MoodSummary,
}

/// 情绪历史查询处理器
pub struct ListMoodsHandler {
    state: Arc<SessionState>,
}

impl ListMoodsHandler {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl QueryHandler<ListMoodsQuery, ListMoodsResponse> for ListMoodsHandler {
    async fn handle(&self, query: ListMoodsQuery) -> Result<ListMoodsResponse, ApplicationError> {
        let session = self.state.snapshot().await;
        let moods: Vec<MoodEntry> = session
            .moods()
            .iter()
            .filter(|m| query.since.map_or(true, |since| m.timestamp() >= since))
            .cloned()
            .collect();
        let summary = MoodSummary::from_entries(&moods);

        Ok(ListMoodsResponse { moods, summary })
    }
}
