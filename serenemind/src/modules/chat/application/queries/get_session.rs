use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler, SessionState};
use crate::modules::chat::domain::{Session, SessionId};

/// 获取会话查询
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSessionQuery;

/// 获取会话响应
#[derive(Debug, Clone)]
pub struct GetSessionResponse {
    pub session_id: SessionId,
    /// 只读快照
    pub session: Session,
}

/// 获取会话查询处理器
pub struct GetSessionHandler {
    state: Arc<SessionState>,
}

impl GetSessionHandler {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl QueryHandler<GetSessionQuery, GetSessionResponse> for GetSessionHandler {
    async fn handle(&self, _query: GetSessionQuery) -> Result<GetSessionResponse, ApplicationError> {
        Ok(GetSessionResponse {
            session_id: self.state.id(),
            session: self.state.snapshot().await,
        })
    }
}
