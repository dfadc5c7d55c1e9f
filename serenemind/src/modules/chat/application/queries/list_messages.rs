use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler, SessionState};
use crate::modules::chat::domain::Message;
use crate::shared::{PaginatedResult, Pagination};

/// 列出消息查询（按时间顺序分页）
#[derive(Debug, Clone, Copy)]
pub struct ListMessagesQuery {
    pub page: u32,
    pub limit: u32,
}

impl ListMessagesQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for ListMessagesQuery {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// 列出消息响应
#[derive(Debug, Clone)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl From<PaginatedResult<Message>> for ListMessagesResponse {
    fn from(result: PaginatedResult<Message>) -> Self {
        let has_more = result.has_next();
        Self {
            messages: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            has_more,
        }
    }
}

/// 列出消息查询处理器
pub struct ListMessagesHandler {
    state: Arc<SessionState>,
}

impl ListMessagesHandler {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl QueryHandler<ListMessagesQuery, ListMessagesResponse> for ListMessagesHandler {
    async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        let pagination = Pagination::new(query.page, query.limit);
        let session = self.state.snapshot().await;

        Ok(pagination.apply(session.messages()).into())
    }
}
