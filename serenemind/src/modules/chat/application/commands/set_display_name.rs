use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::super::{ApplicationError, CommandHandler, SessionState};
use crate::infrastructure::EventBus;
use crate::modules::chat::domain::ChatDomainEvent;

/// 设置显示名称命令；`None` 或空白表示清除
#[derive(Debug, Clone)]
pub struct SetDisplayNameCommand {
    pub name: Option<String>,
}

impl SetDisplayNameCommand {
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }
}

/// 设置显示名称响应
#[derive(Debug, Clone)]
pub struct SetDisplayNameResponse {
    /// 规范化后的名称
    pub user_name: Option<String>,
}

/// 设置显示名称命令处理器
///
/// 不等待进行中的轮次；新名称从下一次构建提示词起生效
pub struct SetDisplayNameHandler {
    state: Arc<SessionState>,
    events: Arc<EventBus>,
}

impl SetDisplayNameHandler {
    pub fn new(state: Arc<SessionState>, events: Arc<EventBus>) -> Self {
        Self { state, events }
    }
}

#[async_trait]
impl CommandHandler<SetDisplayNameCommand, SetDisplayNameResponse> for SetDisplayNameHandler {
    async fn handle(
        &self,
        command: SetDisplayNameCommand,
    ) -> Result<SetDisplayNameResponse, ApplicationError> {
        let session_id = self.state.id();
        let _name_guard = self.state.begin_name_update().await;
        let user_name = self.state.set_user_name(command.name).await;

        if let Err(e) = self
            .state
            .records()
            .save_user_name(user_name.as_deref())
            .await
        {
            warn!(
                "[Orchestrator] Failed to persist display name for {}: {}",
                session_id, e
            );
        }

        info!(
            "[Orchestrator] Display name {} for session {}",
            if user_name.is_some() { "set" } else { "cleared" },
            session_id
        );
        self.events.publish(ChatDomainEvent::display_name_changed(
            session_id,
            user_name.clone(),
        ));

        Ok(SetDisplayNameResponse { user_name })
    }
}
