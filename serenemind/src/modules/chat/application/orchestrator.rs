// 会话编排器
//
// 每个会话一个实例，组合该会话的命令与查询处理器

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::{
    ApplicationError, ChatSettings, CommandHandler, GetSessionHandler, GetSessionQuery,
    ListMessagesHandler, ListMessagesQuery, ListMessagesResponse, ListMoodsHandler,
    ListMoodsQuery, ListMoodsResponse, QueryHandler, SendMessageCommand, SendMessageHandler,
    SendMessageResponse, SessionState, SetDisplayNameCommand, SetDisplayNameHandler,
    SetDisplayNameResponse,
};
use crate::infrastructure::EventBus;
use crate::modules::chat::domain::{Session, SessionId};
use crate::modules::chat::infrastructure::repositories::SessionRecords;
use crate::modules::chat::ports::{EmotionClassifierPort, KeyValueStore, ResponseGeneratorPort};

/// 编排器依赖的外部端口
#[derive(Clone)]
pub struct ChatPorts {
    pub classifier: Arc<dyn EmotionClassifierPort>,
    pub generator: Arc<dyn ResponseGeneratorPort>,
    pub store: Arc<dyn KeyValueStore>,
}

/// 单会话编排器
pub struct Orchestrator {
    state: Arc<SessionState>,
    send_message_handler: SendMessageHandler,
    set_display_name_handler: SetDisplayNameHandler,
    get_session_handler: GetSessionHandler,
    list_messages_handler: ListMessagesHandler,
    list_moods_handler: ListMoodsHandler,
}

impl Orchestrator {
    /// 打开会话：从记录恢复，必要时写入问候
    pub async fn open(
        id: SessionId,
        records: SessionRecords,
        ports: &ChatPorts,
        settings: Arc<ChatSettings>,
        events: Arc<EventBus>,
    ) -> Result<Self, ApplicationError> {
        let state = Arc::new(SessionState::open(id, records, &settings).await?);

        Ok(Self {
            send_message_handler: SendMessageHandler::new(
                state.clone(),
                ports.classifier.clone(),
                ports.generator.clone(),
                settings,
                events.clone(),
            ),
            set_display_name_handler: SetDisplayNameHandler::new(state.clone(), events),
            get_session_handler: GetSessionHandler::new(state.clone()),
            list_messages_handler: ListMessagesHandler::new(state.clone()),
            list_moods_handler: ListMoodsHandler::new(state.clone()),
            state,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.state.id()
    }

    /// 提交一条用户消息并运行完整轮次
    pub async fn submit_message(
        &self,
        text: impl Into<String>,
    ) -> Result<SendMessageResponse, ApplicationError> {
        self.send_message_handler
            .handle(SendMessageCommand::new(text))
            .await
    }

    /// 设置或清除显示名称
    pub async fn set_display_name(
        &self,
        name: Option<String>,
    ) -> Result<SetDisplayNameResponse, ApplicationError> {
        self.set_display_name_handler
            .handle(SetDisplayNameCommand::new(name))
            .await
    }

    /// 会话只读快照
    pub async fn get_session(&self) -> Result<Session, ApplicationError> {
        let response = self.get_session_handler.handle(GetSessionQuery).await?;
        Ok(response.session)
    }

    /// 分页列出消息
    pub async fn list_messages(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        self.list_messages_handler
            .handle(ListMessagesQuery::new(page, limit))
            .await
    }

    /// 情绪历史及汇总
    pub async fn list_moods(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<ListMoodsResponse, ApplicationError> {
        self.list_moods_handler
            .handle(ListMoodsQuery { since })
            .await
    }
}
