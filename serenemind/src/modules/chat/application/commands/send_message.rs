use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::super::{ApplicationError, ChatSettings, CommandHandler, SessionState};
use crate::infrastructure::EventBus;
use crate::modules::chat::domain::{
    ChatDomainEvent, EmotionLabel, Message, MoodEntry, Prompt, SafetyVerdict, TurnCommit,
    TurnOutcome,
    CONNECTIVITY_FALLBACK_TEXT, GENERATION_FALLBACK_TEXT,
};
use crate::modules::chat::ports::{
    ClassificationError, ClassificationResult, EmotionClassifierPort, GeneratedText,
    GenerationError, ResponseGeneratorPort,
};

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// 用户消息内容
    pub text: String,
}

impl SendMessageCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 发送消息响应
#[derive(Debug, Clone)]
pub struct SendMessageResponse {
    /// 本轮提交的用户消息
    pub user_message: Message,
    /// 本轮提交的回复（机器人、危机或兜底消息）
    pub reply: Message,
    /// 分类成功时的情绪记录
    pub mood: Option<MoodEntry>,
    pub outcome: TurnOutcome,
    /// 提交后的消息总数
    pub message_count: usize,
}

/// 轮次状态
///
/// Idle → SafetyCheck → Distressed | Classifying → Generating
#[derive(Debug)]
enum TurnState {
    Idle,
    SafetyCheck,
    Distressed { phrase: String },
    Classifying,
    Generating {
        emotion: EmotionLabel,
        classified: bool,
        mood: Option<MoodEntry>,
    },
}

/// 轮次终点
struct TurnEnd {
    reply: Message,
    mood: Option<MoodEntry>,
    outcome: TurnOutcome,
}

/// 发送消息命令处理器
///
/// 一次处理一个完整轮次：安全检查、分类、选择指导、构建提示词、生成，最后原子提交
pub struct SendMessageHandler {
    state: Arc<SessionState>,
    classifier: Arc<dyn EmotionClassifierPort>,
    generator: Arc<dyn ResponseGeneratorPort>,
    settings: Arc<ChatSettings>,
    events: Arc<EventBus>,
}

impl SendMessageHandler {
    pub fn new(
        state: Arc<SessionState>,
        classifier: Arc<dyn EmotionClassifierPort>,
        generator: Arc<dyn ResponseGeneratorPort>,
        settings: Arc<ChatSettings>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            state,
            classifier,
            generator,
            settings,
            events,
        }
    }

    /// 驱动状态机直到终点；所有失败都在这里被吸收
    async fn run_turn(
        &self,
        history: &[Message],
        user_name: Option<&str>,
        user_message: &Message,
    ) -> TurnEnd {
        let text = user_message.text();
        let mut state = TurnState::Idle;

        loop {
            state = match state {
                TurnState::Idle => TurnState::SafetyCheck,

                TurnState::SafetyCheck => match self.settings.safety_gate.evaluate(text) {
                    SafetyVerdict::Hit { phrase } => TurnState::Distressed { phrase },
                    SafetyVerdict::Clear => TurnState::Classifying,
                },

                TurnState::Distressed { phrase } => {
                    info!("[Orchestrator] Distress phrase matched: '{}'", phrase);
                    return TurnEnd {
                        reply: self.settings.safety_gate.distress_message(),
                        mood: None,
                        outcome: TurnOutcome::Distressed,
                    };
                }

                TurnState::Classifying => match self.classify(text).await {
                    Ok(result) => {
                        match MoodEntry::record_now(result.emotion.clone(), result.score) {
                            Ok(mood) => TurnState::Generating {
                                emotion: result.emotion,
                                classified: true,
                                mood: Some(mood),
                            },
                            Err(e) => {
                                warn!("[Orchestrator] Discarding classification: {}", e);
                                TurnState::Generating {
                                    emotion: EmotionLabel::neutral(),
                                    classified: false,
                                    mood: None,
                                }
                            }
                        }
                    }
                    Err(e) if e.is_unreachable() => {
                        warn!(
                            "[Orchestrator] Classifier '{}' unreachable, ending turn: {}",
                            self.classifier.provider_id(),
                            e
                        );
                        return TurnEnd {
                            reply: Message::bot(CONNECTIVITY_FALLBACK_TEXT),
                            mood: None,
                            outcome: TurnOutcome::ConnectivityFallback,
                        };
                    }
                    Err(e) => {
                        warn!(
                            "[Orchestrator] Classification failed, using neutral: {}",
                            e
                        );
                        TurnState::Generating {
                            emotion: EmotionLabel::neutral(),
                            classified: false,
                            mood: None,
                        }
                    }
                },

                TurnState::Generating {
                    emotion,
                    classified,
                    mood,
                } => {
                    let guidance = self.settings.content_selector.select(emotion.as_str());
                    let prompt = self.settings.prompt_builder.build(
                        history,
                        user_message,
                        &emotion,
                        guidance,
                        user_name,
                    );
                    debug!(
                        "[Orchestrator] Prompt built for emotion '{}' ({} chars)",
                        emotion,
                        prompt.as_str().len()
                    );

                    return match self.generate(&prompt).await {
                        Ok(generated) => TurnEnd {
                            reply: Message::bot(generated.into_string()),
                            mood,
                            outcome: TurnOutcome::Replied {
                                emotion,
                                classified,
                            },
                        },
                        Err(e) => {
                            warn!(
                                "[Orchestrator] Generator '{}' failed, using fallback: {}",
                                self.generator.provider_id(),
                                e
                            );
                            TurnEnd {
                                reply: Message::bot(GENERATION_FALLBACK_TEXT),
                                mood,
                                outcome: TurnOutcome::GenerationFallback {
                                    emotion,
                                    classified,
                                },
                            }
                        }
                    };
                }
            };
        }
    }

    /// 调用分类器，超时视为失败
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationError> {
        let limit = self.settings.classifier_timeout;
        match tokio::time::timeout(limit, self.classifier.classify(text)).await {
            Ok(result) => result,
            Err(_) => Err(ClassificationError::Timeout(limit.as_secs())),
        }
    }

    /// 调用生成器，超时视为失败
    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedText, GenerationError> {
        let limit = self.settings.generator_timeout;
        match tokio::time::timeout(limit, self.generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(limit.as_secs())),
        }
    }
}

#[async_trait]
impl CommandHandler<SendMessageCommand, SendMessageResponse> for SendMessageHandler {
    async fn handle(
        &self,
        command: SendMessageCommand,
    ) -> Result<SendMessageResponse, ApplicationError> {
        // 只用于判断空白输入；提交与提示词使用原文
        if command.text.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "Message text must not be empty".to_string(),
            ));
        }

        let session_id = self.state.id();
        let _turn = self.state.begin_turn().await;
        self.events.publish(ChatDomainEvent::turn_started(session_id));

        let snapshot = self.state.snapshot().await;
        let user_message = Message::user(command.text);
        debug!(
            "[Orchestrator] Turn started for session {} ({} chars)",
            session_id,
            user_message.text().chars().count()
        );

        let end = self
            .run_turn(snapshot.messages(), snapshot.user_name(), &user_message)
            .await;

        let committed = self
            .state
            .commit(TurnCommit {
                user_message: user_message.clone(),
                reply: end.reply.clone(),
                mood: end.mood.clone(),
            })
            .await;

        if let Err(e) = self.state.records().save_history(&committed).await {
            warn!(
                "[Orchestrator] Failed to persist session {}: {}",
                session_id, e
            );
        }

        if let Some(mood) = &end.mood {
            self.events
                .publish(ChatDomainEvent::mood_recorded(session_id, mood.clone()));
        }

        let message_count = committed.messages().len();
        info!(
            "[Orchestrator] Turn completed for session {}: {} ({} messages)",
            session_id,
            end.outcome.as_str(),
            message_count
        );
        self.events.publish(ChatDomainEvent::turn_completed(
            session_id,
            end.outcome.clone(),
            message_count,
        ));

        Ok(SendMessageResponse {
            user_message,
            reply: end.reply,
            mood: end.mood,
            outcome: end.outcome,
            message_count,
        })
    }
}
