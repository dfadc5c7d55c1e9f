// 脚本化适配器
//
// 按预设顺序返回结果并记录调用，用于离线运行与测试

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::modules::chat::domain::{EmotionLabel, Prompt};
use crate::modules::chat::ports::{
    ClassificationError, ClassificationResult, EmotionClassifierPort, GeneratedText,
    GenerationError, ResponseGeneratorPort,
};

/// 脚本化的失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    Unreachable,
    Timeout,
    Transport,
    Status(u16),
    Malformed,
    Empty,
}

/// 分类器脚本步骤
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierStep {
    Emotion(String, f64),
    Fail(ScriptedFailure),
}

impl ClassifierStep {
    pub fn emotion(label: impl Into<String>, score: f64) -> Self {
        ClassifierStep::Emotion(label.into(), score)
    }

    fn into_result(self) -> Result<ClassificationResult, ClassificationError> {
        match self {
            ClassifierStep::Emotion(label, score) => Ok(ClassificationResult {
                emotion: EmotionLabel::new(label),
                score,
            }),
            ClassifierStep::Fail(failure) => Err(match failure {
                ScriptedFailure::Unreachable => {
                    ClassificationError::Unreachable("connection refused".to_string())
                }
                ScriptedFailure::Timeout => ClassificationError::Timeout(30),
                ScriptedFailure::Transport => {
                    ClassificationError::Transport("connection reset".to_string())
                }
                ScriptedFailure::Status(status) => ClassificationError::Status {
                    status,
                    body: String::new(),
                },
                ScriptedFailure::Malformed => {
                    ClassificationError::Malformed("unexpected body".to_string())
                }
                ScriptedFailure::Empty => ClassificationError::EmptyCandidates,
            }),
        }
    }
}

/// 生成器脚本步骤
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorStep {
    Reply(String),
    Fail(ScriptedFailure),
}

impl GeneratorStep {
    pub fn reply(text: impl Into<String>) -> Self {
        GeneratorStep::Reply(text.into())
    }

    fn into_result(self) -> Result<GeneratedText, GenerationError> {
        match self {
            GeneratorStep::Reply(text) => Ok(GeneratedText(text)),
            GeneratorStep::Fail(failure) => Err(match failure {
                ScriptedFailure::Unreachable => {
                    GenerationError::Unreachable("connection refused".to_string())
                }
                ScriptedFailure::Timeout => GenerationError::Timeout(60),
                ScriptedFailure::Transport => {
                    GenerationError::Transport("connection reset".to_string())
                }
                ScriptedFailure::Status(status) => GenerationError::Status {
                    status,
                    body: String::new(),
                },
                ScriptedFailure::Malformed => {
                    GenerationError::Malformed("unexpected body".to_string())
                }
                ScriptedFailure::Empty => GenerationError::NoCandidates,
            }),
        }
    }
}

/// 步骤队列；耗尽后重复最后一步
struct Script<S> {
    steps: VecDeque<S>,
    last: S,
}

impl<S: Clone> Script<S> {
    fn new(steps: Vec<S>, fallback: S) -> Self {
        let last = steps.last().cloned().unwrap_or(fallback);
        Self {
            steps: steps.into(),
            last,
        }
    }

    fn next(&mut self) -> S {
        self.steps.pop_front().unwrap_or_else(|| self.last.clone())
    }
}

/// 脚本化情绪分类器
pub struct ScriptedClassifier {
    script: Mutex<Script<ClassifierStep>>,
    inputs: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedClassifier {
    pub fn new(steps: Vec<ClassifierStep>) -> Self {
        Self {
            script: Mutex::new(Script::new(steps, ClassifierStep::emotion("neutral", 1.0))),
            inputs: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// 每次都返回同一步骤
    pub fn always(step: ClassifierStep) -> Self {
        Self::new(vec![step])
    }

    /// 每次调用前等待
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按调用顺序记录的输入文本
    pub async fn inputs(&self) -> Vec<String> {
        self.inputs.lock().await.clone()
    }
}

#[async_trait]
impl EmotionClassifierPort for ScriptedClassifier {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().await.push(text.to_string());
        let step = self.script.lock().await.next();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        step.into_result()
    }
}

/// 脚本化回复生成器
pub struct ScriptedGenerator {
    script: Mutex<Script<GeneratorStep>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new(steps: Vec<GeneratorStep>) -> Self {
        Self {
            script: Mutex::new(Script::new(
                steps,
                GeneratorStep::reply("I'm listening. 😊"),
            )),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn always(step: GeneratorStep) -> Self {
        Self::new(vec![step])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按调用顺序记录的提示词
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl ResponseGeneratorPort for ScriptedGenerator {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedText, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.as_str().to_string());
        let step = self.script.lock().await.next();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        step.into_result()
    }
}
