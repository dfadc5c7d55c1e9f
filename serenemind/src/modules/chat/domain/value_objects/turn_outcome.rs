use serde::{Deserialize, Serialize};

use super::EmotionLabel;

/// 一轮对话的结局
///
/// 所有失败都被吸收为某种回复，没有"失败"结局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TurnOutcome {
    /// 安全闸门命中，回复危机提示
    Distressed,
    /// 生成成功
    #[serde(rename_all = "camelCase")]
    Replied {
        emotion: EmotionLabel,
        classified: bool,
    },
    /// 生成失败，回复固定兜底文本
    #[serde(rename_all = "camelCase")]
    GenerationFallback {
        emotion: EmotionLabel,
        classified: bool,
    },
    /// 生成之前无法连接服务，提前结束
    ConnectivityFallback,
}

impl TurnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOutcome::Distressed => "distressed",
            TurnOutcome::Replied { .. } => "replied",
            TurnOutcome::GenerationFallback { .. } => "generation_fallback",
            TurnOutcome::ConnectivityFallback => "connectivity_fallback",
        }
    }

    /// 用于提示词与指导选择的情绪（分类失败时为 neutral）
    pub fn emotion(&self) -> Option<&EmotionLabel> {
        match self {
            TurnOutcome::Replied { emotion, .. } | TurnOutcome::GenerationFallback { emotion, .. } => {
                Some(emotion)
            }
            _ => None,
        }
    }
}
