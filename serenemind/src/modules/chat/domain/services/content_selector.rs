use super::super::value_objects::GuidanceKey;

/// 静态自我关怀指导表
///
/// 穷尽匹配，新增分桶时编译器会提示补全
pub fn guidance_bucket(key: GuidanceKey) -> &'static [&'static str] {
    match key {
        GuidanceKey::Sadness => &[
            "It's okay to feel sad. Allow yourself to feel it without judgment. Maybe listen to some calming music?",
            "Remember a time you felt happy. What were you doing? Sometimes recalling positive memories can bring a little light.",
            "Try the 5-4-3-2-1 grounding technique: Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, and 1 you can taste.",
            "Consider writing down your feelings. Journaling can be a powerful way to process emotions.",
        ],
        GuidanceKey::Anxiety => &[
            "Focus on your breath. Inhale slowly for 4 counts, hold for 4, and exhale for 6. Repeat this a few times.",
            "Try a simple grounding technique: Press your feet firmly into the floor. Feel the solid ground beneath you.",
            "Anxiety is often about the future. Let's bring it back to the present. What is one thing you can see right now? Describe it in detail.",
            "Hold a piece of ice in your hand. The intense cold can help pull your focus away from anxious thoughts.",
        ],
        GuidanceKey::Anger => &[
            "It's valid to feel angry. Let's try to channel that energy. Could you try clenching and then releasing your fists slowly?",
            "Take a step back. If you can, walk away from the situation for a few minutes to cool down.",
            "Listen to some intense music and let it absorb the angry energy, or try some calming sounds to soothe it.",
        ],
        GuidanceKey::Joy => &[
            "That's wonderful to hear! It's great to embrace moments of joy. Take a moment to truly savor this feeling.",
            "Share your joy! Sometimes telling a friend or loved one can amplify the happiness.",
        ],
        GuidanceKey::Default => &[
            "Remember to be kind to yourself today.",
            "Taking a few deep breaths can make a big difference.",
            "It's okay to not be okay. Your feelings are valid.",
        ],
    }
}

/// 内容选择器
///
/// 领域服务：情感标签 -> 指导分桶，查找永不失败
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSelector;

impl ContentSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select(&self, emotion: &str) -> &'static [&'static str] {
        guidance_bucket(GuidanceKey::from_label(emotion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_buckets() {
        let selector = ContentSelector::new();
        assert_eq!(selector.select("sadness").len(), 4);
        assert_eq!(selector.select("anxiety").len(), 4);
        assert_eq!(selector.select("anger").len(), 3);
        assert_eq!(selector.select("joy").len(), 2);
        assert!(selector.select("joy")[0].starts_with("That's wonderful"));
    }

    #[test]
    fn test_unknown_labels_fall_back_to_default() {
        let selector = ContentSelector::new();
        let default = selector.select("default");

        for label in ["neutral", "fear", "surprise", "disgust", "", "JOY", "love"] {
            assert_eq!(selector.select(label), default, "label {:?}", label);
        }
    }

    #[test]
    fn test_every_bucket_is_non_empty() {
        for key in GuidanceKey::all() {
            assert!(!guidance_bucket(*key).is_empty());
        }
    }
}
