use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::super::value_objects::EmotionLabel;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("mood score must be finite and within [0, 1], got {0}")]
pub struct InvalidMoodScore(pub f64);

#[derive(Deserialize)]
struct MoodEntryRecord {
    emotion: EmotionLabel,
    score: f64,
    timestamp: DateTime<Utc>,
}

/// 情绪记录
///
/// 每条成功分类的用户消息产生一条；只追加。
/// 反序列化时同样校验分数范围
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MoodEntryRecord")]
pub struct MoodEntry {
    emotion: EmotionLabel,
    score: f64,
    timestamp: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(
        emotion: EmotionLabel,
        score: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, InvalidMoodScore> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(InvalidMoodScore(score));
        }
        Ok(Self {
            emotion,
            score,
            timestamp,
        })
    }

    /// 以当前时间记录
    pub fn record_now(emotion: EmotionLabel, score: f64) -> Result<Self, InvalidMoodScore> {
        Self::new(emotion, score, Utc::now())
    }

    pub fn emotion(&self) -> &EmotionLabel {
        &self.emotion
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl TryFrom<MoodEntryRecord> for MoodEntry {
    type Error = InvalidMoodScore;

    fn try_from(record: MoodEntryRecord) -> Result<Self, Self::Error> {
        MoodEntry::new(record.emotion, record.score, record.timestamp)
    }
}

/// 情绪历史汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub total: usize,
    /// 每种情绪的出现次数（按标签排序）
    pub counts: BTreeMap<String, usize>,
    pub mean_score: Option<f64>,
    pub latest: Option<MoodEntry>,
}

impl MoodSummary {
    pub fn from_entries(entries: &[MoodEntry]) -> Self {
        let mut counts = BTreeMap::new();
        for entry in entries {
            *counts.entry(entry.emotion().to_string()).or_insert(0) += 1;
        }

        let mean_score = if entries.is_empty() {
            None
        } else {
            Some(entries.iter().map(MoodEntry::score).sum::<f64>() / entries.len() as f64)
        };

        Self {
            total: entries.len(),
            counts,
            mean_score,
            latest: entries.last().cloned(),
        }
    }

    /// 出现次数最多的情绪；并列时取标签序靠前者
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in &self.counts {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((label.as_str(), *count));
            }
        }
        best.map(|(label, _)| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(MoodEntry::record_now("joy".into(), 0.0).is_ok());
        assert!(MoodEntry::record_now("joy".into(), 1.0).is_ok());
        assert!(MoodEntry::record_now("joy".into(), 1.01).is_err());
        assert!(MoodEntry::record_now("joy".into(), -0.1).is_err());
        assert!(MoodEntry::record_now("joy".into(), f64::NAN).is_err());
    }

    #[test]
    fn test_timestamp_serialized_as_rfc3339() {
        let ts = DateTime::parse_from_rfc3339("2026-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = MoodEntry::new("sadness".into(), 0.75, ts).unwrap();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["emotion"], "sadness");
        assert_eq!(json["timestamp"], "2026-03-01T09:30:00Z");

        let back: MoodEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_score() {
        let raw = r#"{"emotion":"joy","score":3.5,"timestamp":"2026-03-01T09:30:00Z"}"#;
        assert!(serde_json::from_str::<MoodEntry>(raw).is_err());
    }

    #[test]
    fn test_summary() {
        let entries = vec![
            MoodEntry::record_now("joy".into(), 0.5).unwrap(),
            MoodEntry::record_now("anger".into(), 0.9).unwrap(),
            MoodEntry::record_now("joy".into(), 0.7).unwrap(),
        ];
        let summary = MoodSummary::from_entries(&entries);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.counts.get("joy"), Some(&2));
        assert_eq!(summary.dominant(), Some("joy"));
        assert!((summary.mean_score.unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(summary.latest.unwrap().score(), 0.7);
    }

    #[test]
    fn test_empty_summary() {
        let summary = MoodSummary::from_entries(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.mean_score.is_none());
        assert!(summary.dominant().is_none());
    }
}
