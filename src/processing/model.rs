//! Canonical analysis record and its parts
//!
//! Values are clamped once when these records are built; consumers read them as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Technical,
    SoftSkill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntity {
    pub skill: String,
    pub confidence: f64,
    pub category: SkillCategory,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntity {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Confident,
    Modest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub tone: Tone,
    pub confidence: f64,
    pub positivity: f64,
    pub emotions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub flesch_reading_ease: f64,
    pub gunning_fog_index: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtsTier {
    Low,
    Medium,
    Strong,
}

impl AtsTier {
    /// Tier from a similarity in 0..=1.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity > 0.7 {
            AtsTier::Strong
        } else if similarity > 0.5 {
            AtsTier::Medium
        } else {
            AtsTier::Low
        }
    }

    /// Tier from a 0..=100 score, on the same thresholds as similarity.
    pub fn from_score(score: f64) -> Self {
        Self::from_similarity(score / 100.0)
    }
}

/// How an ATS score was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AtsMode {
    Semantic,
    SkillList,
    JobTitleKeywords,
    CommonKeywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScore {
    pub score: f64,
    pub tier: AtsTier,
    pub mode: AtsMode,
    pub similarity: Option<f64>,
    pub degraded: bool,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub role: String,
    pub required_skills: Vec<String>,
    pub matched: Vec<String>,
    pub weak: Vec<String>,
    pub missing: Vec<String>,
    pub confidence_map: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Skills,
    Readability,
    Experience,
    Keywords,
    Sentiment,
    Ats,
}

/// A metric that was produced by a local fallback after the external path failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedMetric {
    pub metric: Metric,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    pub metric: Metric,
    pub sub_score: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub skills: Vec<SkillEntity>,
    pub experience: Vec<ExperienceEntity>,
    pub sentiment: SentimentResult,
    pub readability: ReadabilityMetrics,
    pub keywords: Vec<String>,
    pub entities: BTreeMap<String, Vec<String>>,
    pub ats_score: Option<AtsScore>,
    pub skill_gap: Option<SkillGap>,
    pub overall_score: f64,
    pub score_breakdown: Vec<MetricScore>,
    pub degraded: Vec<DegradedMetric>,
}

/// Result of a metric that has an external and a local path.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived<T> {
    Inferred(T),
    Heuristic { value: T, fallback_reason: Option<String> },
}

impl<T> Derived<T> {
    pub fn heuristic(value: T) -> Self {
        Derived::Heuristic { value, fallback_reason: None }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Derived::Heuristic { value, fallback_reason: Some(reason.into()) }
    }

    pub fn value(&self) -> &T {
        match self {
            Derived::Inferred(value) => value,
            Derived::Heuristic { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Derived::Inferred(value) => value,
            Derived::Heuristic { value, .. } => value,
        }
    }

    pub fn is_inferred(&self) -> bool {
        matches!(self, Derived::Inferred(_))
    }

    /// Why the external path was abandoned, if it was attempted.
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Derived::Heuristic { fallback_reason, .. } => fallback_reason.as_deref(),
            Derived::Inferred(_) => None,
        }
    }
}

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn clamp100(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(AtsTier::from_similarity(0.71), AtsTier::Strong);
        assert_eq!(AtsTier::from_similarity(0.7), AtsTier::Medium);
        assert_eq!(AtsTier::from_similarity(0.51), AtsTier::Medium);
        assert_eq!(AtsTier::from_similarity(0.5), AtsTier::Low);
        assert_eq!(AtsTier::from_score(80.0), AtsTier::Strong);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp100(140.0), 100.0);
        assert_eq!(round1(3.14159), 3.1);
    }

    #[test]
    fn test_derived_accessors() {
        let inferred = Derived::Inferred(3);
        assert!(inferred.is_inferred());
        assert_eq!(inferred.fallback_reason(), None);

        let fallback = Derived::fallback(4, "timeout");
        assert!(!fallback.is_inferred());
        assert_eq!(fallback.fallback_reason(), Some("timeout"));
        assert_eq!(fallback.into_value(), 4);

        assert_eq!(Derived::heuristic(5).fallback_reason(), None);
    }

    #[test]
    fn test_field_names_serialize_camel_case() {
        let metrics = ReadabilityMetrics {
            word_count: 10,
            sentence_count: 2,
            avg_sentence_length: 5.0,
            flesch_reading_ease: 80.0,
            gunning_fog_index: 4.0,
            score: 90.0,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json.get("wordCount").is_some());
        assert!(json.get("avgSentenceLength").is_some());
        assert!(json.get("gunningFogIndex").is_some());
    }
}
