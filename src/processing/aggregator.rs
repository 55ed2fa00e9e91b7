//! Weighted aggregation of per-metric sub-scores into an overall score

use crate::config::ScoringWeights;
use crate::processing::model::{
    clamp100, ExperienceEntity, Metric, MetricScore, ReadabilityMetrics, SentimentResult,
    SkillEntity,
};

const POINTS_PER_ROLE: f64 = 20.0;
const POINTS_PER_ACHIEVEMENT: f64 = 10.0;
const POINTS_PER_KEYWORD: f64 = 6.67;

/// Inputs for aggregation; `None` marks a metric that could not be computed.
#[derive(Debug, Clone, Copy)]
pub struct AggregateInputs<'a> {
    pub skills: Option<&'a [SkillEntity]>,
    pub readability: Option<&'a ReadabilityMetrics>,
    pub experience: Option<&'a [ExperienceEntity]>,
    pub keywords: Option<&'a [String]>,
    pub sentiment: Option<&'a SentimentResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateScore {
    pub overall: f64,
    pub breakdown: Vec<MetricScore>,
}

pub struct ScoreAggregator {
    weights: ScoringWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn skills_score(skills: &[SkillEntity]) -> f64 {
        if skills.is_empty() {
            return 0.0;
        }
        let total: f64 = skills.iter().map(|s| s.confidence * 100.0).sum();
        clamp100(total / skills.len() as f64)
    }

    pub fn experience_score(experience: &[ExperienceEntity]) -> f64 {
        let achievements: usize = experience.iter().map(|e| e.achievements.len()).sum();
        clamp100(experience.len() as f64 * POINTS_PER_ROLE + achievements as f64 * POINTS_PER_ACHIEVEMENT)
    }

    pub fn keywords_score(keywords: &[String]) -> f64 {
        clamp100(keywords.len() as f64 * POINTS_PER_KEYWORD)
    }

    pub fn sentiment_score(sentiment: &SentimentResult) -> f64 {
        clamp100((sentiment.confidence + sentiment.positivity) * 50.0)
    }

    /// Renormalizes over the metrics that are present; zero total weight yields 0.
    pub fn aggregate(&self, inputs: AggregateInputs<'_>) -> AggregateScore {
        let entries = [
            (Metric::Skills, self.weights.skills, inputs.skills.map(Self::skills_score)),
            (
                Metric::Readability,
                self.weights.readability,
                inputs.readability.map(|r| clamp100(r.score)),
            ),
            (
                Metric::Experience,
                self.weights.experience,
                inputs.experience.map(Self::experience_score),
            ),
            (Metric::Keywords, self.weights.keywords, inputs.keywords.map(Self::keywords_score)),
            (
                Metric::Sentiment,
                self.weights.sentiment,
                inputs.sentiment.map(Self::sentiment_score),
            ),
        ];

        let weight_sum: f64 = entries
            .iter()
            .filter(|(_, _, sub)| sub.is_some())
            .map(|(_, weight, _)| *weight)
            .sum();

        let breakdown: Vec<MetricScore> = entries
            .iter()
            .map(|(metric, weight, sub_score)| MetricScore {
                metric: *metric,
                sub_score: *sub_score,
                weight: match sub_score {
                    Some(_) if weight_sum > 0.0 => weight / weight_sum,
                    _ => 0.0,
                },
            })
            .collect();

        if weight_sum <= 0.0 {
            log::warn!("No computable metrics; overall score is 0");
            return AggregateScore { overall: 0.0, breakdown };
        }

        let weighted: f64 = entries
            .iter()
            .filter_map(|(_, weight, sub)| sub.map(|s| weight * s))
            .sum();

        AggregateScore {
            overall: clamp100((weighted / weight_sum).round()),
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::model::{SkillCategory, Tone};
    use std::collections::BTreeMap;

    fn skill(confidence: f64) -> SkillEntity {
        SkillEntity {
            skill: "Rust".to_string(),
            confidence,
            category: SkillCategory::Technical,
            context: String::new(),
        }
    }

    fn readability(score: f64) -> ReadabilityMetrics {
        ReadabilityMetrics {
            word_count: 100,
            sentence_count: 5,
            avg_sentence_length: 20.0,
            flesch_reading_ease: score,
            gunning_fog_index: 10.0,
            score,
        }
    }

    fn sentiment(confidence: f64, positivity: f64) -> SentimentResult {
        SentimentResult {
            tone: Tone::Professional,
            confidence,
            positivity,
            emotions: BTreeMap::new(),
        }
    }

    fn experience(roles: usize, achievements_each: usize) -> Vec<ExperienceEntity> {
        (0..roles)
            .map(|i| ExperienceEntity {
                title: format!("Engineer {}", i),
                company: String::new(),
                duration: String::new(),
                start_date: None,
                end_date: None,
                achievements: vec!["did it".to_string(); achievements_each],
            })
            .collect()
    }

    #[test]
    fn test_sub_scores() {
        assert_eq!(ScoreAggregator::skills_score(&[]), 0.0);
        assert!((ScoreAggregator::skills_score(&[skill(0.8), skill(0.6)]) - 70.0).abs() < 1e-9);
        assert_eq!(ScoreAggregator::experience_score(&experience(2, 1)), 60.0);
        assert_eq!(ScoreAggregator::experience_score(&experience(4, 3)), 100.0);
        assert_eq!(ScoreAggregator::keywords_score(&vec!["a".to_string(); 20]), 100.0);
        assert_eq!(ScoreAggregator::sentiment_score(&sentiment(0.75, 0.5)), 62.5);
    }

    #[test]
    fn test_full_weighted_average() {
        let skills = vec![skill(0.8)];
        let read = readability(60.0);
        let exp = experience(1, 2);
        let keywords = vec!["agile".to_string(); 3];
        let sent = sentiment(0.75, 0.5);

        let result = ScoreAggregator::new(ScoringWeights::default()).aggregate(AggregateInputs {
            skills: Some(&skills),
            readability: Some(&read),
            experience: Some(&exp),
            keywords: Some(&keywords),
            sentiment: Some(&sent),
        });

        // 20 + 12 + 8 + 3.0015 + 12.5 = 55.5015
        assert_eq!(result.overall, 56.0);
        let total: f64 = result.breakdown.iter().map(|m| m.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_metric_renormalizes() {
        let read = readability(80.0);
        let exp = experience(0, 0);
        let keywords: Vec<String> = Vec::new();
        let sent = sentiment(0.75, 0.5);

        let result = ScoreAggregator::new(ScoringWeights::default()).aggregate(AggregateInputs {
            skills: None,
            readability: Some(&read),
            experience: Some(&exp),
            keywords: Some(&keywords),
            sentiment: Some(&sent),
        });

        // (0.2*80 + 0.2*0 + 0.15*0 + 0.2*62.5) / 0.75 = 38
        assert_eq!(result.overall, 38.0);
        let skills_entry = &result.breakdown[0];
        assert_eq!(skills_entry.sub_score, None);
        assert_eq!(skills_entry.weight, 0.0);
        let total: f64 = result.breakdown.iter().map(|m| m.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_computable_is_zero() {
        let result = ScoreAggregator::new(ScoringWeights::default()).aggregate(AggregateInputs {
            skills: None,
            readability: None,
            experience: None,
            keywords: None,
            sentiment: None,
        });

        assert_eq!(result.overall, 0.0);
    }

    #[test]
    fn test_stronger_mention_never_lowers_score() {
        let weights = ScoringWeights::default();
        let read = readability(70.0);
        let sent = sentiment(0.75, 0.6);
        let base = vec![skill(0.7), skill(0.8)];
        let stronger = vec![skill(0.8), skill(0.8)];

        let score = |skills: &[SkillEntity]| {
            ScoreAggregator::new(weights)
                .aggregate(AggregateInputs {
                    skills: Some(skills),
                    readability: Some(&read),
                    experience: None,
                    keywords: None,
                    sentiment: Some(&sent),
                })
                .overall
        };

        assert!(score(&stronger) >= score(&base));
    }

    #[test]
    fn test_skills_score_is_mean_confidence() {
        let strong = vec![skill(0.9)];
        let with_weaker = vec![skill(0.9), skill(0.7)];
        let with_equal = vec![skill(0.9), skill(0.9)];

        assert!((ScoreAggregator::skills_score(&strong) - 90.0).abs() < 1e-9);
        assert!((ScoreAggregator::skills_score(&with_weaker) - 80.0).abs() < 1e-9);
        assert!((ScoreAggregator::skills_score(&with_equal) - 90.0).abs() < 1e-9);
    }
}
