//! Tone and positivity scoring with an optional external classifier

use crate::config::DictionaryConfig;
use crate::error::{Result, ResumeScorerError};
use crate::inference::{SentimentPrediction, SentimentService};
use crate::processing::model::{clamp01, Derived, SentimentResult, Tone};
use crate::processing::text_processor::NormalizedText;
use aho_corasick::AhoCorasick;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Fixed confidence reported by the lexicon path.
pub const HEURISTIC_CONFIDENCE: f64 = 0.75;

struct Lexicon {
    matcher: Option<AhoCorasick>,
    size: usize,
}

impl Lexicon {
    fn new(words: &[String]) -> Result<Self> {
        let patterns: Vec<String> = words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(Self { matcher: None, size: 0 });
        }

        let matcher = AhoCorasick::new(&patterns).map_err(|e| {
            ResumeScorerError::Configuration(format!("Failed to build sentiment lexicon: {}", e))
        })?;
        Ok(Self {
            matcher: Some(matcher),
            size: patterns.len(),
        })
    }

    /// Total occurrences and number of distinct lexicon words seen.
    fn count(&self, lowercase: &str) -> (usize, usize) {
        let Some(matcher) = &self.matcher else {
            return (0, 0);
        };
        let mut distinct = HashSet::new();
        let mut total = 0;
        for mat in matcher.find_overlapping_iter(lowercase) {
            total += 1;
            distinct.insert(mat.pattern());
        }
        (total, distinct.len())
    }

    fn share(&self, distinct: usize) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            clamp01(distinct as f64 / self.size as f64)
        }
    }
}

pub struct SentimentAnalyzer {
    positive: Lexicon,
    negative: Lexicon,
    service: Option<Arc<dyn SentimentService>>,
    timeout: Duration,
}

impl SentimentAnalyzer {
    pub fn new(dictionaries: &DictionaryConfig) -> Result<Self> {
        Ok(Self {
            positive: Lexicon::new(&dictionaries.positive_words)?,
            negative: Lexicon::new(&dictionaries.negative_words)?,
            service: None,
            timeout: Duration::from_secs(10),
        })
    }

    pub fn with_service(mut self, service: Arc<dyn SentimentService>, timeout: Duration) -> Self {
        self.service = Some(service);
        self.timeout = timeout;
        self
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Classifier result when reachable, lexicon result otherwise.
    pub async fn analyze(&self, text: &NormalizedText) -> Derived<SentimentResult> {
        let Some(service) = &self.service else {
            return Derived::heuristic(self.heuristic(text));
        };

        let outcome = match tokio::time::timeout(self.timeout, service.classify(&text.cleaned)).await
        {
            Ok(Ok(prediction)) if prediction.score.is_finite() => Ok(prediction),
            Ok(Ok(prediction)) => Err(format!("non-numeric score for label {}", prediction.label)),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}ms", self.timeout.as_millis())),
        };

        match outcome {
            Ok(prediction) => Derived::Inferred(Self::from_prediction(&prediction)),
            Err(reason) => {
                log::warn!("Sentiment service unavailable, using lexicon: {}", reason);
                Derived::fallback(self.heuristic(text), reason)
            }
        }
    }

    pub fn heuristic(&self, text: &NormalizedText) -> SentimentResult {
        let (positive_total, positive_distinct) = self.positive.count(&text.lowercase);
        let (negative_total, negative_distinct) = self.negative.count(&text.lowercase);

        let positivity =
            clamp01((positive_total as f64 - negative_total as f64 + 10.0) / 20.0);
        let tone = if positivity > 0.6 {
            Tone::Confident
        } else if positivity < 0.4 {
            Tone::Modest
        } else {
            Tone::Professional
        };

        let mut emotions = BTreeMap::new();
        emotions.insert("achievement".to_string(), self.positive.share(positive_distinct));
        emotions.insert("concern".to_string(), self.negative.share(negative_distinct));

        SentimentResult {
            tone,
            confidence: HEURISTIC_CONFIDENCE,
            positivity,
            emotions,
        }
    }

    pub fn from_prediction(prediction: &SentimentPrediction) -> SentimentResult {
        let score = clamp01(prediction.score);
        let (tone, positivity) = if prediction.is_positive() {
            (Tone::Confident, score)
        } else {
            (Tone::Professional, clamp01(1.0 - score))
        };

        let mut emotions = BTreeMap::new();
        emotions.insert(prediction.label.to_lowercase(), score);

        SentimentResult {
            tone,
            confidence: score,
            positivity,
            emotions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::TextProcessor;
    use async_trait::async_trait;

    struct FixedService(Result<SentimentPrediction>);

    #[async_trait]
    impl SentimentService for FixedService {
        async fn classify(&self, _text: &str) -> Result<SentimentPrediction> {
            match &self.0 {
                Ok(p) => Ok(p.clone()),
                Err(e) => Err(ResumeScorerError::ExternalService(e.to_string())),
            }
        }
    }

    fn normalized(text: &str) -> NormalizedText {
        TextProcessor::new().process(text)
    }

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(&DictionaryConfig::default()).unwrap()
    }

    #[test]
    fn test_neutral_text_is_professional() {
        let result = analyzer().heuristic(&normalized("Worked on a web application."));

        assert_eq!(result.positivity, 0.5);
        assert_eq!(result.tone, Tone::Professional);
        assert_eq!(result.confidence, HEURISTIC_CONFIDENCE);
    }

    #[test]
    fn test_positive_words_raise_positivity() {
        let text = "Improved latency, optimized queries, delivered features, \
                    increased revenue and launched the product successfully.";
        let result = analyzer().heuristic(&normalized(text));

        assert!(result.positivity > 0.6);
        assert_eq!(result.tone, Tone::Confident);
        assert!(result.emotions["achievement"] > 0.5);
    }

    #[test]
    fn test_negative_words_lower_positivity() {
        let text = "Failed release, issue backlog, problem tickets, blocked work, \
                    delay after delay, another issue and another problem.";
        let result = analyzer().heuristic(&normalized(text));

        assert!(result.positivity < 0.4);
        assert_eq!(result.tone, Tone::Modest);
        assert!(result.emotions["concern"] > 0.0);
    }

    #[test]
    fn test_positivity_clamped() {
        let text = "achieved ".repeat(50);
        let result = analyzer().heuristic(&normalized(&text));

        assert_eq!(result.positivity, 1.0);
    }

    #[tokio::test]
    async fn test_no_service_is_plain_heuristic() {
        let result = analyzer().analyze(&normalized("Led the team.")).await;

        assert!(!result.is_inferred());
        assert_eq!(result.fallback_reason(), None);
    }

    #[tokio::test]
    async fn test_positive_prediction_maps_to_confident() {
        let service = FixedService(Ok(SentimentPrediction {
            label: "POSITIVE".to_string(),
            score: 0.92,
        }));
        let analyzer = analyzer().with_service(Arc::new(service), Duration::from_secs(1));
        let result = analyzer.analyze(&normalized("Led the team.")).await;

        assert!(result.is_inferred());
        let value = result.value();
        assert_eq!(value.tone, Tone::Confident);
        assert_eq!(value.confidence, 0.92);
        assert_eq!(value.positivity, 0.92);
    }

    #[tokio::test]
    async fn test_negative_prediction_maps_to_professional() {
        let service = FixedService(Ok(SentimentPrediction {
            label: "NEGATIVE".to_string(),
            score: 0.8,
        }));
        let analyzer = analyzer().with_service(Arc::new(service), Duration::from_secs(1));
        let result = analyzer.analyze(&normalized("Worked there.")).await;

        let value = result.value();
        assert_eq!(value.tone, Tone::Professional);
        assert!((value.positivity - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_service_error_falls_back() {
        let service = FixedService(Err(ResumeScorerError::ExternalService("503".to_string())));
        let analyzer = analyzer().with_service(Arc::new(service), Duration::from_secs(1));
        let result = analyzer.analyze(&normalized("Improved things.")).await;

        assert!(!result.is_inferred());
        assert!(result.fallback_reason().unwrap().contains("503"));
        assert_eq!(result.value().confidence, HEURISTIC_CONFIDENCE);
    }
}
