//! Readability statistics: Flesch Reading Ease, Gunning Fog and a combined score

use crate::processing::model::{clamp100, round1, ReadabilityMetrics};
use crate::processing::text_processor::NormalizedText;
use regex::Regex;

/// Fog values are mapped onto 0..100 over this span.
const FOG_SPAN: f64 = 30.0;

pub struct ReadabilityAnalyzer {
    vowel_group_regex: Regex,
}

impl Default for ReadabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadabilityAnalyzer {
    pub fn new() -> Self {
        Self {
            vowel_group_regex: Regex::new(r"(?i)[aeiouy]+").expect("Invalid vowel regex"),
        }
    }

    pub fn analyze(&self, text: &NormalizedText) -> ReadabilityMetrics {
        let word_count = text.word_count();
        let sentence_count = text.sentence_count();
        let words = word_count.max(1) as f64;
        let words_per_sentence = word_count as f64 / sentence_count as f64;

        let syllables = self.syllable_count(&text.cleaned) as f64;
        let flesch = clamp100(206.835 - 1.015 * words_per_sentence - 84.6 * (syllables / words));

        let complex_words = text
            .words
            .iter()
            .filter(|word| self.is_complex(word))
            .count() as f64;
        let fog = 0.4 * (words_per_sentence + 100.0 * complex_words / words);

        let score = clamp100(0.5 * Self::normalize_fog(100.0 - fog) + 0.5 * flesch);

        log::debug!(
            "Readability: {} words, {} sentences, {} syllables, flesch {:.1}, fog {:.1}",
            word_count,
            sentence_count,
            syllables,
            flesch,
            fog
        );

        ReadabilityMetrics {
            word_count,
            sentence_count,
            avg_sentence_length: round1(words_per_sentence),
            flesch_reading_ease: round1(flesch),
            gunning_fog_index: round1(fog),
            score: score.round(),
        }
    }

    /// Syllables approximated as maximal vowel runs
    pub fn syllable_count(&self, text: &str) -> usize {
        self.vowel_group_regex.find_iter(text).count()
    }

    pub fn is_complex(&self, word: &str) -> bool {
        word.chars().count() > 7 && self.syllable_count(word) >= 3
    }

    fn normalize_fog(value: f64) -> f64 {
        value.clamp(0.0, FOG_SPAN) / FOG_SPAN * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::TextProcessor;

    fn analyze(text: &str) -> ReadabilityMetrics {
        ReadabilityAnalyzer::new().analyze(&TextProcessor::new().process(text))
    }

    #[test]
    fn test_basic_counts() {
        let metrics = analyze("I build tools. They work well. People use them daily.");

        assert_eq!(metrics.word_count, 10);
        assert_eq!(metrics.sentence_count, 3);
        assert_eq!(metrics.avg_sentence_length, 3.3);
    }

    #[test]
    fn test_syllable_and_complex_words() {
        let analyzer = ReadabilityAnalyzer::new();

        assert_eq!(analyzer.syllable_count("beautiful"), 3);
        assert_eq!(analyzer.syllable_count("rhythm"), 1);
        assert!(analyzer.is_complex("communication"));
        assert!(!analyzer.is_complex("idea"));
        assert!(!analyzer.is_complex("strength"));
    }

    #[test]
    fn test_values_stay_in_range() {
        let dense = "Interdisciplinary organizational internationalization considerations \
                     notwithstanding institutionalized telecommunications infrastructure \
                     modernization responsibilities";
        let metrics = analyze(dense);

        assert!((0.0..=100.0).contains(&metrics.flesch_reading_ease));
        assert!((0.0..=100.0).contains(&metrics.score));
        assert!(metrics.gunning_fog_index > 10.0);
    }

    #[test]
    fn test_easy_text_scores_high() {
        let metrics = analyze("We ship code. We fix bugs. We help users.");

        assert_eq!(metrics.flesch_reading_ease, 100.0);
        assert_eq!(metrics.score, 100.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "Managed cross-functional delivery. Reduced costs by 20%.";
        assert_eq!(analyze(text), analyze(text));
    }
}
