//! ATS (Applicant Tracking System) keyword detection and match scoring

use crate::config::{DictionaryConfig, ScoringConfig};
use crate::error::{Result, ResumeScorerError};
use crate::inference::EmbeddingService;
use crate::processing::model::{clamp100, AtsMode, AtsScore, AtsTier, Derived, SkillGap};
use crate::processing::text_processor::NormalizedText;
use aho_corasick::AhoCorasick;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Points per detected keyword when no domain is known.
const POINTS_PER_KEYWORD: f64 = 6.67;

struct DomainRule {
    patterns: Vec<String>,
    keywords: Vec<String>,
}

/// Context for ATS scoring beyond the resume itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtsContext<'a> {
    pub job_title: Option<&'a str>,
    pub job_description: Option<&'a str>,
    pub skill_gap: Option<&'a SkillGap>,
}

pub struct ATSMatcher {
    domain_rules: Vec<DomainRule>,
    common_keywords: Vec<String>,
    max_keywords: usize,
    embedding: Option<Arc<dyn EmbeddingService>>,
    timeout: Duration,
}

impl ATSMatcher {
    pub fn new(dictionaries: &DictionaryConfig, scoring: &ScoringConfig) -> Self {
        let domain_rules = dictionaries
            .domain_rules
            .iter()
            .map(|rule| DomainRule {
                patterns: rule.patterns.iter().map(|p| p.to_lowercase()).collect(),
                keywords: rule.keywords.clone(),
            })
            .collect();

        Self {
            domain_rules,
            common_keywords: dictionaries.common_keywords.clone(),
            max_keywords: scoring.max_keywords,
            embedding: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_embedding_service(
        mut self,
        service: Arc<dyn EmbeddingService>,
        timeout: Duration,
    ) -> Self {
        self.embedding = Some(service);
        self.timeout = timeout;
        self
    }

    pub fn has_embedding_service(&self) -> bool {
        self.embedding.is_some()
    }

    /// False when neither the common nor any domain keyword list has entries.
    pub fn has_keywords(&self) -> bool {
        !self.common_keywords.is_empty() || self.domain_rules.iter().any(|r| !r.keywords.is_empty())
    }

    /// Domain keyword set for a job title; first matching rule wins.
    pub fn domain_keywords(&self, job_title: Option<&str>) -> &[String] {
        let Some(title) = job_title.map(str::trim).filter(|t| !t.is_empty()) else {
            return &[];
        };
        let title = title.to_lowercase();

        self.domain_rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| title.contains(p.as_str())))
            .map(|rule| rule.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Domain then common keywords found in the text, in dictionary order.
    pub fn detect_keywords(&self, text: &NormalizedText, job_title: Option<&str>) -> Vec<String> {
        let mut seen = HashSet::new();
        let dictionary: Vec<&String> = self
            .domain_keywords(job_title)
            .iter()
            .chain(self.common_keywords.iter())
            .filter(|k| !k.trim().is_empty() && seen.insert(k.to_lowercase()))
            .collect();

        let present = Self::present_in(&text.lowercase, &dictionary);
        let keywords: Vec<String> = dictionary
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| present.contains(idx))
            .map(|(_, k)| k.clone())
            .take(self.max_keywords)
            .collect();

        log::debug!("Detected {} keywords", keywords.len());
        keywords
    }

    /// Score from detected keywords against the job-title domain, or raw keyword count.
    pub fn keyword_overlap_score(
        &self,
        text: &NormalizedText,
        keywords: &[String],
        job_title: Option<&str>,
    ) -> AtsScore {
        let domain = self.domain_keywords(job_title);

        if domain.is_empty() {
            let score = clamp100((keywords.len() as f64 * POINTS_PER_KEYWORD).min(100.0)).round();
            return AtsScore {
                score,
                tier: AtsTier::from_score(score),
                mode: AtsMode::CommonKeywords,
                similarity: None,
                degraded: false,
                matched_keywords: keywords.to_vec(),
            };
        }

        let domain_refs: Vec<&String> = domain.iter().collect();
        let present = Self::present_in(&text.lowercase, &domain_refs);
        let matched: Vec<String> = domain
            .iter()
            .enumerate()
            .filter(|(idx, _)| present.contains(idx))
            .map(|(_, k)| k.clone())
            .collect();

        let score =
            clamp100((matched.len() as f64 / domain.len() as f64 * 100.0).min(100.0)).round();
        AtsScore {
            score,
            tier: AtsTier::from_score(score),
            mode: AtsMode::JobTitleKeywords,
            similarity: None,
            degraded: false,
            matched_keywords: matched,
        }
    }

    /// Share of a role's required skills that were matched.
    pub fn skill_list_score(&self, gap: &SkillGap) -> AtsScore {
        let score = if gap.required_skills.is_empty() {
            0.0
        } else {
            clamp100(gap.matched.len() as f64 / gap.required_skills.len() as f64 * 100.0).round()
        };

        AtsScore {
            score,
            tier: AtsTier::from_score(score),
            mode: AtsMode::SkillList,
            similarity: None,
            degraded: false,
            matched_keywords: gap.matched.clone(),
        }
    }

    pub async fn semantic_score(&self, resume: &str, job_description: &str) -> Result<AtsScore> {
        let service = self.embedding.as_ref().ok_or_else(|| {
            ResumeScorerError::ExternalService("no embedding service configured".to_string())
        })?;

        let texts = vec![resume.to_string(), job_description.to_string()];
        let vectors = tokio::time::timeout(self.timeout, service.embed(&texts))
            .await
            .map_err(|_| {
                ResumeScorerError::ExternalService(format!(
                    "embedding request timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        let [resume_vec, job_vec] = vectors.as_slice() else {
            return Err(ResumeScorerError::ExternalService(format!(
                "expected 2 embeddings, got {}",
                vectors.len()
            )));
        };
        let similarity = cosine_similarity(resume_vec, job_vec)?;

        Ok(AtsScore {
            score: clamp100((similarity * 100.0).round()),
            tier: AtsTier::from_similarity(similarity),
            mode: AtsMode::Semantic,
            similarity: Some(similarity),
            degraded: false,
            matched_keywords: Vec::new(),
        })
    }

    /// Semantic when a job description is given, local modes otherwise or on failure.
    pub async fn score(
        &self,
        text: &NormalizedText,
        keywords: &[String],
        context: AtsContext<'_>,
    ) -> Derived<AtsScore> {
        let job_description = context
            .job_description
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let Some(job_description) = job_description else {
            return Derived::heuristic(self.local_score(text, keywords, context));
        };

        match self.semantic_score(&text.cleaned, job_description).await {
            Ok(score) => Derived::Inferred(score),
            Err(e) => {
                log::warn!("Semantic ATS scoring unavailable, using keyword overlap: {}", e);
                let mut score = self.local_score(text, keywords, context);
                score.degraded = true;
                Derived::fallback(score, e.to_string())
            }
        }
    }

    fn local_score(
        &self,
        text: &NormalizedText,
        keywords: &[String],
        context: AtsContext<'_>,
    ) -> AtsScore {
        match context.skill_gap {
            Some(gap) => self.skill_list_score(gap),
            None => self.keyword_overlap_score(text, keywords, context.job_title),
        }
    }

    /// Indices of `terms` occurring as substrings of `lowercase`.
    fn present_in(lowercase: &str, terms: &[&String]) -> HashSet<usize> {
        let patterns: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        if patterns.is_empty() {
            return HashSet::new();
        }

        match AhoCorasick::new(&patterns) {
            Ok(matcher) => matcher
                .find_overlapping_iter(lowercase)
                .map(|m| m.pattern().as_usize())
                .collect(),
            Err(e) => {
                log::warn!("Keyword automaton failed to build, scanning linearly: {}", e);
                patterns
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| lowercase.contains(p.as_str()))
                    .map(|(idx, _)| idx)
                    .collect()
            }
        }
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ResumeScorerError::ExternalService(format!(
            "embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot / (norm_a * norm_b))
    }
}
