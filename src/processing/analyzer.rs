//! Main analysis engine combining extraction, readability, sentiment and ATS scoring

use crate::config::{Config, RoleDefinition};
use crate::error::{Result, ResumeScorerError};
use crate::inference::{EmbeddingService, HttpEmbeddingClient, HttpSentimentClient, SentimentService};
use crate::processing::aggregator::{AggregateInputs, ScoreAggregator};
use crate::processing::ats_matcher::{ATSMatcher, AtsContext};
use crate::processing::entity_extractor::EntityExtractor;
use crate::processing::model::{AtsMode, DegradedMetric, Derived, Metric, ResumeAnalysis, SkillGap};
use crate::processing::readability::ReadabilityAnalyzer;
use crate::processing::sentiment::SentimentAnalyzer;
use crate::processing::skill_gap::SkillGapAnalyzer;
use crate::processing::text_processor::TextProcessor;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One analysis invocation's inputs.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub role: Option<RoleDefinition>,
}

impl AnalysisRequest {
    pub fn new(resume_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            ..Default::default()
        }
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    pub fn with_job_description(mut self, job_description: impl Into<String>) -> Self {
        self.job_description = Some(job_description.into());
        self
    }

    pub fn with_role(mut self, role: RoleDefinition) -> Self {
        self.role = Some(role);
        self
    }
}

/// Coordinates all analysis components.
///
/// Holds only read-only dictionaries and client handles, so one instance can
/// serve concurrent analyses.
pub struct AnalysisEngine {
    text_processor: TextProcessor,
    entity_extractor: EntityExtractor,
    readability: ReadabilityAnalyzer,
    sentiment: SentimentAnalyzer,
    ats_matcher: ATSMatcher,
    aggregator: ScoreAggregator,
    skill_gap: SkillGapAnalyzer,
}

impl AnalysisEngine {
    /// Build an engine with explicitly injected external collaborators.
    pub fn new(
        config: &Config,
        sentiment_service: Option<Arc<dyn SentimentService>>,
        embedding_service: Option<Arc<dyn EmbeddingService>>,
    ) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.services.timeout_ms);

        let mut sentiment = SentimentAnalyzer::new(&config.dictionaries)?;
        if let Some(service) = sentiment_service {
            sentiment = sentiment.with_service(service, timeout);
        }

        let mut ats_matcher = ATSMatcher::new(&config.dictionaries, &config.scoring);
        if let Some(service) = embedding_service {
            ats_matcher = ats_matcher.with_embedding_service(service, timeout);
        }

        Ok(Self {
            text_processor: TextProcessor::new(),
            entity_extractor: EntityExtractor::new(&config.dictionaries, &config.scoring)?,
            readability: ReadabilityAnalyzer::new(),
            sentiment,
            ats_matcher,
            aggregator: ScoreAggregator::new(config.scoring.weights),
            skill_gap: SkillGapAnalyzer::new(
                config.roles.clone(),
                config.scoring.matched_threshold,
            ),
        })
    }

    /// Build an engine using the HTTP endpoints named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = &config.services;
        let timeout = Duration::from_millis(services.timeout_ms);
        let token = services.api_token.clone();

        let sentiment: Option<Arc<dyn SentimentService>> = match &services.sentiment_url {
            Some(url) => {
                log::info!("Using sentiment endpoint {}", url);
                Some(Arc::new(HttpSentimentClient::new(url, token.clone(), timeout)?))
            }
            None => None,
        };
        let embedding: Option<Arc<dyn EmbeddingService>> = match &services.embedding_url {
            Some(url) => {
                log::info!("Using embedding endpoint {}", url);
                Some(Arc::new(HttpEmbeddingClient::new(url, token, timeout)?))
            }
            None => None,
        };

        Self::new(config, sentiment, embedding)
    }

    /// Local heuristics only.
    pub fn offline(config: &Config) -> Result<Self> {
        Self::new(config, None, None)
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        self.skill_gap.roles()
    }

    pub fn find_role(&self, name: &str) -> Result<&RoleDefinition> {
        self.skill_gap.find_role(name)
    }

    /// Run the full pipeline on one resume.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ResumeAnalysis> {
        if request.resume_text.trim().is_empty() {
            return Err(ResumeScorerError::EmptyInput);
        }
        let start_time = Instant::now();

        let text = self.text_processor.process(&request.resume_text);
        let job_title = request.job_title.as_deref();

        let extraction = self.entity_extractor.extract_skills(&text);
        let experience = self.entity_extractor.extract_experience(&text);
        let entities = self.entity_extractor.extract_entities(&text);
        let readability = self.readability.analyze(&text);
        let keywords = self.ats_matcher.detect_keywords(&text, job_title);
        let skill_gap = request
            .role
            .as_ref()
            .map(|role| self.skill_gap.analyze(&extraction.skills, role));

        let context = AtsContext {
            job_title,
            job_description: request.job_description.as_deref(),
            skill_gap: skill_gap.as_ref(),
        };
        let (sentiment, ats) = tokio::join!(
            self.sentiment.analyze(&text),
            self.ats_matcher.score(&text, &keywords, context)
        );

        let mut degraded = Vec::new();
        Self::note_fallback(&mut degraded, Metric::Sentiment, &sentiment);
        Self::note_fallback(&mut degraded, Metric::Ats, &ats);

        let sentiment = sentiment.into_value();
        let aggregate = self.aggregator.aggregate(AggregateInputs {
            skills: extraction.computable.then_some(extraction.skills.as_slice()),
            readability: (readability.word_count > 0).then_some(&readability),
            experience: Some(&experience),
            keywords: self.ats_matcher.has_keywords().then_some(keywords.as_slice()),
            sentiment: Some(&sentiment),
        });

        log::info!(
            "Analysis completed in {}ms: overall {:.0}, {} skills, {} roles",
            start_time.elapsed().as_millis(),
            aggregate.overall,
            extraction.skills.len(),
            experience.len()
        );

        Ok(ResumeAnalysis {
            skills: extraction.skills,
            experience,
            sentiment,
            readability,
            keywords,
            entities,
            ats_score: Some(ats.into_value()),
            skill_gap,
            overall_score: aggregate.overall,
            score_breakdown: aggregate.breakdown,
            degraded,
        })
    }

    /// Re-target an existing analysis at another role without re-running extraction.
    pub fn with_role(&self, analysis: &ResumeAnalysis, role: &RoleDefinition) -> ResumeAnalysis {
        let gap = self.skill_gap.analyze(&analysis.skills, role);

        let keep_semantic = matches!(
            &analysis.ats_score,
            Some(ats) if ats.mode == AtsMode::Semantic && !ats.degraded
        );
        let ats_score = if keep_semantic {
            analysis.ats_score.clone()
        } else {
            let mut score = self.ats_matcher.skill_list_score(&gap);
            score.degraded = analysis.ats_score.as_ref().is_some_and(|a| a.degraded);
            Some(score)
        };

        ResumeAnalysis {
            ats_score,
            skill_gap: Some(gap),
            ..analysis.clone()
        }
    }

    /// Skill gap for a resume against a named role.
    pub fn analyze_gap(&self, resume_text: &str, role_name: &str) -> Result<SkillGap> {
        if resume_text.trim().is_empty() {
            return Err(ResumeScorerError::EmptyInput);
        }
        let role = self.find_role(role_name)?;
        let text = self.text_processor.process(resume_text);
        let extraction = self.entity_extractor.extract_skills(&text);
        Ok(self.skill_gap.analyze(&extraction.skills, role))
    }

    fn note_fallback<T>(degraded: &mut Vec<DegradedMetric>, metric: Metric, result: &Derived<T>) {
        if let Some(reason) = result.fallback_reason() {
            degraded.push(DegradedMetric {
                metric,
                reason: reason.to_string(),
            });
        }
    }
}
