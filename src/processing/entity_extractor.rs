//! Dictionary- and pattern-based extraction of skills, experience and named entities

use crate::config::{DictionaryConfig, ScoringConfig};
use crate::error::{Result, ResumeScorerError};
use crate::processing::model::{ExperienceEntity, SkillCategory, SkillEntity};
use crate::processing::text_processor::NormalizedText;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

const BASE_CONFIDENCE: f64 = 0.6;
const CONFIDENCE_PER_MENTION: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;
const MAX_CERTIFICATIONS: usize = 10;
const MAX_TOOLS: usize = 20;

struct SkillPattern {
    skill: String,
    category: SkillCategory,
    regex: Regex,
}

pub struct EntityExtractor {
    skill_patterns: Vec<SkillPattern>,
    certifications: Vec<String>,
    tools: Vec<String>,
    role_regex: Regex,
    company_regex: Regex,
    duration_regex: Regex,
    title_suffix_regex: Regex,
    max_experience: usize,
    context_window: usize,
}

/// Skills found in a resume. `computable` is false when there was nothing to match against.
#[derive(Debug, Clone)]
pub struct SkillExtraction {
    pub skills: Vec<SkillEntity>,
    pub computable: bool,
}

enum ParseState {
    Idle,
    InRole(ExperienceEntity),
}

impl EntityExtractor {
    pub fn new(dictionaries: &DictionaryConfig, scoring: &ScoringConfig) -> Result<Self> {
        let mut skill_patterns = Vec::new();
        let categorized = dictionaries
            .technical_skills
            .iter()
            .map(|s| (s, SkillCategory::Technical))
            .chain(
                dictionaries
                    .soft_skills
                    .iter()
                    .map(|s| (s, SkillCategory::SoftSkill)),
            );

        for (skill, category) in categorized {
            let skill = skill.trim();
            if skill.is_empty() {
                continue;
            }
            // Single letters (R) only count as standalone capitalized words.
            let single_letter = skill.chars().count() == 1;
            let pattern = if single_letter {
                format!(r"\b{}\b", regex::escape(skill))
            } else {
                regex::escape(skill)
            };
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(!single_letter)
                .build()
                .map_err(|e| {
                    ResumeScorerError::Configuration(format!("Invalid skill term '{}': {}", skill, e))
                })?;
            skill_patterns.push(SkillPattern {
                skill: skill.to_string(),
                category,
                regex,
            });
        }

        let role_regex = Regex::new(
            r"(?i)^(?:(?:senior|lead|junior|principal|staff)\s+)?(?:engineer|developer|manager|designer|analyst|consultant|administrator|architect)s?\b",
        )
        .expect("Invalid role regex");
        let company_regex = Regex::new(r" at ([A-Z][^|,(]*)").expect("Invalid company regex");
        let duration_regex = Regex::new(r"(?i)\b(\d{4})\s*[-–]\s*(present|\d{4})\b")
            .expect("Invalid duration regex");
        let title_suffix_regex = Regex::new(r"\s*\|.*$").expect("Invalid title regex");

        Ok(Self {
            skill_patterns,
            certifications: dictionaries.certifications.clone(),
            tools: dictionaries.tools.clone(),
            role_regex,
            company_regex,
            duration_regex,
            title_suffix_regex,
            max_experience: scoring.max_experience,
            context_window: scoring.context_window,
        })
    }

    /// Technical skills first, then soft skills, each in dictionary order.
    pub fn extract_skills(&self, text: &NormalizedText) -> SkillExtraction {
        let haystack = text.cleaned.as_str();
        let mut skills = Vec::new();

        for pattern in &self.skill_patterns {
            let mut matches = pattern.regex.find_iter(haystack);
            let Some(first) = matches.next() else {
                continue;
            };
            let occurrences = 1 + matches.count();
            let confidence = (BASE_CONFIDENCE + CONFIDENCE_PER_MENTION * occurrences as f64)
                .min(MAX_CONFIDENCE);

            skills.push(SkillEntity {
                skill: pattern.skill.clone(),
                confidence: (confidence * 100.0).round() / 100.0,
                category: pattern.category,
                context: self.context_around(haystack, first.start(), first.end()),
            });
        }

        log::debug!(
            "Extracted {} skills from {} dictionary terms",
            skills.len(),
            self.skill_patterns.len()
        );

        SkillExtraction {
            skills,
            computable: !self.skill_patterns.is_empty(),
        }
    }

    pub fn extract_experience(&self, text: &NormalizedText) -> Vec<ExperienceEntity> {
        let mut experiences = Vec::new();
        let mut state = ParseState::Idle;

        for line in text.lines() {
            if self.is_role_line(line) {
                if let ParseState::InRole(open) = state {
                    experiences.push(open);
                }
                state = ParseState::InRole(self.open_role(line));
            } else if let Some(achievement) = Self::achievement_text(line) {
                if let ParseState::InRole(open) = &mut state {
                    open.achievements.push(achievement.to_string());
                }
            }
        }

        if let ParseState::InRole(open) = state {
            experiences.push(open);
        }

        experiences.truncate(self.max_experience);
        experiences
    }

    /// Certifications and tools mentioned anywhere in the text.
    pub fn extract_entities(&self, text: &NormalizedText) -> BTreeMap<String, Vec<String>> {
        let present = |terms: &[String], cap: usize| -> Vec<String> {
            terms
                .iter()
                .filter(|term| text.lowercase.contains(&term.to_lowercase()))
                .take(cap)
                .cloned()
                .collect()
        };

        let mut entities = BTreeMap::new();
        entities.insert(
            "certifications".to_string(),
            present(&self.certifications, MAX_CERTIFICATIONS),
        );
        entities.insert("tools".to_string(), present(&self.tools, MAX_TOOLS));
        entities
    }

    pub fn is_role_line(&self, line: &str) -> bool {
        self.role_regex.is_match(line)
    }

    pub fn is_achievement_line(line: &str) -> bool {
        Self::achievement_text(line).is_some()
    }

    fn achievement_text(line: &str) -> Option<&str> {
        line.strip_prefix('-')
            .or_else(|| line.strip_prefix('•'))
            .map(str::trim_start)
    }

    fn open_role(&self, raw: &str) -> ExperienceEntity {
        let duration = self.duration_regex.captures(raw);
        let (duration_text, start_date, end_date) = match &duration {
            Some(caps) => (
                caps[0].to_string(),
                Some(caps[1].to_string()),
                Some(caps[2].to_string()),
            ),
            None => (String::new(), None, None),
        };

        // Title and company never extend into a `| ...` suffix.
        let line = self.title_suffix_regex.replace(raw, "");
        let line = line.trim();

        let company = self
            .company_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| self.strip_duration(m.as_str()))
            .unwrap_or_default();

        let title_end = line
            .find(" at ")
            .or_else(|| self.duration_regex.find(line).map(|m| m.start()))
            .unwrap_or(line.len());
        let title = line[..title_end]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | ','))
            .to_string();

        ExperienceEntity {
            title,
            company,
            duration: duration_text,
            start_date,
            end_date,
            achievements: Vec::new(),
        }
    }

    fn strip_duration(&self, candidate: &str) -> String {
        let end = self
            .duration_regex
            .find(candidate)
            .map(|m| m.start())
            .unwrap_or(candidate.len());
        candidate[..end]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | ','))
            .to_string()
    }

    fn context_around(&self, text: &str, start: usize, end: usize) -> String {
        let from = text[..start]
            .grapheme_indices(true)
            .rev()
            .take(self.context_window)
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(start);
        let to = text[end..]
            .grapheme_indices(true)
            .nth(self.context_window)
            .map(|(idx, _)| end + idx)
            .unwrap_or(text.len());
        text[from..to].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::TextProcessor;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(&DictionaryConfig::default(), &ScoringConfig::default()).unwrap()
    }

    fn normalized(text: &str) -> NormalizedText {
        TextProcessor::new().process(text)
    }

    #[test]
    fn test_repeated_mentions_raise_confidence() {
        let dictionaries = DictionaryConfig {
            technical_skills: vec!["JavaScript".to_string(), "React".to_string()],
            soft_skills: vec![],
            ..DictionaryConfig::default()
        };
        let extractor = EntityExtractor::new(&dictionaries, &ScoringConfig::default()).unwrap();
        let result = extractor.extract_skills(&normalized("JavaScript JavaScript React"));

        assert!(result.computable);
        assert_eq!(result.skills.len(), 2);
        assert_eq!(result.skills[0].skill, "JavaScript");
        assert_eq!(result.skills[0].confidence, 0.8);
        assert_eq!(result.skills[0].category, SkillCategory::Technical);
        assert_eq!(result.skills[1].skill, "React");
        assert_eq!(result.skills[1].confidence, 0.7);
    }

    #[test]
    fn test_confidence_capped() {
        let result = extractor().extract_skills(&normalized("docker docker docker docker docker"));
        let docker = result.skills.iter().find(|s| s.skill == "Docker").unwrap();

        assert_eq!(docker.confidence, 0.95);
    }

    #[test]
    fn test_soft_skill_category_and_context() {
        let text = "I enjoy mentoring junior colleagues and value clear communication.";
        let result = extractor().extract_skills(&normalized(text));
        let mentoring = result.skills.iter().find(|s| s.skill == "Mentoring").unwrap();

        assert_eq!(mentoring.category, SkillCategory::SoftSkill);
        assert!(mentoring.context.contains("mentoring junior"));
        assert!(mentoring.context.chars().count() <= 40 + "mentoring".len() + 40);
    }

    #[test]
    fn test_empty_dictionaries_not_computable() {
        let dictionaries = DictionaryConfig {
            technical_skills: vec![],
            soft_skills: vec![],
            ..DictionaryConfig::default()
        };
        let extractor = EntityExtractor::new(&dictionaries, &ScoringConfig::default()).unwrap();
        let result = extractor.extract_skills(&normalized("Rust and Python"));

        assert!(!result.computable);
        assert!(result.skills.is_empty());
    }

    #[test]
    fn test_single_experience_entry() {
        let text = "Senior Developer at Acme Corp 2020-Present\n- Led a team of 5\n- Improved performance by 40%";
        let experience = extractor().extract_experience(&normalized(text));

        assert_eq!(experience.len(), 1);
        let entry = &experience[0];
        assert_eq!(entry.title, "Senior Developer");
        assert_eq!(entry.company, "Acme Corp");
        assert_eq!(entry.duration, "2020-Present");
        assert_eq!(entry.start_date.as_deref(), Some("2020"));
        assert_eq!(entry.end_date.as_deref(), Some("Present"));
        assert_eq!(
            entry.achievements,
            vec!["Led a team of 5", "Improved performance by 40%"]
        );
    }

    #[test]
    fn test_bullets_before_any_role_are_ignored() {
        let text = "- Orphan bullet\nDesigner at Studio | 2018-2020\n• Rebranded product";
        let experience = extractor().extract_experience(&normalized(text));

        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].title, "Designer");
        assert_eq!(experience[0].company, "Studio");
        assert_eq!(experience[0].duration, "2018-2020");
        assert_eq!(experience[0].end_date.as_deref(), Some("2020"));
        assert_eq!(experience[0].achievements, vec!["Rebranded product"]);
    }

    #[test]
    fn test_experience_capped_in_order() {
        let text: String = (0..10)
            .map(|i| format!("Engineer at Company{} 20{:02}-20{:02}\n", i, i, i + 1))
            .collect();
        let experience = extractor().extract_experience(&normalized(&text));

        assert_eq!(experience.len(), 8);
        assert_eq!(experience[0].company, "Company0");
        assert_eq!(experience[7].company, "Company7");
    }

    #[test]
    fn test_no_matches_yields_empty() {
        let experience = extractor().extract_experience(&normalized("Hobbies: chess, hiking"));
        assert!(experience.is_empty());
    }

    #[test]
    fn test_line_predicates() {
        let extractor = extractor();
        assert!(extractor.is_role_line("lead engineer at Initech"));
        assert!(!extractor.is_role_line("Software Engineer at Initech"));
        assert!(EntityExtractor::is_achievement_line("- did things"));
        assert!(EntityExtractor::is_achievement_line("• did things"));
        assert!(!EntityExtractor::is_achievement_line("did things"));
    }

    #[test]
    fn test_role_noun_must_be_whole_word() {
        let text = "Engineer at Initech 2015-2017\n\
            - Maintained schemas\n\
            Engineered the billing platform rewrite\n\
            - Cut invoice errors in half";
        let experience = extractor().extract_experience(&normalized(text));

        assert_eq!(experience.len(), 1);
        assert_eq!(
            experience[0].achievements,
            vec!["Maintained schemas", "Cut invoice errors in half"]
        );
        assert!(extractor().is_role_line("Engineers at Initech"));
        assert!(!extractor().is_role_line("Developed internal tooling"));
    }

    #[test]
    fn test_single_letter_skill_needs_standalone_word() {
        let extractor = extractor();
        let listed = extractor.extract_skills(&normalized("Statistics in R and Python"));
        let prose = extractor.extract_skills(&normalized("Rust services are running fine"));

        assert!(listed.skills.iter().any(|s| s.skill == "R"));
        assert!(!prose.skills.iter().any(|s| s.skill == "R"));
    }

    #[test]
    fn test_entities() {
        let text = "AWS Certified architect using Jira and Figma daily";
        let entities = extractor().extract_entities(&normalized(text));

        assert_eq!(entities["certifications"], vec!["AWS Certified"]);
        assert_eq!(entities["tools"], vec!["Jira", "Figma"]);
    }
}
