//! Configuration management for the resume scorer

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dictionaries: DictionaryConfig,
    pub roles: Vec<RoleDefinition>,
    pub scoring: ScoringConfig,
    pub services: ServiceConfig,
    pub output: OutputConfig,
}

/// Term lists driving extraction, keyword detection and the sentiment lexicon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub common_keywords: Vec<String>,
    pub domain_rules: Vec<DomainRule>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub certifications: Vec<String>,
    pub tools: Vec<String>,
}

/// Selects a domain keyword set when the job title contains any of `patterns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub patterns: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
    pub role: String,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub max_keywords: usize,
    pub max_experience: usize,
    pub matched_threshold: f64,
    pub context_window: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub readability: f64,
    pub experience: f64,
    pub keywords: f64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub sentiment_url: Option<String>,
    pub embedding_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            technical_skills: strings(&[
                "JavaScript", "TypeScript", "React", "Next.js", "Node.js", "Express", "Python",
                "Django", "Flask", "Java", "Spring", "C#", ".NET", "Go", "Rust", "C++", "HTML",
                "CSS", "Tailwind", "Sass", "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis",
                "GraphQL", "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Terraform", "Ansible",
                "Git", "GitHub", "GitLab", "Jest", "Cypress", "Playwright", "Redux", "REST API",
                "R", "Pandas", "NumPy", "Machine Learning", "TensorFlow", "Linux", "CI/CD",
            ]),
            soft_skills: strings(&[
                "Communication", "Leadership", "Teamwork", "Problem Solving", "Time Management",
                "Collaboration", "Mentoring", "Presentation", "Stakeholder Management",
                "Critical Thinking", "Adaptability",
            ]),
            common_keywords: strings(&[
                "project management", "leadership", "data analysis", "agile", "scrum", "api",
                "microservices", "cloud", "aws", "azure", "gcp", "docker", "kubernetes", "cicd",
                "graphql", "rest", "testing", "unit tests", "integration tests", "performance",
                "security", "devops", "frontend", "backend", "full stack", "database", "sql",
                "nosql",
            ]),
            domain_rules: vec![
                DomainRule {
                    patterns: strings(&["data"]),
                    keywords: strings(&[
                        "python", "pandas", "numpy", "sql", "machine learning", "statistics",
                        "model", "dashboard",
                    ]),
                },
                DomainRule {
                    patterns: strings(&["frontend", "react"]),
                    keywords: strings(&[
                        "react", "javascript", "typescript", "html", "css", "webpack", "vite",
                        "testing",
                    ]),
                },
                DomainRule {
                    patterns: strings(&["backend", "node"]),
                    keywords: strings(&[
                        "node.js", "api", "rest", "graphql", "database", "microservices",
                        "authentication",
                    ]),
                },
                DomainRule {
                    patterns: strings(&["devops"]),
                    keywords: strings(&[
                        "docker", "kubernetes", "ci/cd", "terraform", "ansible", "monitoring",
                        "observability",
                    ]),
                },
                DomainRule {
                    patterns: strings(&["cloud"]),
                    keywords: strings(&[
                        "aws", "azure", "gcp", "iam", "s3", "ec2", "cloudformation",
                    ]),
                },
            ],
            positive_words: strings(&[
                "improved", "optimized", "led", "delivered", "increased", "reduced", "achieved",
                "successfully", "launched",
            ]),
            negative_words: strings(&["failed", "issue", "problem", "blocked", "delay"]),
            certifications: strings(&[
                "AWS Certified", "Azure Fundamentals", "PMP", "Scrum Master", "OCI", "CKA", "CKAD",
            ]),
            tools: strings(&[
                "Jira", "Confluence", "Figma", "Postman", "VS Code", "IntelliJ", "PyCharm",
                "Jenkins", "CircleCI", "GitHub Actions",
            ]),
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.25,
            readability: 0.20,
            experience: 0.20,
            keywords: 0.15,
            sentiment: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.readability + self.experience + self.keywords + self.sentiment
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_keywords: 40,
            max_experience: 8,
            matched_threshold: 0.7,
            context_window: 40,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sentiment_url: None,
            embedding_url: None,
            api_token: None,
            timeout_ms: 10_000,
        }
    }
}

pub fn default_roles() -> Vec<RoleDefinition> {
    let role = |name: &str, skills: &[&str]| RoleDefinition {
        role: name.to_string(),
        required_skills: strings(skills),
    };

    vec![
        role(
            "Frontend Developer",
            &["JavaScript", "React", "HTML", "CSS", "TypeScript", "Redux"],
        ),
        role(
            "Backend Developer",
            &["Node.js", "Express", "MongoDB", "SQL", "Python", "REST API"],
        ),
        role(
            "Data Scientist",
            &["Python", "R", "Pandas", "NumPy", "Machine Learning", "SQL", "TensorFlow"],
        ),
        role(
            "DevOps Engineer",
            &["Docker", "Kubernetes", "CI/CD", "AWS", "Linux", "Terraform"],
        ),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionaries: DictionaryConfig::default(),
            roles: default_roles(),
            scoring: ScoringConfig::default(),
            services: ServiceConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring.weights;
        let all = [
            weights.skills,
            weights.readability,
            weights.experience,
            weights.keywords,
            weights.sentiment,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ResumeScorerError::Configuration(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        if (weights.total() - 1.0).abs() > 1e-6 {
            return Err(ResumeScorerError::Configuration(format!(
                "scoring weights must sum to 1.0, got {:.4}",
                weights.total()
            )));
        }
        if !(0.0..=1.0).contains(&self.scoring.matched_threshold) {
            return Err(ResumeScorerError::Configuration(
                "matched_threshold must be within 0.0..=1.0".to_string(),
            ));
        }
        if self.services.timeout_ms == 0 {
            return Err(ResumeScorerError::Configuration(
                "services.timeout_ms must be greater than zero".to_string(),
            ));
        }
        for (role, skill) in self.unmatchable_role_skills() {
            log::warn!(
                "Role '{}' requires '{}', which no skill dictionary entry can match",
                role,
                skill
            );
        }
        Ok(())
    }

    /// Role requirements with no dictionary entry; these can only ever be reported missing.
    pub fn unmatchable_role_skills(&self) -> Vec<(&str, &str)> {
        let dictionaries = &self.dictionaries;
        let known = |skill: &str| {
            dictionaries
                .technical_skills
                .iter()
                .chain(&dictionaries.soft_skills)
                .any(|term| term.trim().eq_ignore_ascii_case(skill.trim()))
        };

        self.roles
            .iter()
            .flat_map(|role| {
                role.required_skills
                    .iter()
                    .filter(|skill| !known(skill))
                    .map(move |skill| (role.role.as_str(), skill.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!((config.scoring.weights.total() - 1.0).abs() < 1e-9);
        assert_eq!(config.scoring.max_keywords, 40);
        assert_eq!(config.roles.len(), 4);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = Config::default();
        config.scoring.weights.skills = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ResumeScorerError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_roles_covered_by_dictionary() {
        assert!(Config::default().unmatchable_role_skills().is_empty());
    }

    #[test]
    fn test_unmatchable_role_skill_reported() {
        let mut config = Config::default();
        config.roles.push(RoleDefinition {
            role: "Mobile Developer".to_string(),
            required_skills: vec!["swift".to_string(), "react".to_string()],
        });

        assert_eq!(
            config.unmatchable_role_skills(),
            vec![("Mobile Developer", "swift")]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.services.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.services.embedding_url = Some("http://localhost:9000/embed".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded.services.embedding_url.as_deref(),
            Some("http://localhost:9000/embed")
        );
        assert_eq!(loaded.roles, config.roles);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ResumeScorerError::Configuration(_))
        ));
    }
}
