//! Skill-gap analysis against a role's required skills

use crate::config::RoleDefinition;
use crate::error::{Result, ResumeScorerError};
use crate::processing::model::{SkillEntity, SkillGap};
use std::collections::{BTreeMap, HashSet};
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a fuzzy role-name lookup.
const ROLE_MATCH_THRESHOLD: f64 = 0.85;

pub struct SkillGapAnalyzer {
    roles: Vec<RoleDefinition>,
    matched_threshold: f64,
}

impl SkillGapAnalyzer {
    pub fn new(roles: Vec<RoleDefinition>, matched_threshold: f64) -> Self {
        Self {
            roles,
            matched_threshold,
        }
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    /// Exact (case-insensitive) role name, else the closest name above the threshold.
    pub fn find_role(&self, name: &str) -> Result<&RoleDefinition> {
        let wanted = name.trim().to_lowercase();

        if let Some(role) = self.roles.iter().find(|r| r.role.to_lowercase() == wanted) {
            return Ok(role);
        }

        self.roles
            .iter()
            .map(|r| (r, jaro_winkler(&r.role.to_lowercase(), &wanted)))
            .filter(|(_, similarity)| *similarity >= ROLE_MATCH_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(role, _)| role)
            .ok_or_else(|| ResumeScorerError::UnknownRole(name.to_string()))
    }

    pub fn analyze(&self, skills: &[SkillEntity], role: &RoleDefinition) -> SkillGap {
        let mut seen = HashSet::new();
        let required_skills: Vec<String> = role
            .required_skills
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect();

        let mut matched = Vec::new();
        let mut weak = Vec::new();
        let mut missing = Vec::new();
        let mut confidence_map = BTreeMap::new();

        for required in &required_skills {
            let found = skills
                .iter()
                .filter(|s| s.skill.eq_ignore_ascii_case(required))
                .map(|s| s.confidence)
                .max_by(|a, b| a.total_cmp(b));

            match found {
                Some(confidence) => {
                    confidence_map.insert(required.clone(), confidence);
                    if confidence >= self.matched_threshold {
                        matched.push(required.clone());
                    } else {
                        weak.push(required.clone());
                    }
                }
                None => missing.push(required.clone()),
            }
        }

        log::debug!(
            "Skill gap for {}: {} matched, {} weak, {} missing",
            role.role,
            matched.len(),
            weak.len(),
            missing.len()
        );

        SkillGap {
            role: role.role.clone(),
            required_skills,
            matched,
            weak,
            missing,
            confidence_map,
        }
    }
}
