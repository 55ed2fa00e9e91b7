//! Exportable report built around a finished analysis

use crate::error::Result;
use crate::processing::model::{AtsScore, ResumeAnalysis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Downloadable form of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisExport {
    pub analysis: ResumeAnalysis,
    pub overall_score: f64,
    pub ats_score: Option<AtsScore>,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisExport {
    pub fn new(analysis: ResumeAnalysis) -> Self {
        Self::at(analysis, Utc::now())
    }

    pub fn at(analysis: ResumeAnalysis, generated_at: DateTime<Utc>) -> Self {
        Self {
            overall_score: analysis.overall_score,
            ats_score: analysis.ats_score.clone(),
            analysis,
            generated_at,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Coarse label for a 0..=100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score.round() as u32 {
            90..=u32::MAX => ScoreBand::Excellent,
            80..=89 => ScoreBand::VeryGood,
            70..=79 => ScoreBand::Good,
            60..=69 => ScoreBand::Fair,
            50..=59 => ScoreBand::BelowAverage,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::VeryGood => "Very Good",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::BelowAverage => "Below Average",
            ScoreBand::Poor => "Poor",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Strong resume; ready to send",
            ScoreBand::VeryGood => "Solid resume with minor gaps",
            ScoreBand::Good => "Good foundation; a few sections need work",
            ScoreBand::Fair => "Several areas need strengthening",
            ScoreBand::BelowAverage => "Significant revisions recommended",
            ScoreBand::Poor => "Resume needs substantial rework",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(95.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(89.6), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(72.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::BelowAverage);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Poor);
    }
}
