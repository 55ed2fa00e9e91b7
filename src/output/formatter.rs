//! Output formatters for console, JSON and markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{AnalysisExport, ScoreBand};
use crate::processing::model::{AtsMode, AtsScore, AtsTier, Metric, SkillGap, Tone};
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting exported analyses
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisExport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and score badges
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Skills => "Skills",
        Metric::Readability => "Readability",
        Metric::Experience => "Experience",
        Metric::Keywords => "Keywords",
        Metric::Sentiment => "Sentiment",
        Metric::Ats => "ATS match",
    }
}

fn tier_label(tier: AtsTier) -> &'static str {
    match tier {
        AtsTier::Strong => "Strong",
        AtsTier::Medium => "Medium",
        AtsTier::Low => "Low",
    }
}

fn mode_label(mode: AtsMode) -> &'static str {
    match mode {
        AtsMode::Semantic => "semantic similarity to job description",
        AtsMode::SkillList => "role skill list",
        AtsMode::JobTitleKeywords => "job-title keywords",
        AtsMode::CommonKeywords => "common keywords",
    }
}

fn tone_label(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "professional",
        Tone::Casual => "casual",
        Tone::Confident => "confident",
        Tone::Modest => "modest",
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::VeryGood => Color::BrightGreen,
            ScoreBand::Good => Color::Yellow,
            ScoreBand::Fair => Color::BrightYellow,
            ScoreBand::BelowAverage => Color::Red,
            ScoreBand::Poor => Color::BrightRed,
        };
        let label = band.label().to_uppercase();

        if self.use_colors {
            format!("[{}]", label.color(color).bold())
        } else {
            format!("[{}]", label)
        }
    }

    fn format_ats(&self, ats: &AtsScore) -> String {
        let mut output = format!(
            "ATS Score: {:.0}/100 {} ({} tier, {})\n",
            ats.score,
            self.format_score_badge(ats.score),
            tier_label(ats.tier),
            mode_label(ats.mode)
        );
        if let Some(similarity) = ats.similarity {
            output.push_str(&format!("Cosine similarity: {:.3}\n", similarity));
        }
        if ats.degraded {
            output.push_str(&self.colorize(
                "⚠️  Semantic matching unavailable; score uses local keywords\n",
                Color::Yellow,
            ));
        }
        if !ats.matched_keywords.is_empty() {
            output.push_str(&format!("Matched: {}\n", ats.matched_keywords.join(", ")));
        }
        output
    }

    fn format_gap(&self, gap: &SkillGap) -> String {
        let mut output = format!("Target role: {}\n", gap.role);
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("✅ Matched:", Color::Green),
            join_or_none(&gap.matched)
        ));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("🟡 Weak:", Color::Yellow),
            join_or_none(&gap.weak)
        ));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("❌ Missing:", Color::Red),
            join_or_none(&gap.missing)
        ));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisExport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall Score: {:.0}/100 {}\n",
            report.overall_score,
            self.format_score_badge(report.overall_score)
        ));
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(ScoreBand::from_score(report.overall_score).verdict(), Color::Cyan)
        ));
        if let Some(ats) = &report.ats_score {
            output.push_str(&self.format_ats(ats));
        }

        output.push_str(&self.format_header("Score Breakdown", 3));
        for entry in &analysis.score_breakdown {
            match entry.sub_score {
                Some(score) => output.push_str(&format!(
                    "  {:<12} {:>5.1}  (weight {:.1}%)\n",
                    metric_label(entry.metric),
                    score,
                    entry.weight * 100.0
                )),
                None => output.push_str(&format!(
                    "  {:<12} {:>5}  (not computable)\n",
                    metric_label(entry.metric),
                    "n/a"
                )),
            }
        }

        output.push_str(&self.format_header("Skills", 3));
        if analysis.skills.is_empty() {
            output.push_str("No dictionary skills found\n");
        } else if self.detailed {
            for skill in &analysis.skills {
                output.push_str(&format!(
                    "  • {} ({:?}, confidence {:.2})\n",
                    skill.skill, skill.category, skill.confidence
                ));
                output.push_str(&format!("    \"{}\"\n", skill.context));
            }
        } else {
            let names: Vec<String> = analysis.skills.iter().map(|s| s.skill.clone()).collect();
            output.push_str(&format!("{}\n", names.join(", ")));
        }

        output.push_str(&self.format_header("Experience", 3));
        if analysis.experience.is_empty() {
            output.push_str("No role lines detected\n");
        }
        for role in &analysis.experience {
            let mut line = format!("  💼 {}", role.title);
            if !role.company.is_empty() {
                line.push_str(&format!(" @ {}", role.company));
            }
            if !role.duration.is_empty() {
                line.push_str(&format!(" ({})", role.duration));
            }
            output.push_str(&format!("{}\n", line));
            if self.detailed {
                for achievement in &role.achievements {
                    output.push_str(&format!("     - {}\n", achievement));
                }
            } else if !role.achievements.is_empty() {
                output.push_str(&format!("     {} achievements\n", role.achievements.len()));
            }
        }

        let readability = &analysis.readability;
        output.push_str(&self.format_header("Readability", 3));
        output.push_str(&format!(
            "Score {:.0}/100 | {} words, {} sentences, {:.1} words/sentence\n",
            readability.score,
            readability.word_count,
            readability.sentence_count,
            readability.avg_sentence_length
        ));
        output.push_str(&format!(
            "Flesch reading ease {:.1} | Gunning fog {:.1}\n",
            readability.flesch_reading_ease, readability.gunning_fog_index
        ));

        let sentiment = &analysis.sentiment;
        output.push_str(&self.format_header("Tone", 3));
        output.push_str(&format!(
            "Tone: {} | positivity {:.2} | confidence {:.2}\n",
            tone_label(sentiment.tone),
            sentiment.positivity,
            sentiment.confidence
        ));

        output.push_str(&self.format_header("Keywords", 3));
        output.push_str(&format!("{}\n", join_or_none(&analysis.keywords)));

        if self.detailed {
            for (kind, values) in &analysis.entities {
                if !values.is_empty() {
                    output.push_str(&format!("{}: {}\n", kind, values.join(", ")));
                }
            }
        }

        if let Some(gap) = &analysis.skill_gap {
            output.push_str(&self.format_header("Skill Gap", 2));
            output.push_str(&self.format_gap(gap));
        }

        if !analysis.degraded.is_empty() {
            output.push_str(&self.format_header("Notes", 4));
            for note in &analysis.degraded {
                output.push_str(&self.colorize(
                    &format!(
                        "{} used the local fallback: {}\n",
                        metric_label(note.metric),
                        note.reason
                    ),
                    Color::Yellow,
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisExport) -> Result<String> {
        report.to_json(self.pretty)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: f64) -> String {
        let icon = match ScoreBand::from_score(score) {
            ScoreBand::Excellent => "🟢",
            ScoreBand::VeryGood => "🟡",
            ScoreBand::Good => "🟠",
            _ => "🔴",
        };
        format!("{} {}", icon, ScoreBand::from_score(score).label())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisExport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# 📊 Resume Analysis Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Overall Score:** {:.0}/100 {}\n\n",
            report.overall_score,
            Self::markdown_score_badge(report.overall_score)
        ));
        output.push_str(&format!(
            "**Verdict:** {}\n\n",
            ScoreBand::from_score(report.overall_score).verdict()
        ));
        if let Some(ats) = &report.ats_score {
            output.push_str(&format!(
                "**ATS Score:** {:.0}/100 ({} tier, {}{})\n\n",
                ats.score,
                tier_label(ats.tier),
                mode_label(ats.mode),
                if ats.degraded { ", degraded" } else { "" }
            ));
        }

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Metric | Score | Weight |\n");
        output.push_str("|--------|-------|--------|\n");
        for entry in &analysis.score_breakdown {
            let score = entry
                .sub_score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "n/a".to_string());
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                metric_label(entry.metric),
                score,
                entry.weight * 100.0
            ));
        }
        output.push('\n');

        output.push_str("## Skills\n\n");
        if analysis.skills.is_empty() {
            output.push_str("_No dictionary skills found._\n\n");
        } else {
            output.push_str("| Skill | Category | Confidence |\n");
            output.push_str("|-------|----------|------------|\n");
            for skill in &analysis.skills {
                output.push_str(&format!(
                    "| {} | {:?} | {:.2} |\n",
                    skill.skill, skill.category, skill.confidence
                ));
            }
            output.push('\n');
        }

        output.push_str("## Experience\n\n");
        for role in &analysis.experience {
            output.push_str(&format!("### {}\n\n", role.title));
            let details: Vec<&str> = [role.company.as_str(), role.duration.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            if !details.is_empty() {
                output.push_str(&format!("{}\n\n", details.join(" | ")));
            }
            for achievement in &role.achievements {
                output.push_str(&format!("- {}\n", achievement));
            }
            output.push('\n');
        }

        let readability = &analysis.readability;
        output.push_str("## Readability\n\n");
        output.push_str(&format!(
            "- Score: {:.0}/100\n- Words: {} in {} sentences ({:.1} per sentence)\n\
             - Flesch reading ease: {:.1}\n- Gunning fog: {:.1}\n\n",
            readability.score,
            readability.word_count,
            readability.sentence_count,
            readability.avg_sentence_length,
            readability.flesch_reading_ease,
            readability.gunning_fog_index
        ));

        output.push_str("## Tone\n\n");
        output.push_str(&format!(
            "{} (positivity {:.2}, confidence {:.2})\n\n",
            tone_label(analysis.sentiment.tone),
            analysis.sentiment.positivity,
            analysis.sentiment.confidence
        ));

        output.push_str("## Keywords\n\n");
        output.push_str(&format!("{}\n\n", join_or_none(&analysis.keywords)));

        if let Some(gap) = &analysis.skill_gap {
            output.push_str(&format!("## Skill Gap: {}\n\n", gap.role));
            output.push_str(&format!("- **Matched:** {}\n", join_or_none(&gap.matched)));
            output.push_str(&format!("- **Weak:** {}\n", join_or_none(&gap.weak)));
            output.push_str(&format!("- **Missing:** {}\n\n", join_or_none(&gap.missing)));
        }

        if !analysis.degraded.is_empty() {
            output.push_str("## Notes\n\n");
            for note in &analysis.degraded {
                output.push_str(&format!(
                    "- {} used the local fallback: {}\n",
                    metric_label(note.metric),
                    note.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisExport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// A directory target gets a generated file name derived from the resume.
pub fn resolve_save_path(target: &Path, format: OutputFormat, resume: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        target.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_score{}.{}", base_name, timestamp_suffix, extension)
}
