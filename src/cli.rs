//! CLI interface for the resume scorer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-scorer")]
#[command(about = "Resume analysis and scoring tool")]
#[command(long_about = "Extract skills and experience from a resume, score its readability, tone and keyword coverage, and compare it against a job description or target role")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze and score a resume
    Analyze {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Target job title, selects domain keywords for ATS scoring
        #[arg(short, long)]
        job_title: Option<String>,

        /// Path to job description file (TXT, MD), enables semantic ATS scoring
        #[arg(short = 'd', long)]
        job_description: Option<PathBuf>,

        /// Target role from the catalog for skill-gap analysis
        #[arg(long)]
        role: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show per-skill context and achievements
        #[arg(long)]
        detailed: bool,

        /// Save output to a file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip external sentiment and embedding services
        #[arg(long)]
        offline: bool,
    },

    /// List the role catalog
    Roles,

    /// Compare a resume's skills against a role
    Gap {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Role name from the catalog
        #[arg(long)]
        role: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from([
            "resume-scorer",
            "analyze",
            "--resume",
            "cv.txt",
            "--role",
            "DevOps Engineer",
            "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { resume, role, offline, .. } => {
                assert_eq!(resume, PathBuf::from("cv.txt"));
                assert_eq!(role.as_deref(), Some("DevOps Engineer"));
                assert!(offline);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_parse_analyze_detailed_flag() {
        let cli = Cli::try_parse_from([
            "resume-scorer",
            "analyze",
            "-r",
            "cv.md",
            "--detailed",
            "--save",
            "reports",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { detailed, save, .. } => {
                assert!(detailed);
                assert_eq!(save, Some(PathBuf::from("reports")));
            }
            _ => panic!("expected analyze command"),
        }
    }
}
