//! Resume scorer: resume analysis and scoring tool

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction};
use resume_scorer::config::{Config, OutputFormat};
use resume_scorer::input::InputManager;
use resume_scorer::output::{
    resolve_save_path, save_report_to_file, AnalysisExport, ReportGenerator,
};
use resume_scorer::{AnalysisEngine, AnalysisRequest};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading configuration from {}", path.display())),
        None => Config::load().context("reading default configuration"),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job_title,
            job_description,
            role,
            output,
            detailed,
            save,
            offline,
        } => {
            info!("Starting resume analysis");

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };

            let engine = if offline {
                AnalysisEngine::offline(&config)?
            } else {
                AnalysisEngine::from_config(&config)?
            };

            let input_manager = InputManager::new();
            let resume_text = input_manager
                .read_document(&resume)
                .await
                .with_context(|| format!("reading resume {}", resume.display()))?;

            let mut request = AnalysisRequest::new(resume_text);
            if let Some(title) = job_title {
                request = request.with_job_title(title);
            }
            if let Some(path) = &job_description {
                let text = input_manager
                    .read_document(path)
                    .await
                    .with_context(|| format!("reading job description {}", path.display()))?;
                request = request.with_job_description(text);
            }
            if let Some(name) = &role {
                request = request.with_role(engine.find_role(name)?.clone());
            }

            if output_format == OutputFormat::Console {
                println!("🚀 Resume analysis");
                println!("📄 Resume: {}", resume.display());
                if let Some(path) = &job_description {
                    println!("💼 Job Description: {}", path.display());
                }
                if offline {
                    println!("⚠️  External services disabled");
                }
            }

            let spinner = create_spinner("Analyzing resume...");
            let result = engine.analyze(&request).await;
            spinner.finish_and_clear();
            let analysis = result.context("analysis failed")?;

            let detailed = detailed || config.output.detailed;
            let export = AnalysisExport::new(analysis);
            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true);
            let rendered = generator.generate_report(&export, output_format)?;
            println!("{}", rendered);

            if let Some(target) = save {
                let path = resolve_save_path(&target, output_format, &resume);
                let content = if output_format == OutputFormat::Console {
                    ReportGenerator::with_options(false, detailed, true)
                        .generate_report(&export, output_format)?
                } else {
                    rendered
                };
                save_report_to_file(&content, &path)
                    .with_context(|| format!("saving report to {}", path.display()))?;
                println!("💾 Report saved to {}", path.display());
            }
        }

        Commands::Roles => {
            println!("📋 Role Catalog\n");
            for role in &config.roles {
                println!("• {}", role.role);
                println!("  {}", role.required_skills.join(", "));
            }
        }

        Commands::Gap { resume, role } => {
            let engine = AnalysisEngine::offline(&config)?;
            let resume_text = InputManager::new()
                .read_document(&resume)
                .await
                .with_context(|| format!("reading resume {}", resume.display()))?;
            let gap = engine.analyze_gap(&resume_text, &role)?;

            println!("🎯 Skill gap for {}\n", gap.role);
            println!("✅ Matched: {}", gap.matched.join(", "));
            println!("🟡 Weak:    {}", gap.weak.join(", "));
            println!("❌ Missing: {}", gap.missing.join(", "));
            for (skill, confidence) in &gap.confidence_map {
                info!("{} confidence {:.2}", skill, confidence);
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Config file: {}", path.display());
                    println!("\nScoring Weights:");
                    let weights = &config.scoring.weights;
                    println!("  Skills:      {:.1}%", weights.skills * 100.0);
                    println!("  Readability: {:.1}%", weights.readability * 100.0);
                    println!("  Experience:  {:.1}%", weights.experience * 100.0);
                    println!("  Keywords:    {:.1}%", weights.keywords * 100.0);
                    println!("  Sentiment:   {:.1}%", weights.sentiment * 100.0);
                    println!("\nMatched-skill threshold: {:.2}", config.scoring.matched_threshold);
                    println!("\nServices (timeout {}ms):", config.services.timeout_ms);
                    println!(
                        "  Sentiment: {}",
                        config.services.sentiment_url.as_deref().unwrap_or("not configured")
                    );
                    println!(
                        "  Embedding: {}",
                        config.services.embedding_url.as_deref().unwrap_or("not configured")
                    );
                    println!("\nRoles: {}", config.roles.len());
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default()
                        .save_to(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
