//! Resume analysis and scoring library

pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use processing::analyzer::{AnalysisEngine, AnalysisRequest};
pub use processing::model::ResumeAnalysis;
