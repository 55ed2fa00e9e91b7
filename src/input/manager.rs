//! Input manager for reading resumes and job descriptions from disk

use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a text or markdown file as plain text.
    pub async fn read_document(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ResumeScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Unsupported(ext) => Err(ResumeScorerError::UnsupportedFormat(format!(
                "'.{}' files are not read directly; convert {} to text first",
                ext,
                path.display()
            ))),
        }
    }
}
