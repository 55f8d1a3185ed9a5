//! Routes input files to the right extractor

use crate::error::{Result, ScorerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

#[derive(Debug, Default, Clone, Copy)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of a resume or job description file.
    ///
    /// Fails with `InvalidInput` when the file is missing or yields no text,
    /// so scoring never runs on an empty document.
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path).await? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ScorerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {} (expected .pdf, .txt or .md)",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(ScorerError::InvalidInput(format!(
                "No text could be extracted from {}",
                path.display()
            )));
        }

        Ok(text)
    }

    pub async fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let detected = FileType::from_path(path);
        if detected != FileType::Unknown {
            return Ok(detected);
        }

        let mut header = [0u8; 8];
        let mut file = fs::File::open(path).await?;
        let read = file.read(&mut header).await?;
        Ok(FileType::detect(path, &header[..read]))
    }
}
