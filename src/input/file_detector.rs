//! File type detection

use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Every extension `from_extension` recognizes
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "txt", "text", "md", "markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Extension first; a `%PDF-` header identifies PDFs saved without one
    pub fn detect(path: &Path, leading_bytes: &[u8]) -> Self {
        match Self::from_path(path) {
            FileType::Unknown if leading_bytes.starts_with(PDF_MAGIC) => FileType::Pdf,
            detected => detected,
        }
    }
}
