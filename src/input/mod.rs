//! Document input: file type detection and text extraction

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use manager::InputManager;
pub use text_extractor::{extract_pdf_text, markdown_to_text};
