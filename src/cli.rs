//! CLI interface for the resume scorer

use crate::config::OutputFormat;
use crate::input::file_detector::SUPPORTED_EXTENSIONS;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "resume-scorer", version)]
#[command(about = "Score how well a resume matches a job description")]
#[command(long_about = "Blend embedding similarity with skill, education, role and experience matching into one score, with optional LLM feedback")]
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

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a resume against a job description
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or to a generated file name inside an existing directory
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show section scores, contact details and run metadata
        #[arg(short, long)]
        detailed: bool,

        /// Skip the LLM feedback call
        #[arg(long)]
        no_feedback: bool,

        /// Also compute section-weighted similarity
        #[arg(long)]
        sections: bool,

        /// Embedding model (catalog name, repo id or local directory)
        #[arg(short, long)]
        embedding: Option<String>,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelAction {
    /// List catalog models and their download status
    List,

    /// Download a model
    Download {
        /// Model name or Hugging Face repo id
        model: String,

        /// Re-download even if the model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        model: String,
    },

    /// Show model information
    Info {
        model: String,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

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

/// Files without an extension pass; their type is sniffed from content later
pub fn validate_file_extension(path: &Path) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            SUPPORTED_EXTENSIONS.join(", ")
        )),
        None => Ok(()),
    }
}
