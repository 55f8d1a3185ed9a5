//! Resume scorer library
//!
//! Scores one resume against one job description by blending embedding
//! similarity with vocabulary-driven skill, education, role and experience
//! signals, with optional LLM feedback.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod processing;

pub use config::Config;
pub use error::{Result, ScorerError};
pub use pipeline::{ScoreOptions, ScoringPipeline};
pub use processing::scoring::{MatchBreakdown, MatchEngine};
