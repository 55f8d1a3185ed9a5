//! LLM feedback integration

pub mod feedback;
pub mod gemini;
pub mod prompts;

use crate::config::FeedbackConfig;
use crate::error::{Result, ScorerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use feedback::FeedbackAdapter;
pub use gemini::GeminiProvider;

/// Where a feedback record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    Llm,
    Fallback,
}

/// Overall score plus up to three non-empty feedback bullets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub score: u8,
    pub feedback: Vec<String>,
    pub source: FeedbackSource,
}

/// A text-completion backend for the feedback prompt
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Raw model output for `prompt`
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Always unavailable; the adapter answers with its fallback
pub struct DisabledProvider {
    reason: String,
}

impl DisabledProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl FeedbackProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(ScorerError::Feedback(self.reason.clone()))
    }
}

/// Pick the provider once at startup from config and environment
pub fn select_provider(config: &FeedbackConfig, enabled: bool) -> Arc<dyn FeedbackProvider> {
    if !enabled || !config.enabled {
        return Arc::new(DisabledProvider::new("LLM feedback is disabled"));
    }

    let Some(api_key) = config.api_key() else {
        log::info!("{} is not set, using keyword-based feedback", config.api_key_env);
        return Arc::new(DisabledProvider::new(format!("{} is not set", config.api_key_env)));
    };

    match GeminiProvider::new(config, api_key) {
        Ok(provider) => {
            log::info!("Using Gemini model {} for feedback", config.model);
            Arc::new(provider)
        }
        Err(e) => {
            log::warn!("Failed to create Gemini client: {}", e);
            Arc::new(DisabledProvider::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_disabled_provider_always_fails() {
        let provider = DisabledProvider::new("off");
        assert!(matches!(provider.complete("prompt").await, Err(ScorerError::Feedback(_))));
    }

    #[test]
    fn test_select_provider_respects_flags_and_key() {
        let mut config = Config::default().feedback;
        config.api_key_env = "RESUME_SCORER_TEST_SELECT_KEY".to_string();
        std::env::remove_var("RESUME_SCORER_TEST_SELECT_KEY");

        assert_eq!(select_provider(&config, true).name(), "disabled");

        std::env::set_var("RESUME_SCORER_TEST_SELECT_KEY", "secret");
        assert_eq!(select_provider(&config, true).name(), config.model);
        assert_eq!(select_provider(&config, false).name(), "disabled");

        config.enabled = false;
        assert_eq!(select_provider(&config, true).name(), "disabled");
        std::env::remove_var("RESUME_SCORER_TEST_SELECT_KEY");
    }

    #[test]
    fn test_feedback_source_serializes_lowercase() {
        let result = FeedbackResult {
            score: 42,
            feedback: vec!["ok".to_string()],
            source: FeedbackSource::Fallback,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"source\":\"fallback\""));
    }
}
