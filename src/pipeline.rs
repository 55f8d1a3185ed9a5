//! End-to-end scoring: extraction, engine, feedback and report assembly

use crate::config::{Config, ModelConfig, ScoringConfig};
use crate::error::{Result, ScorerError};
use crate::input::InputManager;
use crate::llm::{select_provider, FeedbackAdapter, FeedbackProvider};
use crate::output::report::{ReportMetadata, ScoreReport};
use crate::processing::contact::extract_contact_info;
use crate::processing::embedding_manager::EmbeddingModelManager;
use crate::processing::embeddings::{Embedder, HashingEmbedder, Model2VecEmbedder};
use crate::processing::scoring::MatchEngine;
use crate::processing::synonyms::SynonymTable;
use crate::processing::vocabulary::{load_vocabulary, Vocabulary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Per-request switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreOptions {
    pub feedback: bool,
    pub sections: bool,
    pub contact: bool,
}

pub struct ScoringPipeline {
    engine: Arc<MatchEngine>,
    feedback: FeedbackAdapter,
    input: InputManager,
}

impl ScoringPipeline {
    pub fn new(engine: Arc<MatchEngine>, provider: Arc<dyn FeedbackProvider>) -> Self {
        Self {
            feedback: FeedbackAdapter::new(provider, engine.clone()),
            engine,
            input: InputManager::new(),
        }
    }

    /// Engine, vocabulary and feedback provider as configured
    pub async fn from_config(config: &Config, embedding_override: Option<&str>, with_feedback: bool) -> Result<Self> {
        let engine = load_engine(config, embedding_override).await?;
        let provider = select_provider(&config.feedback, with_feedback);
        Ok(Self::new(engine, provider))
    }

    pub fn engine(&self) -> &Arc<MatchEngine> {
        &self.engine
    }

    pub fn feedback_provider_name(&self) -> &str {
        self.feedback.provider_name()
    }

    pub async fn score_files(&self, resume: &Path, job: &Path, options: ScoreOptions) -> Result<ScoreReport> {
        let resume_text = self.input.extract_text(resume).await?;
        let job_text = self.input.extract_text(job).await?;

        let metadata = ReportMetadata::new(
            resume.display().to_string(),
            job.display().to_string(),
            self.engine.embedder_name(),
        );
        self.score_texts(&resume_text, &job_text, options, metadata).await
    }

    /// Scoring runs on the blocking pool while the feedback call is in flight
    pub async fn score_texts(
        &self,
        resume_text: &str,
        job_text: &str,
        options: ScoreOptions,
        metadata: ReportMetadata,
    ) -> Result<ScoreReport> {
        if resume_text.trim().is_empty() {
            return Err(ScorerError::InvalidInput("Resume text is empty".to_string()));
        }
        if job_text.trim().is_empty() {
            return Err(ScorerError::InvalidInput("Job description text is empty".to_string()));
        }

        let start_time = Instant::now();

        let engine = self.engine.clone();
        let (resume_owned, job_owned) = (resume_text.to_string(), job_text.to_string());
        let sections = options.sections;
        let scoring = tokio::task::spawn_blocking(move || -> Result<_> {
            let breakdown = engine.score(&resume_owned, &job_owned)?;
            let sections = if sections {
                Some(engine.score_sections(&resume_owned, &job_owned)?)
            } else {
                None
            };
            Ok((breakdown, sections))
        });

        let feedback = async {
            if options.feedback {
                Some(self.feedback.get_feedback(resume_text, job_text).await)
            } else {
                None
            }
        };

        let (scored, feedback) = tokio::join!(scoring, feedback);
        let (breakdown, sections) =
            scored.map_err(|e| ScorerError::Embedding(format!("Scoring task failed: {}", e)))??;

        let mut report = ScoreReport::new(breakdown, metadata);
        if let Some(feedback) = feedback {
            let provider = self.feedback.provider_name().to_string();
            report = report.with_feedback(feedback, provider);
        }
        if let Some(sections) = sections {
            report = report.with_sections(sections);
        }
        if options.contact {
            report = report.with_contact(extract_contact_info(resume_text));
        }

        let elapsed = start_time.elapsed();
        log::info!("Scoring finished in {:.2?}", elapsed);
        Ok(report.with_processing_time(elapsed.as_millis() as u64))
    }
}

/// Built-in vocabulary unless the config names a vocabulary file
pub fn load_scoring_vocabulary(config: &ScoringConfig) -> Result<(Vocabulary, SynonymTable)> {
    match &config.vocabulary_path {
        Some(path) => load_vocabulary(path),
        None => Ok((Vocabulary::default(), SynonymTable::builtin())),
    }
}

pub async fn load_engine(config: &Config, embedding_override: Option<&str>) -> Result<Arc<MatchEngine>> {
    let model = embedding_override.unwrap_or(&config.models.embedding_model);
    let embedder = load_embedder(&config.models, model).await;
    let (vocabulary, synonyms) = load_scoring_vocabulary(&config.scoring)?;

    let engine = MatchEngine::new(
        embedder,
        Arc::new(vocabulary),
        Arc::new(synonyms),
        config.scoring.match_mode,
    )?;
    Ok(Arc::new(engine))
}

/// Load `model` (catalog name, local directory or Hugging Face repo id).
///
/// Never fails: when the model cannot be loaded the hashing embedder is
/// returned and semantic scoring degrades instead of aborting.
pub async fn load_embedder(config: &ModelConfig, model: &str) -> Arc<dyn Embedder> {
    match try_load_model2vec(config, model).await {
        Ok(embedder) => Arc::new(embedder),
        Err(e) => {
            log::warn!(
                "Could not load embedding model '{}': {}. Falling back to hashing embeddings",
                model,
                e
            );
            Arc::new(HashingEmbedder::default())
        }
    }
}

async fn try_load_model2vec(config: &ModelConfig, model: &str) -> Result<Model2VecEmbedder> {
    let local = PathBuf::from(model);
    let (source, name) = if local.is_dir() {
        (local, model.to_string())
    } else {
        let mut manager = EmbeddingModelManager::new(config).await?;
        match manager.resolve_model_id(model) {
            Some(id) => (manager.ensure_model_available(&id).await?, id),
            // Unknown to the catalog: let model2vec resolve it as a repo id
            None => (local, model.to_string()),
        }
    };

    tokio::task::spawn_blocking(move || Model2VecEmbedder::load(&source, name))
        .await
        .map_err(|e| ScorerError::Embedding(format!("Model loading task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{DisabledProvider, FeedbackSource};
    use tempfile::TempDir;

    fn pipeline() -> ScoringPipeline {
        let engine = Arc::new(MatchEngine::with_defaults(Arc::new(HashingEmbedder::default())).unwrap());
        ScoringPipeline::new(engine, Arc::new(DisabledProvider::new("off")))
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata::new("resume", "job", "hashing")
    }

    #[tokio::test]
    async fn test_score_texts_with_all_options() {
        let options = ScoreOptions {
            feedback: true,
            sections: true,
            contact: true,
        };
        let report = pipeline()
            .score_texts(
                "jane@example.com\nSkills: Python, SQL\nExperience: 3 years",
                "Skills: Python, SQL, Tableau\nExperience: 2+ years",
                options,
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(report.breakdown.exp_match_ratio, 100.0);
        assert_eq!(report.feedback.as_ref().map(|f| f.source), Some(FeedbackSource::Fallback));
        assert_eq!(report.metadata.feedback_provider.as_deref(), Some("disabled"));
        assert!(report.sections.is_some());
        assert_eq!(report.contact.and_then(|c| c.email).as_deref(), Some("jane@example.com"));
    }

    #[tokio::test]
    async fn test_optional_parts_are_skipped() {
        let report = pipeline()
            .score_texts("Python developer", "Python developer", ScoreOptions::default(), metadata())
            .await
            .unwrap();

        assert!(report.feedback.is_none());
        assert!(report.sections.is_none());
        assert!(report.contact.is_none());
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_scoring() {
        let result = pipeline()
            .score_texts("", "Python", ScoreOptions::default(), metadata())
            .await;
        assert!(matches!(result, Err(ScorerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unloadable_model_falls_back_to_hashing() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken-model");
        std::fs::create_dir_all(&broken).unwrap();

        let config = Config::default();
        let embedder = load_embedder(&config.models, broken.to_str().unwrap()).await;
        assert_eq!(embedder.name(), "hashing");
    }

    #[test]
    fn test_custom_vocabulary_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.toml");
        std::fs::write(&path, "education = []\nroles = []\n[skills]\nall = [\"cobol\"]\n").unwrap();

        let mut scoring = Config::default().scoring;
        scoring.vocabulary_path = Some(path);
        let (vocabulary, _) = load_scoring_vocabulary(&scoring).unwrap();
        assert_eq!(vocabulary.skill_terms(), vec!["cobol"]);
    }
}
