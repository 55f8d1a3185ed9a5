//! Local Model2Vec model store backed by the Hugging Face Hub

use crate::config::{AvailableModel, ModelConfig};
use crate::error::{Result, ScorerError};
use hf_hub::api::tokio::Api;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files model2vec-rs needs to load a model from disk
const REQUIRED_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Downloads, lists and removes embedding models under `models_dir`
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    catalog: Vec<AvailableModel>,
    downloaded: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(config: &ModelConfig) -> Result<Self> {
        Self::with_catalog(config.models_dir.clone(), config.available_models.clone()).await
    }

    pub async fn with_catalog(models_dir: PathBuf, catalog: Vec<AvailableModel>) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            ScorerError::ModelError(format!(
                "Failed to create models directory {}: {}",
                models_dir.display(),
                e
            ))
        })?;

        let mut manager = Self {
            models_dir,
            catalog,
            downloaded: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_directory(&entry.path()).await {
                self.downloaded
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        log::debug!(
            "Found {} downloaded model(s) in {}",
            self.downloaded.len(),
            self.models_dir.display()
        );
        Ok(())
    }

    /// Catalog name for a catalog name, a repo id or a case-insensitive name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.catalog
            .iter()
            .find(|m| m.name == input)
            .or_else(|| self.catalog.iter().find(|m| m.repo_id == input))
            .or_else(|| self.catalog.iter().find(|m| m.name.eq_ignore_ascii_case(input)))
            .map(|m| m.name.clone())
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&AvailableModel> {
        self.catalog.iter().find(|m| m.name == model_id)
    }

    pub fn list_available_models(&self) -> &[AvailableModel] {
        &self.catalog
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded.contains(model_id)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.is_model_downloaded(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let info = self
            .get_model_info(model_id)
            .cloned()
            .ok_or_else(|| ScorerError::ModelNotFound(format!("Unknown embedding model: {}", model_id)))?;

        let model_dir = self.models_dir.join(&info.name);
        if self.is_model_downloaded(&info.name) {
            return Ok(model_dir);
        }

        println!("Downloading embedding model: {} ({} MB)", info.name, info.size_mb);
        println!("Repository: {}", info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ScorerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        ScorerError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    println!("  Downloaded: {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    log::warn!("Optional file {} not available for {}: {}", file, info.repo_id, e);
                }
                Err(e) => {
                    // A half-populated directory would be picked up by the next scan
                    let _ = fs::remove_dir_all(&model_dir).await;
                    return Err(ScorerError::Network(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded.insert(info.name.clone());
        println!("Embedding model {} downloaded successfully", info.name);
        Ok(model_dir)
    }

    /// Local path of the model, downloading it first when needed
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        if !self.downloaded.remove(model_id) {
            return Err(ScorerError::ModelNotFound(format!(
                "Model {} is not downloaded",
                model_id
            )));
        }
        fs::remove_dir_all(self.models_dir.join(model_id)).await?;
        log::info!("Removed embedding model {}", model_id);
        Ok(())
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}

async fn is_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}
