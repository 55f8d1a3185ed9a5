//! Text embeddings and cosine similarity

use crate::error::{Result, ScorerError};
use anyhow::Context;
use model2vec_rs::model::StaticModel;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Anything that can turn a text into a fixed-length vector.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector for the lifetime of the embedder.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    /// Identifier shown in reports
    fn name(&self) -> &str;
}

/// Static Model2Vec embeddings
pub struct Model2VecEmbedder {
    model: StaticModel,
    name: String,
    dimension: usize,
}

impl Model2VecEmbedder {
    /// Load from a local model directory or a Hugging Face repo id
    pub fn load<P: AsRef<Path>>(path_or_repo: P, name: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        let path_or_repo = path_or_repo.as_ref();
        log::info!("Loading Model2Vec embedding model from {}", path_or_repo.display());

        let model = StaticModel::from_pretrained(path_or_repo, None, None, None)
            .with_context(|| format!("Failed to load model from {}", path_or_repo.display()))?;

        // Probe once so the dimension is known without a separate config read
        let dimension = model.encode_single("probe").len();
        if dimension == 0 {
            return Err(ScorerError::Embedding(format!(
                "Model at {} produced empty embeddings",
                path_or_repo.display()
            )));
        }

        log::info!("Model loaded in {:.2?} ({} dimensions)", start_time.elapsed(), dimension);
        Ok(Self {
            model,
            name: name.into(),
            dimension,
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// Changing these keys changes every hashed embedding
const HASH_KEY_0: u64 = 0x0123_4567_89ab_cdef;
const HASH_KEY_1: u64 = 0xfedc_ba98_7654_3210;

pub const DEFAULT_HASHING_DIMENSION: usize = 256;

/// Feature-hashing bag of words.
///
/// Each word is hashed with SipHash-1-3 under fixed keys into one of
/// `dimension` buckets with a hashed sign, and the result is L2-normalized.
/// Needs no model files, so it backs the scorer whenever a Model2Vec model
/// cannot be loaded.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.unicode_words() {
            let hash = Self::hash(&word.to_lowercase());
            let index = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine similarity in [-1, 1].
///
/// Empty, mismatched or zero-norm vectors give 0 instead of an error so a
/// degenerate embedding never aborts scoring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Embeds two texts with the injected embedder and compares them
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Symmetric similarity; an empty text on either side scores 0
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Ok(0.0);
        }

        let embedding_a = self.embedder.embed(a)?;
        let embedding_b = self.embedder.embed(b)?;
        Ok(cosine_similarity(&embedding_a, &embedding_b))
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }
}
