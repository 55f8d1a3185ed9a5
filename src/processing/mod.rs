//! Text processing and match scoring

pub mod contact;
pub mod embedding_manager;
pub mod embeddings;
pub mod experience;
pub mod keywords;
pub mod scoring;
pub mod sections;
pub mod synonyms;
pub mod text_processor;
pub mod vocabulary;

pub use embeddings::{cosine_similarity, Embedder, HashingEmbedder, Model2VecEmbedder, SemanticScorer};
pub use scoring::{combine, ExtractedSignals, MatchBreakdown, MatchEngine};
pub use synonyms::SynonymTable;
pub use text_processor::normalize_text;
pub use vocabulary::Vocabulary;
