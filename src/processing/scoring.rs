//! Match scoring engine: signal extraction and the weighted score blend

use crate::error::{Result, ScorerError};
use crate::processing::embeddings::{Embedder, SemanticScorer};
use crate::processing::experience::extract_years;
use crate::processing::keywords::{KeywordExtractor, MatchMode};
use crate::processing::sections::{SectionBreakdown, SectionScorer};
use crate::processing::synonyms::SynonymTable;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

pub const SKILL_WEIGHT: f64 = 0.5;
pub const EDU_WEIGHT: f64 = 0.2;
pub const ROLE_WEIGHT: f64 = 0.1;
pub const EXP_WEIGHT: f64 = 0.2;

pub const SEMANTIC_WEIGHT: f64 = 0.6;
pub const KEYWORD_WEIGHT: f64 = 0.4;

/// Structured signals pulled from one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSignals {
    /// Canonical skill names (synonyms already collapsed)
    pub skills: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    pub years_experience: f64,
}

/// Flat result record for one resume scored against one job description.
///
/// Scores and ratios are percentages rounded to two decimals; `resume_exp`
/// and `jd_exp` are raw years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub final_score: f64,
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub skill_match_ratio: f64,
    pub edu_match_ratio: f64,
    pub role_match: bool,
    pub exp_match_ratio: f64,
    pub resume_exp: f64,
    pub jd_exp: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Share of the job's terms the resume also has; an empty job side gives 0
fn overlap_ratio(resume: &BTreeSet<String>, jd: &BTreeSet<String>) -> f64 {
    let common = resume.intersection(jd).count();
    common as f64 / jd.len().max(1) as f64
}

fn experience_ratio(resume_years: f64, jd_years: f64) -> f64 {
    if jd_years > 0.0 {
        (resume_years / jd_years).min(1.0)
    } else {
        1.0
    }
}

/// 0..1 ratio to a percentage with two decimals
fn to_percent(ratio: f64) -> f64 {
    let percent = (ratio * 100.0).clamp(0.0, 100.0);
    (percent * 100.0).round() / 100.0
}

/// Blend both documents' signals with the semantic similarity.
///
/// All arithmetic stays on 0..1 ratios; conversion to percentages happens
/// once, when the record is built. A semantic similarity outside [0, 1]
/// (negative cosine, NaN) is clamped first.
pub fn combine(resume: &ExtractedSignals, jd: &ExtractedSignals, semantic_similarity: f64) -> MatchBreakdown {
    let semantic = if semantic_similarity.is_finite() {
        semantic_similarity.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let skill_ratio = overlap_ratio(&resume.skills, &jd.skills);
    let edu_ratio = overlap_ratio(&resume.education, &jd.education);
    let role_match = !resume.roles.is_disjoint(&jd.roles);
    let role_ratio = if role_match { 1.0 } else { 0.0 };
    let exp_ratio = experience_ratio(resume.years_experience, jd.years_experience);

    let keyword = SKILL_WEIGHT * skill_ratio
        + EDU_WEIGHT * edu_ratio
        + ROLE_WEIGHT * role_ratio
        + EXP_WEIGHT * exp_ratio;
    let final_ratio = SEMANTIC_WEIGHT * semantic + KEYWORD_WEIGHT * keyword;

    MatchBreakdown {
        final_score: to_percent(final_ratio),
        semantic_score: to_percent(semantic),
        keyword_score: to_percent(keyword),
        skill_match_ratio: to_percent(skill_ratio),
        edu_match_ratio: to_percent(edu_ratio),
        role_match,
        exp_match_ratio: to_percent(exp_ratio),
        resume_exp: resume.years_experience,
        jd_exp: jd.years_experience,
        matched_skills: resume.skills.intersection(&jd.skills).cloned().collect(),
        missing_skills: jd.skills.difference(&resume.skills).cloned().collect(),
    }
}

/// Scores one resume against one job description.
///
/// Holds only read-only shared state, so a single engine can serve
/// concurrent requests.
pub struct MatchEngine {
    semantic: SemanticScorer,
    extractor: KeywordExtractor,
    synonyms: Arc<SynonymTable>,
    vocabulary: Arc<Vocabulary>,
    processor: TextProcessor,
}

impl MatchEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vocabulary: Arc<Vocabulary>,
        synonyms: Arc<SynonymTable>,
        match_mode: MatchMode,
    ) -> Result<Self> {
        let extractor = KeywordExtractor::new(&vocabulary, &synonyms, match_mode)?;
        log::debug!(
            "Match engine ready: {} vocabulary terms, {} synonyms, embedder '{}'",
            extractor.term_count(),
            synonyms.len(),
            embedder.name()
        );

        Ok(Self {
            semantic: SemanticScorer::new(embedder),
            extractor,
            synonyms,
            vocabulary,
            processor: TextProcessor::new(),
        })
    }

    /// Built-in vocabulary and synonyms with whole-word matching
    pub fn with_defaults(embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::new(
            embedder,
            Arc::new(Vocabulary::default()),
            Arc::new(SynonymTable::builtin()),
            MatchMode::default(),
        )
    }

    /// Keywords come from the normalized text, experience from the lowercased raw text
    pub fn extract_signals(&self, raw_text: &str) -> ExtractedSignals {
        let normalized = self.processor.normalize(raw_text);
        let matches = self.extractor.extract(&normalized);

        ExtractedSignals {
            skills: self.synonyms.normalize(&matches.skills),
            education: matches.education,
            roles: matches.roles,
            years_experience: extract_years(&self.processor.lowercase(raw_text)),
        }
    }

    pub fn score(&self, resume_text: &str, jd_text: &str) -> Result<MatchBreakdown> {
        if resume_text.trim().is_empty() {
            return Err(ScorerError::InvalidInput("Resume text is empty".to_string()));
        }
        if jd_text.trim().is_empty() {
            return Err(ScorerError::InvalidInput("Job description text is empty".to_string()));
        }

        let start_time = Instant::now();

        let resume_signals = self.extract_signals(resume_text);
        let jd_signals = self.extract_signals(jd_text);

        let semantic = self.semantic.similarity(
            &self.processor.normalize(resume_text),
            &self.processor.normalize(jd_text),
        )?;

        let breakdown = combine(&resume_signals, &jd_signals, f64::from(semantic));
        log::debug!(
            "Scored in {:.2?}: final {:.2}, semantic {:.2}, keyword {:.2}",
            start_time.elapsed(),
            breakdown.final_score,
            breakdown.semantic_score,
            breakdown.keyword_score
        );

        Ok(breakdown)
    }

    /// Section-weighted view of the same pair; empty input is rejected the same way
    pub fn score_sections(&self, resume_text: &str, jd_text: &str) -> Result<SectionBreakdown> {
        if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
            return Err(ScorerError::InvalidInput(
                "Section scoring needs both resume and job description text".to_string(),
            ));
        }

        let resume_skills = self.extract_signals(resume_text).skills;
        let jd_skills = self.extract_signals(jd_text).skills;
        SectionScorer::new(self.semantic.clone()).score(resume_text, jd_text, &resume_skills, &jd_skills)
    }

    pub fn embedder_name(&self) -> &str {
        self.semantic.embedder().name()
    }

    pub fn semantic_scorer(&self) -> &SemanticScorer {
        &self.semantic
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}
