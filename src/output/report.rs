//! Report assembled from one scoring run

use crate::llm::FeedbackResult;
use crate::processing::contact::ContactInfo;
use crate::processing::scoring::MatchBreakdown;
use crate::processing::sections::SectionBreakdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs: the breakdown, optional extras and run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub breakdown: MatchBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub scorer_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub embedding_model: String,
    /// `None` when feedback was not requested
    pub feedback_provider: Option<String>,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Weak,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Verdict::Excellent,
            s if s >= 65.0 => Verdict::Good,
            s if s >= 50.0 => Verdict::Fair,
            _ => Verdict::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT MATCH",
            Verdict::Good => "GOOD MATCH",
            Verdict::Fair => "FAIR MATCH",
            Verdict::Weak => "WEAK MATCH",
        }
    }
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_file: impl Into<String>, embedding_model: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            scorer_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_file: job_file.into(),
            embedding_model: embedding_model.into(),
            feedback_provider: None,
            processing_time_ms: 0,
        }
    }
}

impl ScoreReport {
    pub fn new(breakdown: MatchBreakdown, metadata: ReportMetadata) -> Self {
        Self {
            breakdown,
            feedback: None,
            sections: None,
            contact: None,
            metadata,
        }
    }

    pub fn with_feedback(mut self, feedback: FeedbackResult, provider: impl Into<String>) -> Self {
        self.feedback = Some(feedback);
        self.metadata.feedback_provider = Some(provider.into());
        self
    }

    pub fn with_sections(mut self, sections: SectionBreakdown) -> Self {
        self.sections = Some(sections);
        self
    }

    /// Empty contact info is dropped
    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = (!contact.is_empty()).then_some(contact);
        self
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.metadata.processing_time_ms = millis;
        self
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.breakdown.final_score)
    }
}
