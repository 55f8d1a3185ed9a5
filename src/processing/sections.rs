//! Section-weighted semantic similarity.
//!
//! Supplements the whole-document score: each of the skills, experience and
//! education sections is located in both documents and compared on its own,
//! then blended with the Jaccard overlap of the two skill sets.

use crate::error::Result;
use crate::processing::embeddings::SemanticScorer;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SECTION_WEIGHTS: [(&str, f64); 3] = [("skills", 0.4), ("experience", 0.4), ("education", 0.2)];

pub const SECTION_SEMANTIC_WEIGHT: f64 = 0.6;
pub const SECTION_SKILL_WEIGHT: f64 = 0.4;

// A following heading is a line starting with a capital letter and containing a colon
static NEXT_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[A-Z][^\n]*:").expect("Invalid heading regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section: String,
    pub weight: f64,
    /// 0..1; 0 when the section is missing from either document
    pub similarity: f64,
    pub in_resume: bool,
    pub in_job: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBreakdown {
    pub sections: Vec<SectionScore>,
    /// Percentages with two decimals
    pub weighted_similarity: f64,
    pub skill_jaccard: f64,
    pub combined_score: f64,
}

/// Text from the first case-insensitive occurrence of `name` up to the next
/// heading line, or to the end of the document
pub fn extract_section(text: &str, name: &str) -> Option<String> {
    let header = Regex::new(&format!("(?i){}", regex::escape(name))).ok()?;
    let found = header.find(text)?;

    let rest = &text[found.end()..];
    let end = NEXT_HEADING
        .find(rest)
        .map(|m| found.end() + m.start())
        .unwrap_or(text.len());

    let section = text[found.start()..end].trim();
    (!section.is_empty()).then(|| section.to_string())
}

/// |A ∩ B| / |A ∪ B|, or 0 when either set is empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

fn to_percent(ratio: f64) -> f64 {
    ((ratio * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0
}

pub struct SectionScorer {
    semantic: SemanticScorer,
}

impl SectionScorer {
    pub fn new(semantic: SemanticScorer) -> Self {
        Self { semantic }
    }

    pub fn score(
        &self,
        resume_text: &str,
        jd_text: &str,
        resume_skills: &BTreeSet<String>,
        jd_skills: &BTreeSet<String>,
    ) -> Result<SectionBreakdown> {
        let mut sections = Vec::with_capacity(SECTION_WEIGHTS.len());
        let mut weighted = 0.0;

        for (name, weight) in SECTION_WEIGHTS {
            let resume_section = extract_section(resume_text, name);
            let jd_section = extract_section(jd_text, name);

            let similarity = match (&resume_section, &jd_section) {
                (Some(r), Some(j)) => f64::from(self.semantic.similarity(r, j)?).clamp(0.0, 1.0),
                _ => 0.0,
            };
            log::debug!("Section '{}' similarity {:.3}", name, similarity);

            weighted += weight * similarity;
            sections.push(SectionScore {
                section: name.to_string(),
                weight,
                similarity,
                in_resume: resume_section.is_some(),
                in_job: jd_section.is_some(),
            });
        }

        let skill_overlap = jaccard(resume_skills, jd_skills);
        let combined = SECTION_SEMANTIC_WEIGHT * weighted + SECTION_SKILL_WEIGHT * skill_overlap;

        Ok(SectionBreakdown {
            sections,
            weighted_similarity: to_percent(weighted),
            skill_jaccard: to_percent(skill_overlap),
            combined_score: to_percent(combined),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;
    use std::sync::Arc;

    const RESUME: &str = "Jane Doe\nSkills: Python, SQL, Tableau\nExperience: 4 years as data analyst\nEducation: Bachelor of Science";

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scorer() -> SectionScorer {
        SectionScorer::new(SemanticScorer::new(Arc::new(HashingEmbedder::default())))
    }

    #[test]
    fn test_section_weights_sum_to_one() {
        let total: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extract_section_stops_at_next_heading() {
        assert_eq!(
            extract_section(RESUME, "skills").as_deref(),
            Some("Skills: Python, SQL, Tableau")
        );
        assert_eq!(
            extract_section(RESUME, "education").as_deref(),
            Some("Education: Bachelor of Science")
        );
    }

    #[test]
    fn test_missing_section() {
        assert_eq!(extract_section(RESUME, "projects"), None);
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), 1.0 / 3.0);
        assert_eq!(jaccard(&set(&[]), &set(&["a"])), 0.0);
    }

    #[test]
    fn test_identical_documents_score_full() {
        let skills = set(&["python", "sql", "tableau"]);
        let breakdown = scorer().score(RESUME, RESUME, &skills, &skills).unwrap();

        assert!(breakdown.sections.iter().all(|s| s.in_resume && s.in_job));
        assert_eq!(breakdown.weighted_similarity, 100.0);
        assert_eq!(breakdown.combined_score, 100.0);
    }

    #[test]
    fn test_section_missing_in_job_scores_zero() {
        let jd = "Role overview\nSkills: Python and SQL";
        let breakdown = scorer().score(RESUME, jd, &set(&["python"]), &set(&["python"])).unwrap();

        let experience = &breakdown.sections[1];
        assert_eq!(experience.section, "experience");
        assert!(experience.in_resume);
        assert!(!experience.in_job);
        assert_eq!(experience.similarity, 0.0);
        assert!(breakdown.weighted_similarity <= 40.0);
    }
}
