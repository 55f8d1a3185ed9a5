//! Vocabulary keyword extraction

use crate::error::{Result, ScorerError};
use crate::processing::synonyms::SynonymTable;
use crate::processing::vocabulary::Vocabulary;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a vocabulary term must sit in the text to count as present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Present anywhere, including inside a longer word
    Substring,
    /// Both ends of the occurrence must fall on a non-alphanumeric boundary
    #[default]
    WholeWord,
}

/// Matched vocabulary terms for one document, per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatches {
    pub skills: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub roles: BTreeSet<String>,
}

/// Multi-pattern matcher over one list of terms
pub struct TermMatcher {
    automaton: AhoCorasick,
    terms: Vec<String>,
    mode: MatchMode,
}

impl TermMatcher {
    pub fn new<S: AsRef<str>>(terms: &[S], mode: MatchMode) -> Result<Self> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Standard match kind is required for overlapping search, which lets
        // "power bi" and "bi" both register when the vocabulary has both
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&terms)
            .map_err(|e| ScorerError::Vocabulary(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self { automaton, terms, mode })
    }

    /// Every term present in `text`, as a set
    pub fn find(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        for mat in self.automaton.find_overlapping_iter(text) {
            let term = &self.terms[mat.pattern().as_usize()];
            if found.contains(term) {
                continue;
            }
            if self.mode == MatchMode::WholeWord && !on_word_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            found.insert(term.clone());
        }

        found
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Extracts skills, education and role keywords with one automaton per category
pub struct KeywordExtractor {
    skills: TermMatcher,
    education: TermMatcher,
    roles: TermMatcher,
}

impl KeywordExtractor {
    /// Skill matching also covers every synonym surface form so aliases can be collapsed later
    pub fn new(vocabulary: &Vocabulary, synonyms: &SynonymTable, mode: MatchMode) -> Result<Self> {
        let mut skill_terms = vocabulary.skill_terms();
        skill_terms.extend(synonyms.surface_forms().map(str::to_string));

        Ok(Self {
            skills: TermMatcher::new(&skill_terms, mode)?,
            education: TermMatcher::new(&vocabulary.education, mode)?,
            roles: TermMatcher::new(&vocabulary.roles, mode)?,
        })
    }

    /// `text` is expected to be normalized already; matching is case-insensitive regardless
    pub fn extract(&self, text: &str) -> CategoryMatches {
        CategoryMatches {
            skills: self.skills.find(text),
            education: self.education.find(text),
            roles: self.roles.find(text),
        }
    }

    pub fn term_count(&self) -> usize {
        self.skills.len() + self.education.len() + self.roles.len()
    }
}

/// One-off extraction against an arbitrary term list
pub fn extract_keywords<S: AsRef<str>>(text: &str, terms: &[S], mode: MatchMode) -> Result<BTreeSet<String>> {
    Ok(TermMatcher::new(terms, mode)?.find(text))
}
