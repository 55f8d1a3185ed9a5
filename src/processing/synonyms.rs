//! Synonym collapsing for skill sets

use crate::error::{Result, ScorerError};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Canonical term -> surface forms that collapse onto it.
///
/// Construction rejects a synonym listed under two canonical terms and a
/// synonym that is itself some other canonical term; either would make
/// normalization order-dependent.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    groups: BTreeMap<String, BTreeSet<String>>,
    lookup: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new<I, S, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (canonical, synonyms) in entries {
            let canonical = clean(canonical.as_ref());
            if canonical.is_empty() {
                return Err(ScorerError::Vocabulary("Empty canonical term in synonym table".to_string()));
            }
            let group = groups.entry(canonical.clone()).or_default();
            for synonym in synonyms {
                let synonym = clean(synonym.as_ref());
                if !synonym.is_empty() && synonym != canonical {
                    group.insert(synonym);
                }
            }
        }

        let mut lookup = HashMap::new();
        for (canonical, synonyms) in &groups {
            for synonym in synonyms {
                if groups.contains_key(synonym) {
                    return Err(ScorerError::Vocabulary(format!(
                        "Synonym '{}' of '{}' is also a canonical term",
                        synonym, canonical
                    )));
                }
                if let Some(previous) = lookup.insert(synonym.clone(), canonical.clone()) {
                    return Err(ScorerError::Vocabulary(format!(
                        "Synonym '{}' maps to both '{}' and '{}'",
                        synonym, previous, canonical
                    )));
                }
            }
        }

        Ok(Self { groups, lookup })
    }

    /// Replace every synonym with its canonical term; unmapped terms pass through
    pub fn normalize(&self, terms: &BTreeSet<String>) -> BTreeSet<String> {
        terms.iter().map(|term| self.canonical_of(term).to_string()).collect()
    }

    pub fn canonical_of<'a>(&'a self, term: &'a str) -> &'a str {
        self.lookup.get(term).map(String::as_str).unwrap_or(term)
    }

    /// All surface forms, canonical terms included
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|(canonical, synonyms)| std::iter::once(canonical).chain(synonyms.iter()))
            .map(String::as_str)
    }

    pub fn groups(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Tool and skill aliases matching the built-in vocabulary
    pub fn builtin() -> Self {
        let entries: [(&str, &[&str]); 16] = [
            ("scikit-learn", &["sklearn", "scikit learn"]),
            ("power bi", &["powerbi", "microsoft power bi"]),
            ("vscode", &["vs code", "visual studio code"]),
            ("postgresql", &["postgres"]),
            ("kubernetes", &["k8s"]),
            ("tensorflow", &["tensor flow"]),
            ("nlp", &["natural language processing"]),
            ("llm", &["large language model"]),
            ("excel", &["ms excel", "microsoft excel"]),
            ("javascript", &["ecmascript"]),
            ("c++", &["cpp"]),
            ("node.js", &["nodejs", "node js"]),
            ("aws", &["amazon web services"]),
            ("gcp", &["google cloud platform", "google cloud"]),
            ("ci/cd", &["cicd", "continuous integration"]),
            ("problem solving", &["problem-solving"]),
        ];

        // Checked by test_builtin_table_is_valid
        Self::new(entries.iter().map(|(c, s)| (*c, s.iter().copied())))
            .expect("built-in synonym table is consistent")
    }
}

fn clean(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn py_table() -> SynonymTable {
        SynonymTable::new([("python", vec!["py", "python3"])]).unwrap()
    }

    #[test]
    fn test_synonyms_collapse_to_canonical() {
        let table = py_table();
        assert_eq!(table.normalize(&set(&["py", "pandas"])), set(&["python", "pandas"]));
    }

    #[test]
    fn test_duplicate_forms_merge() {
        let table = py_table();
        assert_eq!(table.normalize(&set(&["py", "python3", "python"])), set(&["python"]));
    }

    #[test]
    fn test_unmapped_terms_pass_through() {
        let table = py_table();
        let input = set(&["sql", "rust"]);
        assert_eq!(table.normalize(&input), input);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = SynonymTable::builtin();
        let once = table.normalize(&set(&["sklearn", "k8s", "postgres", "docker"]));
        assert_eq!(once, set(&["scikit-learn", "kubernetes", "postgresql", "docker"]));
        assert_eq!(table.normalize(&once), once);
    }

    #[test]
    fn test_ambiguous_synonym_is_rejected() {
        let result = SynonymTable::new([("python", vec!["py"]), ("pytorch", vec!["py"])]);
        assert!(matches!(result, Err(ScorerError::Vocabulary(_))));
    }

    #[test]
    fn test_synonym_that_is_canonical_is_rejected() {
        let result = SynonymTable::new([("javascript", vec!["js"]), ("js", vec!["jscript"])]);
        assert!(matches!(result, Err(ScorerError::Vocabulary(_))));
    }

    #[test]
    fn test_self_synonym_and_case_are_cleaned() {
        let table = SynonymTable::new([(" Python ", vec!["PY", "python"])]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.canonical_of("py"), "python");
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let table = SynonymTable::builtin();
        assert!(!table.is_empty());
        assert!(table.surface_forms().any(|form| form == "k8s"));
    }
}
