//! Category vocabularies for skills, education and roles

use crate::error::{Result, ScorerError};
use crate::processing::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Static term lists used for deterministic presence matching.
///
/// Skills are grouped (programming, data, cloud, ...) only for readability of
/// vocabulary files; matching treats them as one flat set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub education: Vec<String>,
    pub roles: Vec<String>,
    pub skills: BTreeMap<String, Vec<String>>,
}

/// On-disk vocabulary: the three categories plus an optional synonym table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    education: Vec<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    synonyms: BTreeMap<String, Vec<String>>,
}

impl Vocabulary {
    /// Flattened, deduplicated, lowercased skill terms
    pub fn skill_terms(&self) -> Vec<String> {
        self.skills
            .values()
            .flatten()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn term_count(&self) -> usize {
        self.skill_terms().len() + self.education.len() + self.roles.len()
    }

    fn validate(&self) -> Result<()> {
        if self.skill_terms().is_empty() {
            return Err(ScorerError::Vocabulary("Vocabulary has no skill terms".to_string()));
        }
        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        let group = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let mut skills = BTreeMap::new();
        skills.insert(
            "programming".to_string(),
            group(&[
                "python", "java", "javascript", "typescript", "c++", "c#", "rust", "golang",
                "kotlin", "swift", "scala", "ruby", "php", "sql", "bash", "html", "css",
            ]),
        );
        skills.insert(
            "data".to_string(),
            group(&[
                "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras", "opencv",
                "nlp", "llm", "bert", "machine learning", "deep learning", "data analysis",
                "statistics", "spark", "hadoop", "airflow", "tableau", "power bi", "excel",
            ]),
        );
        skills.insert(
            "web".to_string(),
            group(&[
                "react", "angular", "vue", "node.js", "django", "flask", "fastapi",
                "spring boot", "streamlit", "graphql", "rest api",
            ]),
        );
        skills.insert(
            "cloud_devops".to_string(),
            group(&[
                "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins",
                "ci/cd", "linux", "git", "github", "supabase", "firebase", "selenium",
            ]),
        );
        skills.insert(
            "databases".to_string(),
            group(&["mysql", "postgresql", "mongodb", "redis", "sqlite", "elasticsearch"]),
        );
        skills.insert("tools".to_string(), group(&["vscode", "jira", "figma", "postman"]));
        skills.insert(
            "soft".to_string(),
            group(&[
                "communication", "problem solving", "leadership", "teamwork",
                "time management", "critical thinking",
            ]),
        );

        Self {
            education: group(&[
                "b.tech", "m.tech", "bachelor", "master", "phd", "ph.d", "bsc", "msc", "mba",
                "bca", "mca", "bachelors", "masters", "diploma", "graduate", "postgraduate",
                "doctorate",
            ]),
            roles: group(&[
                "software engineer", "software developer", "data scientist", "data analyst",
                "data engineer", "machine learning engineer", "ml engineer", "ai engineer",
                "backend developer", "frontend developer", "full stack developer",
                "web developer", "mobile developer", "devops engineer", "cloud engineer",
                "site reliability engineer", "qa engineer", "test engineer",
                "business analyst", "product manager", "project manager",
                "research scientist", "database administrator", "system administrator",
            ]),
            skills,
        }
    }
}

/// Parse a vocabulary file: `education`, `roles`, a `[skills]` table of
/// groups and an optional `[synonyms]` table
pub fn parse_vocabulary(content: &str) -> Result<(Vocabulary, SynonymTable)> {
    let file: VocabularyFile = toml::from_str(content)
        .map_err(|e| ScorerError::Vocabulary(format!("Failed to parse vocabulary: {}", e)))?;

    let vocabulary = Vocabulary {
        education: file.education,
        roles: file.roles,
        skills: file.skills,
    };
    vocabulary.validate()?;
    let synonyms = SynonymTable::new(file.synonyms)?;

    Ok((vocabulary, synonyms))
}

pub fn load_vocabulary(path: &Path) -> Result<(Vocabulary, SynonymTable)> {
    let content = std::fs::read_to_string(path)?;
    let loaded = parse_vocabulary(&content)?;
    log::info!(
        "Loaded vocabulary from {} ({} terms, {} synonyms)",
        path.display(),
        loaded.0.term_count(),
        loaded.1.len()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
education = ["bachelor", "master"]
roles = ["data analyst"]

[skills]
languages = ["Python", "SQL"]
tools = ["excel", "python"]

[synonyms]
python = ["py"]
"#;

    #[test]
    fn test_default_vocabulary_has_every_category() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.skill_terms().contains(&"power bi".to_string()));
        assert!(vocabulary.education.contains(&"b.tech".to_string()));
        assert!(vocabulary.roles.contains(&"data scientist".to_string()));
    }

    #[test]
    fn test_builtin_synonyms_target_vocabulary_terms() {
        let skills = Vocabulary::default().skill_terms();
        for canonical in SynonymTable::builtin().groups().keys() {
            assert!(skills.contains(canonical), "'{}' is not a skill term", canonical);
        }
    }

    #[test]
    fn test_parse_vocabulary_file() {
        let (vocabulary, synonyms) = parse_vocabulary(SAMPLE).unwrap();

        assert_eq!(vocabulary.skill_terms(), vec!["excel", "python", "sql"]);
        assert_eq!(vocabulary.education.len(), 2);
        assert_eq!(synonyms.canonical_of("py"), "python");
    }

    #[test]
    fn test_synonyms_are_optional() {
        let content = "education = []\nroles = []\n[skills]\nall = [\"rust\"]\n";
        let (_, synonyms) = parse_vocabulary(content).unwrap();
        assert!(synonyms.is_empty());
    }

    #[test]
    fn test_vocabulary_without_skills_is_rejected() {
        let content = "education = [\"phd\"]\nroles = []\n";
        assert!(matches!(parse_vocabulary(content), Err(ScorerError::Vocabulary(_))));
    }

    #[test]
    fn test_ambiguous_synonyms_in_file_are_rejected() {
        let content = "education = []\nroles = []\n[skills]\nall = [\"rust\"]\n[synonyms]\na = [\"x\"]\nb = [\"x\"]\n";
        assert!(matches!(parse_vocabulary(content), Err(ScorerError::Vocabulary(_))));
    }

    #[test]
    fn test_load_vocabulary_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vocabulary.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let (vocabulary, _) = load_vocabulary(&path).unwrap();
        assert_eq!(vocabulary.roles, vec!["data analyst"]);
    }
}
