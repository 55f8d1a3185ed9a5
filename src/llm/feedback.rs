//! Feedback adapter: one LLM attempt, deterministic fallback on any failure

use crate::error::{Result, ScorerError};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::llm::{FeedbackProvider, FeedbackResult, FeedbackSource};
use crate::processing::scoring::{combine, MatchEngine};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const MAX_FEEDBACK_ITEMS: usize = 3;

const EMPTY_INPUT_FEEDBACK: &str =
    "Resume or job description is empty, so no meaningful feedback could be generated.";

#[derive(Debug, Deserialize)]
struct RawFeedback {
    score: Value,
    #[serde(default)]
    feedback: Vec<Value>,
}

pub struct FeedbackAdapter {
    provider: Arc<dyn FeedbackProvider>,
    engine: Arc<MatchEngine>,
    templates: PromptTemplates,
}

impl FeedbackAdapter {
    pub fn new(provider: Arc<dyn FeedbackProvider>, engine: Arc<MatchEngine>) -> Self {
        Self {
            provider,
            engine,
            templates: PromptTemplates::default(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Never fails: provider errors and malformed responses produce the fallback record
    pub async fn get_feedback(&self, resume_text: &str, jd_text: &str) -> FeedbackResult {
        if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
            return empty_input_feedback();
        }

        let prompt = self.templates.render_feedback(&PromptParams {
            resume_content: resume_text.to_string(),
            job_content: jd_text.to_string(),
        });

        let parsed = match self.provider.complete(&prompt).await {
            Ok(response) => parse_feedback(&response),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(result) => {
                log::debug!("Feedback from {}: score {}", self.provider.name(), result.score);
                result
            }
            Err(e) => {
                log::warn!("LLM feedback unavailable ({}), using keyword fallback", e);
                self.fallback(resume_text, jd_text)
            }
        }
    }

    /// Feedback derived from keyword overlap alone, with no embedding call
    pub fn fallback(&self, resume_text: &str, jd_text: &str) -> FeedbackResult {
        if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
            return empty_input_feedback();
        }

        let resume = self.engine.extract_signals(resume_text);
        let jd = self.engine.extract_signals(jd_text);
        let breakdown = combine(&resume, &jd, 0.0);

        let matched = if breakdown.matched_skills.is_empty() {
            "No skills named in the job description were found in the resume.".to_string()
        } else {
            format!("Matched skills: {}.", breakdown.matched_skills.join(", "))
        };

        let missing = if jd.skills.is_empty() {
            "The job description names no recognised skills to compare against.".to_string()
        } else if breakdown.missing_skills.is_empty() {
            "The resume covers every skill the job description names.".to_string()
        } else {
            format!("Missing skills: {}.", breakdown.missing_skills.join(", "))
        };

        let experience = if breakdown.jd_exp > 0.0 {
            format!(
                "Experience: {} years found against {} years required.",
                breakdown.resume_exp, breakdown.jd_exp
            )
        } else {
            "The job description states no years-of-experience requirement.".to_string()
        };

        FeedbackResult {
            score: breakdown.keyword_score.round().clamp(0.0, 100.0) as u8,
            feedback: vec![matched, missing, experience],
            source: FeedbackSource::Fallback,
        }
    }
}

fn empty_input_feedback() -> FeedbackResult {
    FeedbackResult {
        score: 0,
        feedback: vec![EMPTY_INPUT_FEEDBACK.to_string()],
        source: FeedbackSource::Fallback,
    }
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line. A fence on a
    // single line keeps everything; the object search skips any info string.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_score(value: &Value) -> Option<u8> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (0.0..=100.0).contains(&score).then(|| score.round() as u8)
}

/// Validate a model response against the `{"score", "feedback"}` contract
pub fn parse_feedback(response: &str) -> Result<FeedbackResult> {
    let body = strip_code_fences(response);

    let (start, end) = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ScorerError::Feedback("Response contained no JSON object".to_string())),
    };

    let raw: RawFeedback = serde_json::from_str(&body[start..=end])
        .map_err(|e| ScorerError::Feedback(format!("Response was not valid JSON: {}", e)))?;

    let score = parse_score(&raw.score)
        .ok_or_else(|| ScorerError::Feedback(format!("Score {} is not between 0 and 100", raw.score)))?;

    let feedback: Vec<String> = raw
        .feedback
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(MAX_FEEDBACK_ITEMS)
        .map(str::to_string)
        .collect();

    if feedback.is_empty() {
        return Err(ScorerError::Feedback("Response had no feedback items".to_string()));
    }

    Ok(FeedbackResult {
        score,
        feedback,
        source: FeedbackSource::Llm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::DisabledProvider;
    use crate::processing::embeddings::HashingEmbedder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const RESUME: &str = "Data analyst, 2 years with Python and SQL";
    const JOB: &str = "Data analyst needed: 4 years, Python, SQL and Tableau";

    struct CannedProvider {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedProvider {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FeedbackProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn engine() -> Arc<MatchEngine> {
        Arc::new(MatchEngine::with_defaults(Arc::new(HashingEmbedder::default())).unwrap())
    }

    #[tokio::test]
    async fn test_valid_response_is_used() {
        let provider = Arc::new(CannedProvider::new(
            "```json\n{\"score\": 78, \"feedback\": [\"Good SQL\", \"Add Tableau\"]}\n```",
        ));
        let adapter = FeedbackAdapter::new(provider.clone(), engine());

        let result = adapter.get_feedback(RESUME, JOB).await;
        assert_eq!(result.source, FeedbackSource::Llm);
        assert_eq!(result.score, 78);
        assert_eq!(result.feedback, vec!["Good SQL", "Add Tableau"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_falls_back() {
        let adapter = FeedbackAdapter::new(Arc::new(DisabledProvider::new("boom")), engine());

        let result = adapter.get_feedback(RESUME, JOB).await;
        assert_eq!(result.source, FeedbackSource::Fallback);
        assert!(!result.feedback.is_empty() && result.feedback.len() <= MAX_FEEDBACK_ITEMS);
        assert!(result.feedback[0].contains("python"));
        assert!(result.feedback[1].contains("tableau"));
        assert!(result.feedback[2].contains("2 years found against 4 years"));
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back_after_one_attempt() {
        let provider = Arc::new(CannedProvider::new("I think this resume is great!"));
        let adapter = FeedbackAdapter::new(provider.clone(), engine());

        let result = adapter.get_feedback(RESUME, JOB).await;
        assert_eq!(result.source, FeedbackSource::Fallback);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let provider = Arc::new(CannedProvider::new("{\"score\": 90, \"feedback\": [\"x\"]}"));
        let adapter = FeedbackAdapter::new(provider.clone(), engine());

        let result = adapter.get_feedback("   ", JOB).await;
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fallback_score_is_rounded_keyword_score() {
        let engine = engine();
        let adapter = FeedbackAdapter::new(Arc::new(DisabledProvider::new("off")), engine.clone());

        let expected = combine(&engine.extract_signals(RESUME), &engine.extract_signals(JOB), 0.0)
            .keyword_score
            .round() as u8;
        assert_eq!(adapter.fallback(RESUME, JOB).score, expected);
    }

    #[test]
    fn test_parse_takes_outermost_object() {
        let result = parse_feedback("Sure! {\"score\": 55, \"feedback\": [\"a\"]} Hope this helps").unwrap();
        assert_eq!(result.score, 55);
    }

    #[test]
    fn test_parse_single_line_fence() {
        let result = parse_feedback("```{\"score\": 70, \"feedback\": [\"ok\"]}```").unwrap();
        assert_eq!(result.score, 70);
        assert_eq!(result.feedback, vec!["ok"]);

        let tagged = parse_feedback("```json {\"score\": 41, \"feedback\": [\"fine\"]}```").unwrap();
        assert_eq!(tagged.score, 41);
    }

    #[test]
    fn test_parse_truncates_and_drops_blank_items() {
        let result = parse_feedback(r#"{"score": 60, "feedback": ["", "one", "  ", "two", "three", "four"]}"#).unwrap();
        assert_eq!(result.feedback, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parse_accepts_numeric_strings_and_rounds() {
        assert_eq!(parse_feedback(r#"{"score": "81", "feedback": ["a"]}"#).unwrap().score, 81);
        assert_eq!(parse_feedback(r#"{"score": 72.6, "feedback": ["a"]}"#).unwrap().score, 73);
    }

    #[test]
    fn test_parse_rejects_contract_violations() {
        for response in [
            r#"{"score": 140, "feedback": ["a"]}"#,
            r#"{"score": -1, "feedback": ["a"]}"#,
            r#"{"score": 50, "feedback": []}"#,
            r#"{"score": 50, "feedback": ["   "]}"#,
            r#"{"feedback": ["a"]}"#,
            r#"{"score": 50, "feedback": ["a"]"#,
            "no json here",
        ] {
            assert!(parse_feedback(response).is_err(), "accepted: {}", response);
        }
    }
}
