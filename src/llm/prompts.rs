//! Prompt template for resume feedback

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub feedback: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            feedback: FEEDBACK_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn render_feedback(&self, params: &PromptParams) -> String {
        log::debug!(
            "Rendering feedback prompt (resume {} chars, job {} chars)",
            params.resume_content.len(),
            params.job_content.len()
        );

        // Job first so a resume containing "{job}" cannot inject into the template
        self.feedback
            .replace("{job}", &params.job_content)
            .replace("{resume}", &params.resume_content)
    }
}

const FEEDBACK_TEMPLATE: &str = r#"You are an AI resume evaluator.

Given the following job description and resume, analyze how well the resume matches the job description.
Score the resume out of 100 and give your reasoning in at most 3 short bullet points.

Job Description:
{job}

Resume:
{resume}

Respond with JSON only, in exactly this format:
{
    "score": <integer from 0 to 100>,
    "feedback": [
        "point 1",
        "point 2",
        "point 3"
    ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params(resume: &str, job: &str) -> PromptParams {
        PromptParams {
            resume_content: resume.to_string(),
            job_content: job.to_string(),
        }
    }

    #[test]
    fn test_feedback_prompt_embeds_both_texts() {
        let prompt = PromptTemplates::default().render_feedback(&params(
            "Software Engineer with Python experience at Tech Corp.",
            "Senior Software Engineer role requiring React and Python.",
        ));

        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp."));
        assert!(prompt.contains("Senior Software Engineer role requiring React and Python."));
        assert!(prompt.contains("\"score\""));
        assert!(prompt.contains("\"feedback\""));
    }

    #[test]
    fn test_job_appears_before_resume() {
        let prompt = PromptTemplates::default().render_feedback(&params("RESUME_TEXT", "JOB_TEXT"));
        let job_at = prompt.find("JOB_TEXT").unwrap();
        let resume_at = prompt.find("RESUME_TEXT").unwrap();
        assert!(job_at < resume_at);
    }

    #[test]
    fn test_placeholders_in_resume_are_left_alone() {
        let prompt = PromptTemplates::default().render_feedback(&params("my {job} history", "Rust role"));
        assert!(prompt.contains("my {job} history"));
    }
}
