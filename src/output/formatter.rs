//! Console, JSON and Markdown renderings of a score report

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::FeedbackSource;
use crate::output::report::{ScoreReport, Verdict};
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.color(Color::Blue).bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn score_color(score: f64) -> Color {
        match Verdict::from_score(score) {
            Verdict::Excellent => Color::Green,
            Verdict::Good => Color::BrightGreen,
            Verdict::Fair => Color::Yellow,
            Verdict::Weak => Color::Red,
        }
    }

    fn format_score_line(&self, label: &str, score: f64) -> String {
        let value = format!("{:>6.2}%", score);
        format!("  {:<22}{}\n", label, self.colorize(&value, Self::score_color(score)))
    }

    fn format_list(&self, label: &str, items: &[String], color: Color) -> String {
        if items.is_empty() {
            format!("  {:<22}-\n", label)
        } else {
            format!("  {:<22}{}\n", label, self.colorize(&items.join(", "), color))
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let b = &report.breakdown;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH SCORE"));
        let verdict = report.verdict();
        let badge = if self.use_colors {
            verdict.label().color(Self::score_color(b.final_score)).bold().to_string()
        } else {
            verdict.label().to_string()
        };
        let _ = writeln!(output, "  Final score: {:.2}% [{}]", b.final_score, badge);

        output.push_str(&self.format_header("Breakdown"));
        output.push_str(&self.format_score_line("Semantic similarity", b.semantic_score));
        output.push_str(&self.format_score_line("Keyword score", b.keyword_score));
        output.push_str(&self.format_score_line("Skills matched", b.skill_match_ratio));
        output.push_str(&self.format_score_line("Education matched", b.edu_match_ratio));
        output.push_str(&self.format_score_line("Experience", b.exp_match_ratio));
        let role = if b.role_match {
            self.colorize("yes", Color::Green)
        } else {
            self.colorize("no", Color::Red)
        };
        let _ = writeln!(output, "  {:<22}{}", "Role match", role);
        let _ = writeln!(output, "  {:<22}{} resume / {} required", "Years of experience", b.resume_exp, b.jd_exp);

        output.push_str(&self.format_header("Skills"));
        output.push_str(&self.format_list("Matched", &b.matched_skills, Color::Green));
        output.push_str(&self.format_list("Missing", &b.missing_skills, Color::Yellow));

        if let Some(feedback) = &report.feedback {
            let title = match feedback.source {
                FeedbackSource::Llm => "Feedback",
                FeedbackSource::Fallback => "Feedback (keyword-based)",
            };
            output.push_str(&self.format_header(title));
            let _ = writeln!(output, "  Reviewer score: {}/100", feedback.score);
            for item in &feedback.feedback {
                let _ = writeln!(output, "  - {}", item);
            }
        }

        if self.detailed {
            if let Some(sections) = &report.sections {
                output.push_str(&self.format_header("Sections"));
                for section in &sections.sections {
                    let presence = match (section.in_resume, section.in_job) {
                        (true, true) => String::new(),
                        (false, _) => " (missing in resume)".to_string(),
                        (true, false) => " (missing in job)".to_string(),
                    };
                    let _ = writeln!(
                        output,
                        "  {:<12} weight {:.1}  similarity {:.3}{}",
                        section.section, section.weight, section.similarity, presence
                    );
                }
                output.push_str(&self.format_score_line("Section similarity", sections.weighted_similarity));
                output.push_str(&self.format_score_line("Skill overlap", sections.skill_jaccard));
                output.push_str(&self.format_score_line("Section score", sections.combined_score));
            }

            if let Some(contact) = &report.contact {
                output.push_str(&self.format_header("Contact"));
                let _ = writeln!(output, "  Email: {}", contact.email.as_deref().unwrap_or("-"));
                let _ = writeln!(output, "  Phone: {}", contact.phone.as_deref().unwrap_or("-"));
            }

            let meta = &report.metadata;
            output.push_str(&self.format_header("Run"));
            let _ = writeln!(output, "  Resume: {}", meta.resume_file);
            let _ = writeln!(output, "  Job: {}", meta.job_file);
            let _ = writeln!(output, "  Embedding model: {}", meta.embedding_model);
            if let Some(provider) = &meta.feedback_provider {
                let _ = writeln!(output, "  Feedback provider: {}", provider);
            }
            let _ = writeln!(
                output,
                "  Generated: {} | Processing time: {}ms",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                meta.processing_time_ms
            );
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skills_cell(items: &[String]) -> String {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.iter().map(|s| format!("`{}`", s)).collect::<Vec<_>>().join(", ")
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let b = &report.breakdown;
        let mut md = String::new();

        let _ = writeln!(md, "# Resume Match Report\n");
        let _ = writeln!(md, "**Final score:** {:.2}% ({})\n", b.final_score, report.verdict().label());

        let _ = writeln!(md, "## Breakdown\n");
        let _ = writeln!(md, "| Component | Value |");
        let _ = writeln!(md, "|---|---|");
        let _ = writeln!(md, "| Semantic similarity | {:.2}% |", b.semantic_score);
        let _ = writeln!(md, "| Keyword score | {:.2}% |", b.keyword_score);
        let _ = writeln!(md, "| Skills matched | {:.2}% |", b.skill_match_ratio);
        let _ = writeln!(md, "| Education matched | {:.2}% |", b.edu_match_ratio);
        let _ = writeln!(md, "| Role match | {} |", if b.role_match { "yes" } else { "no" });
        let _ = writeln!(md, "| Experience | {:.2}% ({} / {} years) |", b.exp_match_ratio, b.resume_exp, b.jd_exp);

        let _ = writeln!(md, "\n## Skills\n");
        let _ = writeln!(md, "- **Matched:** {}", Self::skills_cell(&b.matched_skills));
        let _ = writeln!(md, "- **Missing:** {}", Self::skills_cell(&b.missing_skills));

        if let Some(feedback) = &report.feedback {
            let source = match feedback.source {
                FeedbackSource::Llm => "LLM",
                FeedbackSource::Fallback => "keyword fallback",
            };
            let _ = writeln!(md, "\n## Feedback\n");
            let _ = writeln!(md, "Reviewer score: **{}/100** ({})\n", feedback.score, source);
            for item in &feedback.feedback {
                let _ = writeln!(md, "- {}", item);
            }
        }

        if let Some(sections) = &report.sections {
            let _ = writeln!(md, "\n## Sections\n");
            let _ = writeln!(md, "| Section | Weight | Similarity |");
            let _ = writeln!(md, "|---|---|---|");
            for section in &sections.sections {
                let _ = writeln!(md, "| {} | {:.1} | {:.3} |", section.section, section.weight, section.similarity);
            }
            let _ = writeln!(md, "\nSection score: **{:.2}%**", sections.combined_score);
        }

        if self.include_metadata {
            let meta = &report.metadata;
            let _ = writeln!(md, "\n---\n");
            let _ = writeln!(
                md,
                "_Generated {} by resume-scorer {} using `{}` ({} ms)._",
                meta.generated_at.format("%Y-%m-%d %H:%M UTC"),
                meta.scorer_version,
                meta.embedding_model,
                meta.processing_time_ms
            );
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(detailed),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// An existing directory receives a generated `<resume>_score_<timestamp>` file
pub fn resolve_save_path(save: &Path, format: OutputFormat, resume: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        save.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_score{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::tests::sample_report;
    use crate::processing::contact::ContactInfo;

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Final score: 72.40% [GOOD MATCH]"));
        assert!(output.contains("python, sql"));
        assert!(output.contains("tableau"));
        assert!(output.contains("- Add Tableau"));
        assert!(!output.contains("Embedding model"));
    }

    #[test]
    fn test_console_detailed_includes_run_and_contact() {
        let report = sample_report().with_contact(ContactInfo {
            email: Some("jane@example.com".to_string()),
            phone: None,
        });
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();

        assert!(output.contains("Embedding model: potion-base-8M"));
        assert!(output.contains("Email: jane@example.com"));
        assert!(output.contains("Phone: -"));
    }

    #[test]
    fn test_json_round_trips_breakdown() {
        let json = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["breakdown"]["final_score"], 72.4);
        assert_eq!(value["breakdown"]["role_match"], true);
        assert_eq!(value["feedback"]["source"], "llm");
        assert!(value.get("sections").is_none());
    }

    #[test]
    fn test_markdown_has_tables_and_feedback() {
        let md = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();

        assert!(md.starts_with("# Resume Match Report"));
        assert!(md.contains("| Skills matched | 66.67% |"));
        assert!(md.contains("`tableau`"));
        assert!(md.contains("Reviewer score: **74/100** (LLM)"));
        assert!(md.contains("resume-scorer"));
    }

    #[test]
    fn test_generator_dispatches_by_format() {
        let generator = ReportGenerator::with_options(false, false);
        let report = sample_report();

        assert!(generator.generate_report(&report, OutputFormat::Json).unwrap().starts_with('{'));
        assert!(generator.generate_report(&report, OutputFormat::Markdown).unwrap().starts_with('#'));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf", false), "jane_score.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "jane.txt", false), "jane_score.md");
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }

    #[test]
    fn test_save_into_directory_uses_generated_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let resume = Path::new("cv/jane.pdf");

        let path = resolve_save_path(dir.path(), OutputFormat::Json, resume);
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_score_") && name.ends_with(".json"), "{}", name);

        let explicit = dir.path().join("mine.md");
        assert_eq!(resolve_save_path(&explicit, OutputFormat::Markdown, resume), explicit);
    }
}
