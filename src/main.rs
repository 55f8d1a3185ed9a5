//! resume-scorer: resume vs. job description match scoring

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_scorer::config::Config;
use resume_scorer::error::{Result, ScorerError};
use resume_scorer::output::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_scorer::pipeline::{ScoreOptions, ScoringPipeline};
use resume_scorer::processing::embedding_manager::EmbeddingModelManager;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(if e.is_input_error() { 2 } else { 1 });
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            output,
            save,
            detailed,
            no_feedback,
            sections,
            embedding,
        } => {
            cli::validate_file_extension(&resume)
                .map_err(|e| ScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job)
                .map_err(|e| ScorerError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ScorerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;
            let options = ScoreOptions {
                feedback: !no_feedback,
                sections: sections || config.scoring.section_scoring,
                contact: detailed,
            };

            info!("Scoring {} against {}", resume.display(), job.display());

            let progress = spinner("Loading embedding model...");
            let pipeline = ScoringPipeline::from_config(&config, embedding.as_deref(), options.feedback).await;
            let pipeline = match pipeline {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(e);
                }
            };

            progress.set_message("Scoring...");
            let report = pipeline.score_files(&resume, &job, options).await;
            progress.finish_and_clear();
            let report = report?;

            let generator = ReportGenerator::with_options(config.output.color_output, detailed);
            let rendered = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    // Files never carry terminal color codes
                    let plain = ReportGenerator::with_options(false, detailed).generate_report(&report, output_format)?;
                    let path = resolve_save_path(&path, output_format, &resume);
                    save_report_to_file(&plain, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(&config.models).await?;

            match action {
                ModelAction::List => {
                    println!("{}\n", "Embedding models".bold());
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(&model.name) {
                            "downloaded".green()
                        } else {
                            "available".yellow()
                        };
                        let marker = if model.name == config.models.embedding_model { "*" } else { " " };
                        println!(
                            "{} {} ({}) - {} MB, {} dims [{}]",
                            marker, model.name, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    println!("\nModels directory: {}", manager.models_dir().display());
                }

                ModelAction::Download { model, force } => {
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ScorerError::ModelNotFound(model.clone()))?;

                    if manager.is_model_downloaded(&model_id) {
                        if !force {
                            println!("Model '{}' is already downloaded", model_id);
                            return Ok(());
                        }
                        manager.remove_model(&model_id).await?;
                    }

                    let path = manager.download_model(&model_id).await?;
                    println!("Model stored at {}", path.display());
                }

                ModelAction::Remove { model } => {
                    let model_id = manager.resolve_model_id(&model).unwrap_or(model);
                    manager.remove_model(&model_id).await?;
                    println!("Removed model '{}'", model_id);
                }

                ModelAction::Info { model } => {
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| ScorerError::ModelNotFound(model.clone()))?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| ScorerError::ModelNotFound(model_id.clone()))?;

                    println!("{}", info.name.bold());
                    println!("  Repository: {}", info.repo_id);
                    println!("  Size: {} MB", info.size_mb);
                    println!("  Dimensions: {}", info.dimensions);
                    println!("  Description: {}", info.description);
                    match manager.get_model_path(&model_id) {
                        Some(path) => println!("  Downloaded: {}", path.display()),
                        None => println!("  Downloaded: no (resume-scorer models download {})", model_id),
                    }
                }
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ScorerError::Configuration(e.to_string()))?;
                println!("# {}\n", config_path.display());
                println!("{}", content);
            }
            ConfigAction::Reset => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset to defaults at {}", config_path.display());
            }
            ConfigAction::Path => println!("{}", config_path.display()),
        },
    }

    Ok(())
}
