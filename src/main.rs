use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use storyloom::config::Config;
use storyloom::feedback::FeedbackStore;
use storyloom::llm::{GeminiClient, GeminiConfig};
use storyloom::pipeline::{Pipeline, RunContext, StoryReport};
use storyloom::preferences::{PreferenceStore, StoryFormat, StoryPreferences, Tone};
use storyloom::story::{SectionKind, Story};
use storyloom::summary::DataInspector;

mod cli;

use cli::Cli;
use cli::interact;

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storyloom")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("storyloom.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Apply CLI overrides on top of stored preferences.
///
/// Invalid tone/format values are dropped with a warning rather than
/// aborting the run.
fn apply_overrides(prefs: &mut StoryPreferences, cli: &Cli) {
    if let Some(tone) = &cli.tone {
        match Tone::from_str(tone) {
            Ok(t) => prefs.tone = t,
            Err(e) => eprintln!("{} {}", "Ignoring --tone:".yellow(), e),
        }
    }

    if let Some(format) = &cli.format {
        match StoryFormat::from_str(format) {
            Ok(f) => prefs.format = f,
            Err(e) => eprintln!("{} {}", "Ignoring --format:".yellow(), e),
        }
    }

    if let Some(areas) = cli.focus_areas() {
        if !areas.is_empty() {
            prefs.focus_areas = areas;
        }
    }
}

fn print_story(story: &Story) {
    println!("\n{}\n", "=".repeat(50));
    println!("FINAL STORY:\n");
    println!("{}", story);
    println!("\n{}", "=".repeat(50));
}

/// Post-run feedback flow: collect, persist, apply section updates.
async fn run_feedback_flow(
    pipeline: &Pipeline,
    config: &Config,
    user_id: &str,
    prefs_store: &PreferenceStore,
    mut story: Story,
) -> Result<()> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut writer = std::io::stdout();

    let answer = interact::get_user_input(
        &mut reader,
        &mut writer,
        "\nWould you like to provide feedback?",
        Some("n"),
        Some(&["y", "n"]),
    )?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(());
    }

    let record = interact::collect_story_feedback(&mut reader, &mut writer)?;
    if record.is_empty() {
        return Ok(());
    }

    let feedback_store =
        FeedbackStore::new(&config.storage.feedback_dir).context("Failed to open feedback store")?;
    feedback_store
        .append(user_id, &record)
        .context("Failed to save feedback")?;

    if !record.preferences.is_empty() {
        let updated = prefs_store
            .update_from_feedback(user_id, &record.preferences)
            .context("Failed to update preferences")?;

        println!("\nThank you for your feedback! Your preferences have been updated.");
        println!("\nUpdated preferences:");
        println!("- Tone: {}", updated.tone);
        println!("- Format: {}", updated.format);
        println!("- Focus areas: {}", updated.focus_areas.join(", "));
    }

    for (section, instruction) in &record.story_feedback {
        let Some(kind) = SectionKind::parse(section) else {
            continue;
        };
        story = pipeline
            .refiner()
            .regenerate_section(&story, kind, instruction)
            .await
            .context("Failed to regenerate section")?;
        println!("\nUpdated {} section of the story.", kind);
    }

    if !record.story_feedback.is_empty() {
        println!("\nUpdated Story:");
        println!("{}", story);
    }

    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.verbose {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let session_id = format!(
        "story_critique_session_{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S")
    );

    let inspector = DataInspector::new();
    let data_summary = inspector.summarize(&cli.data_source);

    let prefs_store =
        PreferenceStore::new(&config.storage.preferences_dir).context("Failed to open preference store")?;
    let mut preferences = prefs_store.get_user_preferences(&cli.user_id);
    apply_overrides(&mut preferences, cli);

    if cli.save_preferences {
        prefs_store
            .save_user_preferences(&cli.user_id, &preferences)
            .context("Failed to save preferences")?;
        println!("Saved preferences for user {}", cli.user_id);
    }

    let gemini_config = GeminiConfig {
        model: config.llm.model.clone(),
        max_tokens: config.llm.max_tokens,
        timeout: Duration::from_millis(config.llm.timeout_ms),
    };
    let client = GeminiClient::new(gemini_config).context("Failed to create LLM client")?;
    let pipeline = Pipeline::new(Arc::new(client), config.refinement());

    let context = RunContext::new(data_summary, cli.audience.clone(), preferences);

    println!("{} {}", "Starting Data Storytelling session".cyan(), session_id);
    println!("Data source: {}", cli.data_source);
    println!("Target audience: {}", cli.audience);
    println!("Generating story with self-critique loop...\n");

    let StoryReport {
        story,
        termination,
        iterations,
    } = pipeline.run(&context).await.context("Pipeline failed")?;

    info!(
        "Pipeline finished ({}, {} iterations)",
        termination, iterations
    );

    match &cli.output {
        Some(path) => {
            // Written only after the finalizer succeeded; a failed run leaves
            // no partial story behind
            fs::write(path, story.text())
                .with_context(|| format!("Failed to write story to {}", path.display()))?;
            println!("\n{} {}", "Story written to".green(), path.display());
        }
        None => {
            print_story(&story);
            run_feedback_flow(&pipeline, config, &cli.user_id, &prefs_store, story).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await
}
