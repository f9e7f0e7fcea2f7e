//! SignBridge - Text to sign language translation
//!
//! Command-line entry point: translate text, play the resulting signs,
//! and manage saved conversations.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use signbridge::cli::{Args, Commands, HistoryAction};
use signbridge::config::Config;
use signbridge::error::SignBridgeError;
use signbridge::history::ConversationHistory;
use signbridge::language::LanguageMode;
use signbridge::playback::{PlaybackPhase, PlaybackSnapshot, PlayerFactory};
use signbridge::session::{SignSession, ViewStatus};
use signbridge::signs::{SignCatalog, SignLookup, SignMatch, TokenRole};
use signbridge::transliterate::Transliterator;
use signbridge::workflow::{SignWorkflow, TranslationOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("signbridge.toml").exists() {
                info!("Found signbridge.toml in current directory, loading...");
                Config::from_file("signbridge.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Transliterate { text, language } => {
            let mode: LanguageMode = language.parse()?;
            let transliterator = Transliterator::for_mode(mode).ok_or_else(|| {
                SignBridgeError::Config(format!("{} input is not transliterated", mode))
            })?;
            println!("{}", transliterator.transliterate(&text));
        }
        Commands::Translate { text, language, save } => {
            let mode: LanguageMode = language.parse()?;
            let catalog = SignCatalog::from_config(&config.signs)?;
            let workflow = SignWorkflow::new(&config, Arc::new(catalog));

            let outcome = workflow.translate(&text, mode).await?;
            print_outcome(&outcome);

            if save {
                let mut history = ConversationHistory::from_config(&config.history).await?;
                let record = history.save(outcome.to_draft()).await?;
                println!("\nSaved as {}", record.id);
            }
        }
        Commands::Play {
            text,
            language,
            dry_run,
            rate,
        } => {
            let mode: LanguageMode = language.parse()?;
            if let Some(rate) = rate {
                config.playback.rate = rate;
                config.validate()?;
            }

            let catalog = SignCatalog::from_config(&config.signs)?;
            let workflow = Arc::new(SignWorkflow::new(&config, Arc::new(catalog)));
            let player = PlayerFactory::create_player(&config.playback, dry_run)?;
            let mut session = SignSession::new(workflow, player, config.playback.clone(), mode);

            match session.submit(&text).await.clone() {
                ViewStatus::Failed(message) => {
                    return Err(SignBridgeError::Translation(message).into());
                }
                ViewStatus::NoSigns => {
                    if let Some(outcome) = session.outcome() {
                        print_outcome(outcome);
                    }
                    println!("\nNo signs available for this text.");
                    return Ok(());
                }
                _ => {}
            }

            if let Some(controller) = session.playback_mut() {
                let pb = ProgressBar::new(controller.playlist().len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                        .progress_chars("#>-"),
                );

                render_progress(&pb, &controller.start());
                while let Some(snapshot) = controller.next_event().await {
                    render_progress(&pb, &snapshot);
                }

                let state = controller.state();
                pb.finish_with_message("done");
                if let Some(error) = state.last_error {
                    println!("Some signs were skipped ({})", error);
                }
            }
        }
        Commands::History { action } => {
            let mut history = ConversationHistory::from_config(&config.history).await?;

            match action {
                HistoryAction::List { limit } => {
                    let records = history.list(limit).await?;
                    if records.is_empty() {
                        println!("No saved conversations.");
                    } else {
                        println!("{:<38} {:<9} {:<10} {:<30} {:<30}", "Id", "Language", "Saved", "Input", "Gloss");
                        println!("{}", "-".repeat(120));
                        for record in records {
                            let saved_ago = (Utc::now() - record.created_at).num_seconds().max(0) as u64;
                            println!(
                                "{:<38} {:<9} {:<10} {:<30} {:<30}",
                                record.id,
                                record.language_mode,
                                format_duration(saved_ago),
                                record.input_text,
                                record.english_gloss
                            );
                        }
                    }
                }
                HistoryAction::Delete { id } => {
                    let id = Uuid::parse_str(&id)
                        .map_err(|e| SignBridgeError::Config(format!("Invalid conversation id '{}': {}", id, e)))?;
                    let record = history.delete(id).await?;
                    println!("Deleted '{}'", record.input_text);
                }
                HistoryAction::Clear => {
                    history.clear_all().await?;
                    println!("Cleared conversation history");
                }
            }
        }
        Commands::Signs { word } => {
            let catalog = SignCatalog::from_config(&config.signs)?;
            match word {
                Some(word) => match catalog.lookup(&word) {
                    Some(resource) => println!("{} -> {}", word, resource.uri),
                    None => println!("No sign for '{}'", word),
                },
                None => {
                    println!("{} signs available", catalog.len());
                    for word in catalog.words() {
                        println!("  {}", word);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &TranslationOutcome) {
    if let Some(script) = &outcome.script {
        println!("Script:   {}", script);
    }
    println!("Gloss:    {}", outcome.gloss);
    println!("Filtered: {}", outcome.filtered_gloss);
    println!("\nTokens:");
    for token in &outcome.tokens {
        let status = match &token.sign {
            SignMatch::Found(resource) => resource.uri.as_str(),
            SignMatch::NotFound => "(no sign)",
            SignMatch::NotLookedUp => "",
        };
        match token.role {
            TokenRole::Word => println!("  {:<16} {}", token.word, status),
            TokenRole::Letter(letter) => println!(
                "    {} ({}/{})     {}",
                token.word,
                letter.position + 1,
                letter.group_len,
                status
            ),
            TokenRole::NameStart { .. } => println!("  [name: {}]", token.word),
            TokenRole::NameEnd { .. } => println!("  [end of name]"),
        }
    }
    println!("\nPlaylist: {} of {} tokens playable", outcome.playlist.len(), outcome.tokens.len());
}

fn render_progress(pb: &ProgressBar, snapshot: &PlaybackSnapshot) {
    let done = match snapshot.state.phase {
        PlaybackPhase::Complete => pb.length().unwrap_or(0),
        _ => snapshot.state.current_index as u64,
    };
    pb.set_position(done);
    if let Some(active) = &snapshot.active {
        pb.set_message(active.to_string());
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".signbridge").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "signbridge.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("signbridge.log").display()
    );

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}
