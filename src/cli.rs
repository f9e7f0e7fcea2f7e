use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render romanized text in native script
    Transliterate {
        /// Romanized input text
        text: String,

        /// Input language: sinhala or tamil
        #[arg(short, long, default_value = "sinhala")]
        language: String,
    },

    /// Translate text into sign tokens and a playlist
    Translate {
        /// Input text
        text: String,

        /// Input language: english, sinhala or tamil
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Save the translation to history
        #[arg(long)]
        save: bool,
    },

    /// Translate text and play its signs
    Play {
        /// Input text
        text: String,

        /// Input language: english, sinhala or tamil
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Simulate playback without launching the player
        #[arg(long)]
        dry_run: bool,

        /// Playback rate (overrides config)
        #[arg(short, long)]
        rate: Option<f32>,
    },

    /// Manage saved conversations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show the sign catalog, or look up a single word
    Signs {
        /// Word to look up
        word: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved conversations, most recent first
    List {
        /// Maximum number of conversations to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a conversation by id
    Delete {
        /// Conversation id
        id: String,
    },

    /// Delete all saved conversations
    Clear,
}
