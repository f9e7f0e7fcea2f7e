// Sign video playback
//
// - Machine: pure playback state machine (load, play, retry, skip, complete)
// - Controller: drives the machine against a player with cancellable tasks
// - Commands: external player command builders
// - Player: command-line and dry-run player implementations

pub mod commands;
pub mod controller;
pub mod machine;
pub mod player;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use commands::*;
pub use controller::{ActiveSign, NameProgress, PlaybackController, PlaybackSnapshot};
pub use machine::{Effect, PlaybackMachine};
pub use player::*;

use crate::config::PlaybackConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Playing,
    Paused,
    Error,
    Complete,
}

/// How a player failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackErrorKind {
    /// Network hiccup or decode failure; retried.
    Transient,
    /// The resource does not exist; skipped without retrying.
    NotFound,
}

impl PlaybackErrorKind {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for PlaybackErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => f.write_str("transient playback error"),
            Self::NotFound => f.write_str("resource not found"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct PlayerError {
    pub kind: PlaybackErrorKind,
    pub message: String,
}

impl PlayerError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: PlaybackErrorKind::Transient,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: PlaybackErrorKind::NotFound,
            message: message.into(),
        }
    }
}

/// Observable playback state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub current_index: usize,
    pub is_playing: bool,
    pub retry_count: u32,
    pub last_error: Option<PlaybackErrorKind>,
}

/// A resource the player has confirmed it can play.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMedia {
    pub uri: String,
    /// Path or URL handed to the player
    pub location: String,
    pub rate: f32,
}

/// Main trait for sign video players
#[async_trait]
pub trait VideoPlayer: Send + Sync {
    /// Resolve and prepare a resource. Fails with `NotFound` when it does not exist.
    async fn load(&self, uri: &str, rate: f32) -> std::result::Result<LoadedMedia, PlayerError>;

    /// Play a loaded resource, returning at natural completion.
    async fn play(&self, media: &LoadedMedia) -> std::result::Result<(), PlayerError>;

    /// Pause hint; players without pause control let the clip finish.
    fn pause(&self) {}

    fn resume(&self) {}

    /// Called when in-flight work is cancelled.
    fn stop(&self) {}
}

/// Factory for creating player instances
pub struct PlayerFactory;

impl PlayerFactory {
    /// Create the command-line player, or a simulated one for dry runs
    pub fn create_player(config: &PlaybackConfig, dry_run: bool) -> Result<Arc<dyn VideoPlayer>> {
        if dry_run {
            return Ok(Arc::new(DryRunPlayer::default()));
        }
        let player = CommandPlayer::new(config.clone())?;
        player.check_availability()?;
        Ok(Arc::new(player))
    }
}
