use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::commands::PlayerCommandBuilder;
use super::{LoadedMedia, PlayerError, VideoPlayer};
use crate::config::PlaybackConfig;
use crate::error::{Result, SignBridgeError};

fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Resolves a catalog URI to a local path, or `None` for remote URIs.
fn local_path(uri: &str) -> Option<&Path> {
    if is_remote(uri) {
        return None;
    }
    Some(Path::new(uri.strip_prefix("file://").unwrap_or(uri)))
}

/// Plays each clip with an external player process (ffplay by default).
pub struct CommandPlayer {
    config: PlaybackConfig,
    client: reqwest::Client,
    builder: PlayerCommandBuilder,
}

impl CommandPlayer {
    pub fn new(config: PlaybackConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()?;
        let builder = PlayerCommandBuilder::new(&config.player_binary);
        Ok(Self {
            config,
            client,
            builder,
        })
    }

    /// Check that the player binary can be executed
    pub fn check_availability(&self) -> Result<()> {
        self.builder.version_check().execute_blocking().map_err(|_| {
            SignBridgeError::Playback(format!(
                "Player '{}' not found. Install ffmpeg or set playback.player_binary",
                self.config.player_binary
            ))
        })
    }

    async fn probe_remote(&self, uri: &str) -> std::result::Result<(), PlayerError> {
        let response = self
            .client
            .head(uri)
            .send()
            .await
            .map_err(|e| PlayerError::transient(format!("{}: {}", uri, e)))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Err(PlayerError::not_found(format!("{} returned {}", uri, response.status())))
            }
            status => Err(PlayerError::transient(format!("{} returned {}", uri, status))),
        }
    }
}

#[async_trait]
impl VideoPlayer for CommandPlayer {
    async fn load(&self, uri: &str, rate: f32) -> std::result::Result<LoadedMedia, PlayerError> {
        match local_path(uri) {
            Some(path) if !path.exists() => {
                return Err(PlayerError::not_found(format!("{} does not exist", path.display())));
            }
            Some(_) => {}
            None => self.probe_remote(uri).await?,
        }

        let location = local_path(uri)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| uri.to_string());
        Ok(LoadedMedia {
            uri: uri.to_string(),
            location,
            rate,
        })
    }

    async fn play(&self, media: &LoadedMedia) -> std::result::Result<(), PlayerError> {
        let title = Path::new(&media.location)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sign");
        self.builder
            .play_clip(&media.location, media.rate, title, &self.config.player_options)
            .execute()
            .await
            .map_err(|e| PlayerError::transient(e.to_string()))
    }
}

/// Logs clips instead of showing them, sleeping for a fixed clip length.
pub struct DryRunPlayer {
    clip_duration: Duration,
}

impl DryRunPlayer {
    pub fn new(clip_duration: Duration) -> Self {
        Self { clip_duration }
    }
}

impl Default for DryRunPlayer {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl VideoPlayer for DryRunPlayer {
    async fn load(&self, uri: &str, rate: f32) -> std::result::Result<LoadedMedia, PlayerError> {
        if let Some(path) = local_path(uri) {
            if !path.exists() {
                return Err(PlayerError::not_found(format!("{} does not exist", path.display())));
            }
        }
        debug!("Dry run load: {}", uri);
        Ok(LoadedMedia {
            uri: uri.to_string(),
            location: uri.to_string(),
            rate,
        })
    }

    async fn play(&self, media: &LoadedMedia) -> std::result::Result<(), PlayerError> {
        info!("▶ {}", media.uri);
        let scaled = self.clip_duration.as_secs_f32() / media.rate.max(f32::EPSILON);
        tokio::time::sleep(Duration::from_secs_f32(scaled)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackErrorKind;

    #[test]
    fn test_local_path_resolution() {
        assert_eq!(local_path("file:///signs/a.mp4"), Some(Path::new("/signs/a.mp4")));
        assert_eq!(local_path("signs/a.mp4"), Some(Path::new("signs/a.mp4")));
        assert_eq!(local_path("https://cdn.example/a.mp4"), None);
    }

    #[tokio::test]
    async fn test_missing_local_file_is_not_found() {
        let player = CommandPlayer::new(PlaybackConfig::default()).unwrap();
        let err = player.load("/definitely/not/here.mp4", 1.0).await.unwrap_err();
        assert_eq!(err.kind, PlaybackErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_existing_local_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("hello.mp4");
        std::fs::write(&clip, b"").unwrap();
        let uri = clip.display().to_string();

        let player = CommandPlayer::new(PlaybackConfig::default()).unwrap();
        let media = player.load(&uri, 0.5).await.unwrap();
        assert_eq!(media.location, uri);
        assert_eq!(media.rate, 0.5);
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_transient() {
        let mut config = PlaybackConfig::default();
        config.probe_timeout_secs = 1;
        let player = CommandPlayer::new(config).unwrap();
        let err = player.load("http://127.0.0.1:9/hello.mp4", 1.0).await.unwrap_err();
        assert_eq!(err.kind, PlaybackErrorKind::Transient);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_play_scales_with_rate() {
        let player = DryRunPlayer::new(Duration::from_secs(2));
        let media = player.load("https://cdn.example/a.mp4", 2.0).await.unwrap();
        let started = tokio::time::Instant::now();
        player.play(&media).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unavailable_binary() {
        let mut config = PlaybackConfig::default();
        config.player_binary = "/nonexistent/player-binary".to_string();
        let player = CommandPlayer::new(config).unwrap();
        assert!(matches!(player.check_availability(), Err(SignBridgeError::Playback(_))));
    }
}
