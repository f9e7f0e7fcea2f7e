use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SignBridgeError};
use crate::signs::classifier::DEFAULT_NAME_MIN_LENGTH;

fn default_name_min_length() -> usize {
    DEFAULT_NAME_MIN_LENGTH
}

fn default_probe_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub signs: SignConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Where romanized input is translated
    pub mode: TranslationMode,
    /// Translation service base URL (remote mode)
    pub endpoint: String,
    /// Optional API key sent with every remote request
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Use the offline lexicon when the remote service fails
    pub offline_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationMode {
    /// Offline: Built-in word lexicon
    Offline,
    /// Remote: HTTP translation service
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignConfig {
    /// Directory of sign videos, scanned recursively
    pub catalog_dir: Option<PathBuf>,
    /// JSON manifest mapping words to video paths or URLs
    pub manifest: Option<PathBuf>,
    /// File extensions treated as sign videos
    pub video_extensions: Vec<String>,
    /// Shortest capitalized word fingerspelled as a name
    #[serde(default = "default_name_min_length")]
    pub name_min_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Path to the external player binary
    pub player_binary: String,
    /// Playback rate hint forwarded to the player
    pub rate: f32,
    /// Flat delay before retrying a failed item
    pub retry_delay_ms: u64,
    /// Retries per item before it is skipped
    pub max_retries: u32,
    /// Timeout for probing remote resources
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Additional player arguments
    /// Common options: ["-fs"] for fullscreen, ["-an"] to mute
    pub player_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Local JSON store
    pub path: PathBuf,
    /// Records kept; older ones are dropped
    pub max_records: usize,
    /// Remote conversation store base URL
    pub remote_endpoint: Option<String>,
    /// Bearer token; the remote store is only used when set
    pub auth_token: Option<String>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            mode: TranslationMode::Offline,
            endpoint: "http://localhost:5000".to_string(),
            api_key: None,
            timeout_secs: 15,
            offline_fallback: true,
        }
    }
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            catalog_dir: None,
            manifest: None,
            video_extensions: ["mp4", "mov", "webm", "mkv", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            name_min_length: DEFAULT_NAME_MIN_LENGTH,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            player_binary: "ffplay".to_string(),
            rate: 1.0,
            retry_delay_ms: 1000,
            max_retries: 2,
            probe_timeout_secs: default_probe_timeout_secs(),
            player_options: vec![
                // Example options users can customize:
                // "-fs".to_string(),  // Fullscreen
                // "-an".to_string(),  // Mute audio
            ],
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".signbridge/history.json"),
            max_records: 50,
            remote_endpoint: None,
            auth_token: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SignBridgeError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SignBridgeError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SignBridgeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SignBridgeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.playback.rate.is_finite() && self.playback.rate > 0.0) {
            return Err(SignBridgeError::Config(format!(
                "Playback rate must be positive, got {}",
                self.playback.rate
            )));
        }
        if self.history.max_records == 0 {
            return Err(SignBridgeError::Config(
                "history.max_records must be at least 1".to_string(),
            ));
        }
        if self.translate.mode == TranslationMode::Remote && self.translate.endpoint.trim().is_empty() {
            return Err(SignBridgeError::Config(
                "translate.endpoint is required in Remote mode".to_string(),
            ));
        }
        Ok(())
    }
}
