use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignBridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The translation service could not produce a gloss. The caller keeps
    /// its previous result.
    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Sign catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SignBridgeError>;
