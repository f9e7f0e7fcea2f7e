//! SignBridge - Text to sign language translation
//!
//! Turns English, romanized Sinhala or romanized Tamil text into a playlist
//! of sign language videos: transliteration, gloss translation, stopword
//! filtering, sign lookup with name fingerspelling, and playback with
//! bounded retries. Translations can be kept in a local or remote history.

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod language;
pub mod playback;
pub mod session;
pub mod signs;
pub mod stopwords;
pub mod text;
pub mod translate;
pub mod transliterate;
pub mod workflow;
