// Gloss translation architecture
//
// This module provides different translation implementations through a factory pattern:
// - Passthrough: English input is already a gloss
// - Lexicon: Offline dictionary lookup of romanized Sinhala/Tamil words
// - Remote: HTTP translation service, optionally falling back to the lexicon

pub mod lexicon;
pub mod remote;

use async_trait::async_trait;

pub use lexicon::{Lexicon, LexiconTranslator};
pub use remote::RemoteTranslator;

use crate::config::{TranslateConfig, TranslationMode};
use crate::error::Result;
use crate::language::LanguageMode;

/// Text handed to a translator: the romanized input as typed and, for
/// romanized modes, its native-script rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub mode: LanguageMode,
    pub text: String,
    pub script: Option<String>,
}

impl SourceText {
    pub fn new(mode: LanguageMode, text: impl Into<String>, script: Option<String>) -> Self {
        Self {
            mode,
            text: text.into(),
            script,
        }
    }
}

/// Main trait for gloss translation
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate source text into an English gloss
    async fn translate(&self, source: &SourceText) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// English input needs no translation.
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, source: &SourceText) -> Result<String> {
        Ok(source.text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator for the language mode and configured translation mode
    pub fn create_translator(
        config: &TranslateConfig,
        mode: LanguageMode,
    ) -> Result<Box<dyn Translator>> {
        let Some(lexicon) = Lexicon::for_mode(mode) else {
            return Ok(Box::new(PassthroughTranslator));
        };

        match config.mode {
            TranslationMode::Offline => Ok(Box::new(LexiconTranslator::new(lexicon))),
            TranslationMode::Remote => {
                let fallback = config
                    .offline_fallback
                    .then(|| LexiconTranslator::new(lexicon));
                Ok(Box::new(RemoteTranslator::new(config.clone(), fallback)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_collapses_whitespace() {
        let source = SourceText::new(LanguageMode::English, "  the  cat\tis red ", None);
        let gloss = PassthroughTranslator.translate(&source).await.unwrap();
        assert_eq!(gloss, "the cat is red");
    }

    #[tokio::test]
    async fn test_factory_selects_by_mode() {
        let config = TranslateConfig::default();
        let english = TranslatorFactory::create_translator(&config, LanguageMode::English).unwrap();
        assert_eq!(english.name(), "passthrough");
        let sinhala = TranslatorFactory::create_translator(&config, LanguageMode::Sinhala).unwrap();
        assert_eq!(sinhala.name(), "lexicon");
    }
}
