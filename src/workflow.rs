use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Config, TranslateConfig};
use crate::error::Result;
use crate::history::ConversationDraft;
use crate::language::LanguageMode;
use crate::signs::{build_playlist, Playlist, SignLookup, SignToken, TokenClassifier};
use crate::stopwords::filter_stopwords;
use crate::translate::{SourceText, Translator, TranslatorFactory};
use crate::transliterate::Transliterator;

/// Everything one translation request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub input_text: String,
    pub mode: LanguageMode,
    /// Native-script rendering of romanized input
    pub script: Option<String>,
    /// English gloss as translated
    pub gloss: String,
    /// Gloss with stopwords removed; the text that was classified
    pub filtered_gloss: String,
    pub tokens: Vec<SignToken>,
    pub playlist: Playlist,
}

impl TranslationOutcome {
    /// False when no token resolved to a sign. Distinct from a failed request.
    pub fn has_signs(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn missing_words(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| token.is_not_found())
            .map(|token| token.word.as_str())
            .collect()
    }

    pub fn to_draft(&self) -> ConversationDraft {
        ConversationDraft {
            input_text: self.input_text.clone(),
            language_mode: self.mode,
            romanized_script: self.script.clone(),
            english_gloss: self.gloss.clone(),
        }
    }
}

/// Text-to-sign pipeline: transliterate, translate, filter, classify, and
/// build the playlist, strictly in that order.
pub struct SignWorkflow {
    translate_config: TranslateConfig,
    lookup: Arc<dyn SignLookup>,
    classifier: TokenClassifier,
    translator: Option<Arc<dyn Translator>>,
}

impl SignWorkflow {
    pub fn new(config: &Config, lookup: Arc<dyn SignLookup>) -> Self {
        Self {
            translate_config: config.translate.clone(),
            lookup,
            classifier: TokenClassifier::new(config.signs.name_min_length),
            translator: None,
        }
    }

    /// Use `translator` for every mode instead of the configured one.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn lookup(&self) -> &dyn SignLookup {
        self.lookup.as_ref()
    }

    /// Native-script rendering, or `None` in English mode.
    pub fn transliterate(&self, text: &str, mode: LanguageMode) -> Option<String> {
        Transliterator::for_mode(mode).map(|transliterator| transliterator.transliterate(text))
    }

    pub async fn translate(&self, text: &str, mode: LanguageMode) -> Result<TranslationOutcome> {
        let script = self.transliterate(text, mode);
        let source = SourceText::new(mode, text, script);

        let gloss = match &self.translator {
            Some(translator) => translator.translate(&source).await?,
            None => {
                let translator = TranslatorFactory::create_translator(&self.translate_config, mode)?;
                debug!("Translating with {}", translator.name());
                translator.translate(&source).await?
            }
        };

        let outcome = self.classify_gloss(source, gloss);
        info!(
            "Translated '{}' to '{}': {} tokens, {} playable",
            outcome.input_text,
            outcome.gloss,
            outcome.tokens.len(),
            outcome.playlist.len()
        );
        Ok(outcome)
    }

    fn classify_gloss(&self, source: SourceText, gloss: String) -> TranslationOutcome {
        let filtered_gloss = filter_stopwords(&gloss);
        let tokens = self.classifier.classify(&filtered_gloss, self.lookup.as_ref());
        let playlist = build_playlist(&tokens);

        TranslationOutcome {
            input_text: source.text,
            mode: source.mode,
            script: source.script,
            gloss,
            filtered_gloss,
            tokens,
            playlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signs::{SignCatalog, SignResource};

    fn workflow(words: &[&str]) -> SignWorkflow {
        let mut catalog = SignCatalog::new();
        for word in words {
            catalog.insert(word, SignResource::new(format!("{}.mp4", word)));
        }
        SignWorkflow::new(&Config::default(), Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_english_skips_transliteration() {
        let outcome = workflow(&["cat", "red"])
            .translate("the cat is red", LanguageMode::English)
            .await
            .unwrap();
        assert_eq!(outcome.script, None);
        assert_eq!(outcome.gloss, "the cat is red");
        assert_eq!(outcome.filtered_gloss, "cat red");
        assert_eq!(outcome.playlist.uris(), vec!["cat.mp4", "red.mp4"]);
    }

    #[tokio::test]
    async fn test_no_signs_is_a_valid_outcome() {
        let outcome = workflow(&[]).translate("banana bread", LanguageMode::English).await.unwrap();
        assert!(!outcome.has_signs());
        assert_eq!(outcome.missing_words(), vec!["banana", "bread"]);
    }

    #[tokio::test]
    async fn test_draft_carries_script_and_gloss() {
        let outcome = workflow(&["hello"])
            .translate("ayubowan", LanguageMode::Sinhala)
            .await
            .unwrap();
        let draft = outcome.to_draft();
        assert_eq!(draft.input_text, "ayubowan");
        assert_eq!(draft.romanized_script.as_deref(), Some("අයුබොවන්"));
        assert_eq!(draft.english_gloss, "hello");
    }
}
