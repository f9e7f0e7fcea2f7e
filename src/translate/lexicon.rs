use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use super::{SourceText, Translator};
use crate::error::Result;
use crate::language::LanguageMode;
use crate::text::normalize_word;

const SINHALA: &[(&str, &str)] = &[
    ("ayubowan", "hello"),
    ("kohomada", "how are you"),
    ("sthuthi", "thank you"),
    ("stuthi", "thank you"),
    ("oba", "you"),
    ("mama", "I"),
    ("api", "we"),
    ("mage", "my"),
    ("nama", "name"),
    ("gedara", "home"),
    ("yanawa", "go"),
    ("enawa", "come"),
    ("kanawa", "eat"),
    ("bonawa", "drink"),
    ("wathura", "water"),
    ("kaema", "food"),
    ("amma", "mother"),
    ("thaththa", "father"),
    ("yaluwa", "friend"),
    ("hodai", "good"),
    ("honda", "good"),
    ("ow", "yes"),
    ("naa", "no"),
    ("karunakara", "please"),
    ("samawenna", "sorry"),
    ("suba", "good"),
    ("udasanak", "morning"),
    ("rathriyak", "night"),
    ("iskole", "school"),
    ("pothak", "book"),
    ("adare", "love"),
    ("dawasak", "day"),
];

const TAMIL: &[(&str, &str)] = &[
    ("vanakkam", "hello"),
    ("nandri", "thank you"),
    ("eppadi", "how"),
    ("irukkireergal", "are you"),
    ("irukkeenga", "are you"),
    ("naan", "I"),
    ("neengal", "you"),
    ("nee", "you"),
    ("en", "my"),
    ("peyar", "name"),
    ("veedu", "home"),
    ("po", "go"),
    ("vaa", "come"),
    ("saappidu", "eat"),
    ("kudi", "drink"),
    ("thanneer", "water"),
    ("saapadu", "food"),
    ("amma", "mother"),
    ("appa", "father"),
    ("nanban", "friend"),
    ("nalla", "good"),
    ("aamaam", "yes"),
    ("illai", "no"),
    ("dayavuseithu", "please"),
    ("mannikkavum", "sorry"),
    ("kaalai", "morning"),
    ("iravu", "night"),
    ("palli", "school"),
    ("puthagam", "book"),
    ("anbu", "love"),
    ("naal", "day"),
];

/// Read-only romanized-word to English-gloss dictionary.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(source, gloss)| (normalize_word(source), gloss.to_string()))
                .collect(),
        }
    }

    /// Built-in lexicon for a romanized language mode; English has none.
    pub fn for_mode(mode: LanguageMode) -> Option<Self> {
        match mode {
            LanguageMode::English => None,
            LanguageMode::Sinhala => Some(Self::from_pairs(SINHALA)),
            LanguageMode::Tamil => Some(Self::from_pairs(TAMIL)),
        }
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(&normalize_word(word)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Word-by-word gloss. Words missing from the dictionary are kept as
    /// typed (assumed to be English or proper nouns).
    pub fn translate(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.lookup(word).unwrap_or(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Offline translator backed by a [`Lexicon`].
pub struct LexiconTranslator {
    lexicon: Lexicon,
}

impl LexiconTranslator {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

#[async_trait]
impl Translator for LexiconTranslator {
    async fn translate(&self, source: &SourceText) -> Result<String> {
        let gloss = self.lexicon.translate(&source.text);
        debug!("Lexicon gloss for '{}': '{}'", source.text, gloss);
        Ok(gloss)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sinhala() -> Lexicon {
        Lexicon::for_mode(LanguageMode::Sinhala).unwrap()
    }

    #[test]
    fn test_sinhala_greeting() {
        assert_eq!(sinhala().translate("ayubowan kohomada"), "hello how are you");
    }

    #[test]
    fn test_lookup_ignores_case_and_punctuation() {
        assert_eq!(sinhala().translate("Ayubowan, KOHOMADA?"), "hello how are you");
    }

    #[test]
    fn test_unknown_words_pass_through() {
        assert_eq!(sinhala().translate("ayubowan Kamal"), "hello Kamal");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(sinhala().translate(""), "");
        assert_eq!(sinhala().translate(" \t\n "), "");
    }

    #[test]
    fn test_idempotent_on_gloss_output() {
        let lexicon = Lexicon::for_mode(LanguageMode::Tamil).unwrap();
        let once = lexicon.translate("vanakkam nanban Priya");
        assert_eq!(once, "hello friend Priya");
        assert_eq!(lexicon.translate(&once), once);
    }

    #[tokio::test]
    async fn test_translator_uses_romanized_text() {
        let translator = LexiconTranslator::new(sinhala());
        let source = SourceText::new(
            LanguageMode::Sinhala,
            "sthuthi",
            Some("ස්තුති".to_string()),
        );
        assert_eq!(translator.translate(&source).await.unwrap(), "thank you");
    }
}
