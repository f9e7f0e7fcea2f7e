use tracing::debug;

use super::{LetterPosition, SignLookup, SignMatch, SignToken, TokenRole};
use crate::text::clean_words;

/// Shortest capitalized word treated as a name. Keeps "I" and "A" as words.
pub const DEFAULT_NAME_MIN_LENGTH: usize = 2;

/// Splits a gloss into sign tokens.
///
/// A word is fingerspelled as a name when it starts with an uppercase
/// letter, is purely alphabetic, is at least `name_min_length` characters
/// long and has no whole-word sign. Sentence position is irrelevant, so a
/// capitalized sentence-initial "Hello" with a sign stays a word.
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    name_min_length: usize,
}

impl Default for TokenClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_MIN_LENGTH)
    }
}

impl TokenClassifier {
    pub fn new(name_min_length: usize) -> Self {
        Self {
            name_min_length: name_min_length.max(1),
        }
    }

    fn looks_like_name(&self, word: &str) -> bool {
        let Some(first) = word.chars().next() else {
            return false;
        };
        first.is_uppercase()
            && word.chars().all(char::is_alphabetic)
            && word.chars().count() >= self.name_min_length
    }

    pub fn classify<L: SignLookup + ?Sized>(&self, text: &str, lookup: &L) -> Vec<SignToken> {
        let mut tokens = Vec::new();
        let mut next_group = 0u32;

        for word in clean_words(text) {
            let resource = lookup.lookup(&word);

            if resource.is_none() && self.looks_like_name(&word) {
                let group_id = next_group;
                next_group += 1;
                self.push_name(&mut tokens, &word, group_id, lookup);
                continue;
            }

            if resource.is_none() {
                debug!("No sign for '{}'", word);
            }
            tokens.push(SignToken {
                word,
                sign: resource.into(),
                role: TokenRole::Word,
            });
        }

        tokens
    }

    fn push_name<L: SignLookup + ?Sized>(
        &self,
        tokens: &mut Vec<SignToken>,
        name: &str,
        group_id: u32,
        lookup: &L,
    ) {
        let letters: Vec<char> = name.chars().collect();
        debug!("Fingerspelling '{}' as group {}", name, group_id);

        tokens.push(SignToken {
            word: name.to_string(),
            sign: SignMatch::NotLookedUp,
            role: TokenRole::NameStart { group_id },
        });

        for (position, letter) in letters.iter().enumerate() {
            let key = letter.to_lowercase().to_string();
            tokens.push(SignToken {
                word: letter.to_uppercase().to_string(),
                sign: lookup.lookup(&key).into(),
                role: TokenRole::Letter(LetterPosition {
                    group_id,
                    position,
                    group_len: letters.len(),
                }),
            });
        }

        tokens.push(SignToken {
            word: name.to_string(),
            sign: SignMatch::NotLookedUp,
            role: TokenRole::NameEnd { group_id },
        });
    }
}

/// Classifies with the default name rule.
pub fn classify<L: SignLookup + ?Sized>(text: &str, lookup: &L) -> Vec<SignToken> {
    TokenClassifier::default().classify(text, lookup)
}
