//! Function words with no sign of their own.

use crate::text::normalize_word;

/// Closed set of elided words, compared lowercased and punctuation-free.
/// "are" and the personal pronouns have signs and are kept.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "am", "was", "were", "be", "been", "being", "and", "or", "but",
    "of", "to", "in", "on", "at", "by", "for", "with", "from", "this", "that", "these",
    "those", "there", "then", "so", "as",
];

pub fn is_stopword(word: &str) -> bool {
    let normalized = normalize_word(word);
    STOPWORDS.contains(&normalized.as_str())
}

/// Drops stopwords, keeping the remaining words in order and as typed.
/// An all-stopword input yields an empty string.
pub fn filter_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !is_stopword(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_order() {
        assert_eq!(filter_stopwords("the cat is red"), "cat red");
    }

    #[test]
    fn test_filter_preserves_case_and_matches_case_insensitively() {
        assert_eq!(filter_stopwords("The Cat IS with John."), "Cat John.");
    }

    #[test]
    fn test_all_stopwords_yield_empty() {
        assert_eq!(filter_stopwords("the a an is"), "");
        assert_eq!(filter_stopwords(""), "");
    }

    #[test]
    fn test_greeting_is_untouched() {
        assert_eq!(filter_stopwords("hello how are you"), "hello how are you");
    }
}
