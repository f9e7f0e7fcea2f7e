//! Word normalization shared by the lexicon, the stopword filter, the
//! token classifier and the sign catalog.

/// Punctuation removed from words before any lookup or comparison.
pub const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '`', '(', ')', '[', ']', '{', '}', '/', '\\', '#',
    '$', '%', '^', '&', '*', '=', '~', '-', '_', '…', '“', '”', '‘', '’', '¿', '¡',
];

/// Removes every punctuation character from `word`, keeping its casing.
pub fn strip_punctuation(word: &str) -> String {
    word.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}

/// Lowercased, punctuation-free form used for dictionary and stopword comparison.
pub fn normalize_word(word: &str) -> String {
    strip_punctuation(word).to_lowercase()
}

/// Splits `text` on whitespace and strips punctuation, dropping words that
/// end up empty.
pub fn clean_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(strip_punctuation)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Key used by sign lookups: lowercased, punctuation stripped, words
/// joined by single underscores. Whitespace, `_` and `-` all separate words,
/// so applying it to an existing key returns the key unchanged.
pub fn sign_key(word: &str) -> String {
    word.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
