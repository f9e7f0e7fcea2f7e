// Romanized text to native script.
//
// The engine is a greedy, single-pass, longest-match tokenizer driven by
// per-language rule tables:
// - Sinhala: rules in `sinhala`
// - Tamil: rules in `tamil`

pub mod sinhala;
pub mod tamil;

use std::collections::HashMap;

use crate::language::LanguageMode;

/// One romanized spelling and the glyph it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    roman: Vec<char>,
    glyph: String,
    /// `glyph` without its final character. For consonants that character
    /// is the diacritic suppressing the inherent vowel.
    base: String,
}

impl Rule {
    fn matches(&self, input: &[char]) -> bool {
        input.starts_with(&self.roman)
    }
}

/// Immutable rule tables for one script.
///
/// Vowel and consonant rules are kept sorted longest-first so a shorter
/// spelling never shadows a longer one sharing its prefix ("aa" before "a").
#[derive(Debug, Clone)]
pub struct TransliterationRules {
    vowels: Vec<Rule>,
    consonants: Vec<Rule>,
    vowel_signs: HashMap<String, String>,
}

impl TransliterationRules {
    /// Builds a rule set from `(roman, glyph)` pairs. Every consonant glyph
    /// ends in the diacritic dropped when a vowel follows; vowel signs are keyed by the roman vowel and may be
    /// empty (the inherent vowel).
    pub fn new(
        vowels: &[(&str, &str)],
        consonants: &[(&str, &str)],
        vowel_signs: &[(&str, &str)],
    ) -> Self {
        Self {
            vowels: Self::ordered(vowels),
            consonants: Self::ordered(consonants),
            vowel_signs: vowel_signs
                .iter()
                .map(|(roman, sign)| (roman.to_ascii_lowercase(), sign.to_string()))
                .collect(),
        }
    }

    fn ordered(pairs: &[(&str, &str)]) -> Vec<Rule> {
        let mut rules: Vec<Rule> = pairs
            .iter()
            .filter(|(roman, _)| !roman.is_empty())
            .map(|(roman, glyph)| {
                let mut base = glyph.to_string();
                base.pop();
                Rule {
                    roman: roman.chars().map(|c| c.to_ascii_lowercase()).collect(),
                    glyph: glyph.to_string(),
                    base,
                }
            })
            .collect();
        // Stable: equal-length rules keep their table order.
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.roman.len()));
        rules
    }

    fn match_vowel(&self, input: &[char]) -> Option<&Rule> {
        self.vowels.iter().find(|rule| rule.matches(input))
    }

    fn match_consonant(&self, input: &[char]) -> Option<&Rule> {
        self.consonants.iter().find(|rule| rule.matches(input))
    }

    fn vowel_sign(&self, vowel: &Rule) -> &str {
        let roman: String = vowel.roman.iter().collect();
        self.vowel_signs.get(&roman).map(String::as_str).unwrap_or("")
    }
}

/// Converts romanized input into native script. Never fails: characters
/// no rule recognizes are copied through unchanged.
#[derive(Debug, Clone)]
pub struct Transliterator {
    rules: TransliterationRules,
}

impl Transliterator {
    pub fn new(rules: TransliterationRules) -> Self {
        Self { rules }
    }

    /// Transliterator for a romanized language mode; English has none.
    pub fn for_mode(mode: LanguageMode) -> Option<Self> {
        match mode {
            LanguageMode::English => None,
            LanguageMode::Sinhala => Some(Self::new(sinhala::rules())),
            LanguageMode::Tamil => Some(Self::new(tamil::rules())),
        }
    }

    pub fn transliterate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let folded: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
        let mut output = String::with_capacity(text.len() * 3);
        let mut pos = 0;

        while pos < chars.len() {
            let rest = &folded[pos..];

            if let Some(vowel) = self.rules.match_vowel(rest) {
                output.push_str(&vowel.glyph);
                pos += vowel.roman.len();
                continue;
            }

            if let Some(consonant) = self.rules.match_consonant(rest) {
                let after = pos + consonant.roman.len();
                match self.rules.match_vowel(&folded[after..]) {
                    Some(vowel) => {
                        output.push_str(&consonant.base);
                        output.push_str(self.rules.vowel_sign(vowel));
                        pos = after + vowel.roman.len();
                    }
                    None => {
                        output.push_str(&consonant.glyph);
                        pos = after;
                    }
                }
                continue;
            }

            output.push(chars[pos]);
            pos += 1;
        }

        output
    }
}
