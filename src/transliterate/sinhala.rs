use super::TransliterationRules;

const VOWELS: &[(&str, &str)] = &[
    ("a", "අ"),
    ("aa", "ආ"),
    ("ae", "ඇ"),
    ("aae", "ඈ"),
    ("i", "ඉ"),
    ("ii", "ඊ"),
    ("u", "උ"),
    ("uu", "ඌ"),
    ("e", "එ"),
    ("ee", "ඒ"),
    ("ai", "ඓ"),
    ("o", "ඔ"),
    ("oo", "ඕ"),
    ("au", "ඖ"),
];

const CONSONANTS: &[(&str, &str)] = &[
    ("k", "ක්"),
    ("kh", "ඛ්"),
    ("g", "ග්"),
    ("gh", "ඝ්"),
    ("ng", "ඞ්"),
    ("ch", "ච්"),
    ("chh", "ඡ්"),
    ("j", "ජ්"),
    ("jh", "ඣ්"),
    ("ny", "ඤ්"),
    ("t", "ට්"),
    ("th", "ත්"),
    ("d", "ද්"),
    ("dh", "ධ්"),
    ("n", "න්"),
    ("nh", "ණ්"),
    ("p", "ප්"),
    ("ph", "ඵ්"),
    ("b", "බ්"),
    ("bh", "භ්"),
    ("m", "ම්"),
    ("y", "ය්"),
    ("r", "ර්"),
    ("l", "ල්"),
    ("lh", "ළ්"),
    ("w", "ව්"),
    ("v", "ව්"),
    ("sh", "ශ්"),
    ("s", "ස්"),
    ("h", "හ්"),
    ("f", "ෆ්"),
];

const VOWEL_SIGNS: &[(&str, &str)] = &[
    ("a", ""),
    ("aa", "ා"),
    ("ae", "ැ"),
    ("aae", "ෑ"),
    ("i", "ි"),
    ("ii", "ී"),
    ("u", "ු"),
    ("uu", "ූ"),
    ("e", "ෙ"),
    ("ee", "ේ"),
    ("ai", "ෛ"),
    ("o", "ො"),
    ("oo", "ෝ"),
    ("au", "ෞ"),
];

pub fn rules() -> TransliterationRules {
    TransliterationRules::new(VOWELS, CONSONANTS, VOWEL_SIGNS)
}

#[cfg(test)]
mod tests {
    use super::super::Transliterator;
    use super::*;

    #[test]
    fn test_greeting() {
        let t = Transliterator::new(rules());
        assert_eq!(t.transliterate("ayubowan"), "අයුබොවන්");
    }

    #[test]
    fn test_long_vowels_and_digraphs() {
        let t = Transliterator::new(rules());
        assert_eq!(t.transliterate("amma"), "අම්ම");
        assert_eq!(t.transliterate("thaaththaa"), "තාත්තා");
        assert_eq!(t.transliterate("kohomada"), "කොහොමද");
    }
}
