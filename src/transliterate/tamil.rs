use super::TransliterationRules;

const VOWELS: &[(&str, &str)] = &[
    ("a", "அ"),
    ("aa", "ஆ"),
    ("i", "இ"),
    ("ii", "ஈ"),
    ("u", "உ"),
    ("uu", "ஊ"),
    ("e", "எ"),
    ("ee", "ஏ"),
    ("ai", "ஐ"),
    ("o", "ஒ"),
    ("oo", "ஓ"),
    ("au", "ஔ"),
];

const CONSONANTS: &[(&str, &str)] = &[
    ("k", "க்"),
    ("g", "க்"),
    ("ng", "ங்"),
    ("ch", "ச்"),
    ("s", "ச்"),
    ("j", "ஜ்"),
    ("ny", "ஞ்"),
    ("t", "ட்"),
    ("d", "ட்"),
    ("nh", "ண்"),
    ("th", "த்"),
    ("dh", "த்"),
    ("n", "ந்"),
    ("p", "ப்"),
    ("b", "ப்"),
    ("m", "ம்"),
    ("y", "ய்"),
    ("r", "ர்"),
    ("rr", "ற்"),
    ("l", "ல்"),
    ("lh", "ள்"),
    ("zh", "ழ்"),
    ("v", "வ்"),
    ("w", "வ்"),
    ("sh", "ஷ்"),
    ("h", "ஹ்"),
];

const VOWEL_SIGNS: &[(&str, &str)] = &[
    ("a", ""),
    ("aa", "ா"),
    ("i", "ி"),
    ("ii", "ீ"),
    ("u", "ு"),
    ("uu", "ூ"),
    ("e", "ெ"),
    ("ee", "ே"),
    ("ai", "ை"),
    ("o", "ொ"),
    ("oo", "ோ"),
    ("au", "ௌ"),
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
        assert_eq!(t.transliterate("vanakkam"), "வநக்கம்");
    }

    #[test]
    fn test_inherent_and_dependent_vowels() {
        let t = Transliterator::new(rules());
        assert_eq!(t.transliterate("ka"), "க");
        assert_eq!(t.transliterate("kai"), "கை");
        assert_eq!(t.transliterate("thambi"), "தம்பி");
        assert_eq!(t.transliterate("tamizh"), "டமிழ்");
    }
}
