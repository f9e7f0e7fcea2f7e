use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SignBridgeError;

/// Input language selected by the user.
///
/// Sinhala and Tamil input is typed in romanized form; English input is
/// used as the gloss directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    #[default]
    English,
    Sinhala,
    Tamil,
}

impl LanguageMode {
    pub const ALL: [LanguageMode; 3] = [Self::English, Self::Sinhala, Self::Tamil];

    /// ISO 639-1 code, used when talking to a remote translation service.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Sinhala => "si",
            Self::Tamil => "ta",
        }
    }

    /// Whether input in this mode is romanized and needs a native-script rendering.
    pub fn is_romanized(&self) -> bool {
        !matches!(self, Self::English)
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::English => "english",
            Self::Sinhala => "sinhala",
            Self::Tamil => "tamil",
        };
        f.write_str(name)
    }
}

impl FromStr for LanguageMode {
    type Err = SignBridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "sinhala" | "si" => Ok(Self::Sinhala),
            "tamil" | "ta" => Ok(Self::Tamil),
            _ => Err(SignBridgeError::Config(format!(
                "Invalid language mode '{}'. Valid modes: english, sinhala, tamil",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_mode() {
        assert_eq!("Sinhala".parse::<LanguageMode>().unwrap(), LanguageMode::Sinhala);
        assert_eq!("ta".parse::<LanguageMode>().unwrap(), LanguageMode::Tamil);
        assert_eq!(" english ".parse::<LanguageMode>().unwrap(), LanguageMode::English);
        assert!("klingon".parse::<LanguageMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in LanguageMode::ALL {
            assert_eq!(mode.to_string().parse::<LanguageMode>().unwrap(), mode);
        }
    }
}
