//! Language Codes
//!
//! The fixed set of language tags the assistant understands, plus a
//! deterministic script-based detector used when no remote detector is
//! configured.

use serde::{Deserialize, Serialize};

/// One of the eleven supported language tags.
///
/// Anything outside this set is treated as unrecognized and falls back to
/// English, so parsing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LanguageCode {
    #[default]
    #[serde(rename = "en-IN")]
    English,
    #[serde(rename = "hi-IN")]
    Hindi,
    #[serde(rename = "bn-IN")]
    Bengali,
    #[serde(rename = "gu-IN")]
    Gujarati,
    #[serde(rename = "kn-IN")]
    Kannada,
    #[serde(rename = "ml-IN")]
    Malayalam,
    #[serde(rename = "mr-IN")]
    Marathi,
    #[serde(rename = "od-IN")]
    Odia,
    #[serde(rename = "pa-IN")]
    Punjabi,
    #[serde(rename = "ta-IN")]
    Tamil,
    #[serde(rename = "te-IN")]
    Telugu,
}

impl LanguageCode {
    /// Every supported code, English first.
    pub const ALL: [LanguageCode; 11] = [
        LanguageCode::English,
        LanguageCode::Hindi,
        LanguageCode::Bengali,
        LanguageCode::Gujarati,
        LanguageCode::Kannada,
        LanguageCode::Malayalam,
        LanguageCode::Marathi,
        LanguageCode::Odia,
        LanguageCode::Punjabi,
        LanguageCode::Tamil,
        LanguageCode::Telugu,
    ];

    /// Parse a tag, defaulting to English for anything unrecognized.
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "hi-IN" => LanguageCode::Hindi,
            "bn-IN" => LanguageCode::Bengali,
            "gu-IN" => LanguageCode::Gujarati,
            "kn-IN" => LanguageCode::Kannada,
            "ml-IN" => LanguageCode::Malayalam,
            "mr-IN" => LanguageCode::Marathi,
            "od-IN" => LanguageCode::Odia,
            "pa-IN" => LanguageCode::Punjabi,
            "ta-IN" => LanguageCode::Tamil,
            "te-IN" => LanguageCode::Telugu,
            _ => LanguageCode::English,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            LanguageCode::English => "en-IN",
            LanguageCode::Hindi => "hi-IN",
            LanguageCode::Bengali => "bn-IN",
            LanguageCode::Gujarati => "gu-IN",
            LanguageCode::Kannada => "kn-IN",
            LanguageCode::Malayalam => "ml-IN",
            LanguageCode::Marathi => "mr-IN",
            LanguageCode::Odia => "od-IN",
            LanguageCode::Punjabi => "pa-IN",
            LanguageCode::Tamil => "ta-IN",
            LanguageCode::Telugu => "te-IN",
        }
    }

    /// Human-readable language name, used in the formatted reply.
    pub fn language_name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Hindi => "Hindi",
            LanguageCode::Bengali => "Bengali",
            LanguageCode::Gujarati => "Gujarati",
            LanguageCode::Kannada => "Kannada",
            LanguageCode::Malayalam => "Malayalam",
            LanguageCode::Marathi => "Marathi",
            LanguageCode::Odia => "Odia",
            LanguageCode::Punjabi => "Punjabi",
            LanguageCode::Tamil => "Tamil",
            LanguageCode::Telugu => "Telugu",
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, LanguageCode::English)
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Guess the language of `text` from its dominant Unicode script.
///
/// Counts characters per Indic script block and picks the majority; Latin
/// and anything unmatched count toward English. Marathi shares Devanagari
/// with Hindi, so script detection alone reports Hindi; an LLM-backed
/// detector is needed to tell the two apart.
pub fn detect_script(text: &str) -> LanguageCode {
    let mut counts = [0usize; 11];
    for ch in text.chars() {
        if !ch.is_alphabetic() {
            continue;
        }
        let idx = match ch as u32 {
            0x0900..=0x097F => 1,  // Devanagari -> Hindi
            0x0980..=0x09FF => 2,  // Bengali
            0x0A80..=0x0AFF => 3,  // Gujarati
            0x0C80..=0x0CFF => 4,  // Kannada
            0x0D00..=0x0D7F => 5,  // Malayalam
            0x0B00..=0x0B7F => 7,  // Odia
            0x0A00..=0x0A7F => 8,  // Gurmukhi -> Punjabi
            0x0B80..=0x0BFF => 9,  // Tamil
            0x0C00..=0x0C7F => 10, // Telugu
            _ => 0,
        };
        counts[idx] += 1;
    }

    let (best, &count) = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| **c)
        .unwrap_or((0, &0));
    if count == 0 || best == 0 {
        return LanguageCode::English;
    }
    LanguageCode::ALL[best]
}
