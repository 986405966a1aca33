//! Bilingual text support
//!
//! Every customer-facing name and description is stored in both
//! Portuguese and English. `Locale` selects which side a consumer
//! reads; the default is Portuguese.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pt" => Ok(Locale::Pt),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Text carried in both supported languages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub pt: String,
    #[serde(default)]
    pub en: String,
}

impl LocalizedText {
    pub fn new(pt: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            pt: pt.into(),
            en: en.into(),
        }
    }

    /// The text in the given locale.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Pt => &self.pt,
            Locale::En => &self.en,
        }
    }

    /// True when both languages have non-empty text.
    pub fn is_complete(&self) -> bool {
        !self.pt.trim().is_empty() && !self.en.trim().is_empty()
    }
}
