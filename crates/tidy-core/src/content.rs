//! Content types, pipeline stages and detection results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Content type a file is optimized as.
///
/// `Auto` is a dispatch instruction only; the detector never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Code,
    Docs,
    Notion,
    Email,
    Markdown,
    Auto,
}

impl ContentType {
    /// Detectable types, highest tie-break priority first.
    pub const DETECTABLE: [ContentType; 5] = [
        ContentType::Notion,
        ContentType::Email,
        ContentType::Code,
        ContentType::Markdown,
        ContentType::Docs,
    ];

    /// Tie-break rank; lower wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Notion => 0,
            Self::Email => 1,
            Self::Code => 2,
            Self::Markdown => 3,
            Self::Docs => 4,
            Self::Auto => u8::MAX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Docs => "docs",
            Self::Notion => "notion",
            Self::Email => "email",
            Self::Markdown => "markdown",
            Self::Auto => "auto",
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = crate::TidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" => Ok(Self::Code),
            "docs" | "doc" => Ok(Self::Docs),
            "notion" => Ok(Self::Notion),
            "email" | "eml" => Ok(Self::Email),
            "markdown" | "md" => Ok(Self::Markdown),
            "auto" => Ok(Self::Auto),
            other => Err(crate::TidyError::InvalidConfig(format!("unknown content type: {other}"))),
        }
    }
}

/// Pipeline stage a warning originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Read,
    Detect,
    Preprocess,
    Optimize,
    Postprocess,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Detect => "detect",
            Self::Preprocess => "preprocess",
            Self::Optimize => "optimize",
            Self::Postprocess => "postprocess",
        };
        f.write_str(s)
    }
}

/// Outcome of scoring a file against one or all content types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub content_type: ContentType,
    /// Clamped to `[0, 1]`.
    pub confidence: f64,
    /// Weighted contribution of each signal that fired.
    pub signals: BTreeMap<String, f64>,
    /// Set when no type cleared the threshold and the default type was used.
    #[serde(default)]
    pub fallback: bool,
}

impl DetectionResult {
    pub fn new(content_type: ContentType) -> Self {
        Self { content_type, confidence: 0.0, signals: BTreeMap::new(), fallback: false }
    }

    /// Add a weighted signal; zero contributions are not recorded.
    pub fn add_signal(&mut self, name: &str, score: f64, weight: f64) {
        let contribution = score.clamp(0.0, 1.0) * weight;
        if contribution > 0.0 {
            self.signals.insert(name.to_string(), contribution);
        }
    }

    /// Sum the recorded signals into `confidence`, clamped to `[0, 1]`.
    pub fn finish(mut self) -> Self {
        let total: f64 = self.signals.values().sum();
        self.confidence = total.clamp(0.0, 1.0);
        self
    }
}
