//! Content-type detector: weighted filename and content signals per type.

pub mod config;
pub mod language;
pub mod selector;
pub mod signals;
pub mod types;

pub use config::{default_detection_config, DETECTION_CONFIG};
pub use language::{detect_language, Language};
pub use selector::select_best;
pub use types::{DetectionConfig, SignalScore};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tidy_core::{ContentType, DetectionResult, TidyConfig};
use tracing::debug;

/// Scores files against every detectable type and picks one.
///
/// Deterministic: the same path and content always give the same result.
#[derive(Debug, Clone)]
pub struct Detector {
    config: Arc<DetectionConfig>,
    min_confidence: f64,
    default_type: ContentType,
    sample_bytes: usize,
}

impl Detector {
    pub fn new(config: DetectionConfig, min_confidence: f64, default_type: ContentType, sample_bytes: usize) -> Self {
        Self { config: Arc::new(config), min_confidence, default_type, sample_bytes }
    }

    /// Default tables with the thresholds from `config`.
    pub fn from_config(config: &TidyConfig) -> Self {
        Self::new(
            DETECTION_CONFIG.clone(),
            config.min_confidence,
            config.default_type,
            config.detection_sample_bytes,
        )
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn default_type(&self) -> ContentType {
        self.default_type
    }

    /// Confidence that `content` at `path` is `content_type`.
    /// `Auto` never matches.
    pub fn score(&self, content_type: ContentType, path: &Path, content: &str) -> DetectionResult {
        let sample = self.sample(content);
        let scores = match content_type {
            ContentType::Code => signals::score_code(path, sample),
            ContentType::Docs => signals::score_docs(path, sample, &self.config),
            ContentType::Markdown => signals::score_markdown(path, sample, &self.config),
            ContentType::Notion => signals::score_notion(path, sample, &self.config),
            ContentType::Email => signals::score_email(path, sample, &self.config),
            ContentType::Auto => Vec::new(),
        };
        let mut result = DetectionResult::new(content_type);
        for s in scores {
            result.add_signal(s.name, s.score, self.config.weight(content_type, s.name));
        }
        result.finish()
    }

    /// One result per detectable type, in priority order.
    pub fn score_all(&self, path: &Path, content: &str) -> Vec<DetectionResult> {
        ContentType::DETECTABLE.iter().map(|ct| self.score(*ct, path, content)).collect()
    }

    /// Detect the type of `path`. Without `content` a leading sample is read
    /// from disk; an unreadable file is scored on its name alone.
    pub fn detect(&self, path: &Path, content: Option<&str>) -> DetectionResult {
        let owned;
        let content = match content {
            Some(c) => c,
            None => {
                owned = self.read_sample(path).unwrap_or_default();
                owned.as_str()
            }
        };
        let result = select_best(self.score_all(path, content), self.min_confidence, self.default_type);
        debug!(
            "detected {} as {} (confidence {:.2}{})",
            path.display(),
            result.content_type,
            result.confidence,
            if result.fallback { ", fallback" } else { "" }
        );
        result
    }

    /// First `sample_bytes` of a file, decoded lossily.
    pub fn read_sample(&self, path: &Path) -> Option<String> {
        let file = File::open(path).ok()?;
        let mut buf = Vec::with_capacity(self.sample_bytes.min(64 * 1024));
        file.take(self.sample_bytes as u64).read_to_end(&mut buf).ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    fn sample<'a>(&self, content: &'a str) -> &'a str {
        if content.len() <= self.sample_bytes {
            return content;
        }
        let mut end = self.sample_bytes;
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        &content[..end]
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::from_config(&TidyConfig::default())
    }
}
