use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tidy_core::ContentType;

/// One scored signal before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    pub name: &'static str,
    /// In `[0, 1]`; values outside are clamped when weighted.
    pub score: f64,
}

impl SignalScore {
    pub fn new(name: &'static str, score: f64) -> Self {
        Self { name, score }
    }

    /// 1.0 when `hit`, otherwise 0.0.
    pub fn flag(name: &'static str, hit: bool) -> Self {
        Self { name, score: if hit { 1.0 } else { 0.0 } }
    }

    /// `count / saturation`, capped at 1.0.
    pub fn saturating(name: &'static str, count: usize, saturation: usize) -> Self {
        let score = if saturation == 0 { 0.0 } else { (count as f64 / saturation as f64).min(1.0) };
        Self { name, score }
    }
}

/// Filename and keyword tables plus the per-type signal weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Lower-case extensions (with dot) that mark plain documentation.
    pub docs_extensions: Vec<String>,
    /// Lower-case file stems typical of documentation.
    pub docs_file_names: Vec<String>,
    pub markdown_extensions: Vec<String>,
    pub email_extensions: Vec<String>,
    /// Header names counted toward an RFC 822 header block.
    pub email_headers: Vec<String>,
    /// Property names Notion writes under a page title.
    pub notion_properties: Vec<String>,
    pub weights: BTreeMap<ContentType, BTreeMap<String, f64>>,
}

impl DetectionConfig {
    /// Weight for `signal` under `content_type`; unknown signals weigh nothing.
    pub fn weight(&self, content_type: ContentType, signal: &str) -> f64 {
        self.weights
            .get(&content_type)
            .and_then(|w| w.get(signal))
            .copied()
            .unwrap_or(0.0)
    }
}
