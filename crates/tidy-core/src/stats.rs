//! Per-file statistics and warnings.

use crate::{ContentType, DetectionResult, Stage, TidyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ReadError,
    EncodingError,
    RuleApplication,
    OverDeletion,
    PolicyFiltered,
    StageFailure,
}

/// A non-fatal problem recorded against one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub path: String,
    pub stage: Stage,
    pub kind: WarningKind,
    pub rule: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn new(path: impl Into<String>, stage: Stage, kind: WarningKind, message: impl Into<String>) -> Self {
        Self { path: path.into(), stage, kind, rule: None, message: message.into() }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Map a pipeline error onto a warning for `path`.
    pub fn from_error(path: impl Into<String>, stage: Stage, err: &TidyError) -> Self {
        let (kind, rule) = match err {
            TidyError::Read { .. } | TidyError::Io(_) => (WarningKind::ReadError, None),
            TidyError::Encoding { .. } => (WarningKind::EncodingError, None),
            TidyError::RuleApplication { rule, .. } => (WarningKind::RuleApplication, Some(rule.clone())),
            TidyError::OverDeletion { rule, .. } => (WarningKind::OverDeletion, Some(rule.clone())),
            _ => (WarningKind::StageFailure, None),
        };
        Self { path: path.into(), stage, kind, rule, message: err.to_string() }
    }
}

/// Notion export ID lifted from a filename.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdReference {
    /// Path as exported, ID suffix included.
    pub original: String,
    /// Path with every ID suffix stripped.
    pub clean: String,
    pub id: String,
}

/// Statistics for one file, built up across the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub path: String,
    pub content_type: ContentType,
    pub detection: Option<DetectionResult>,
    pub original_chars: usize,
    pub optimized_chars: usize,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
    pub tokens_approximate: bool,
    pub rules_triggered: BTreeMap<String, usize>,
    pub warnings: Vec<Warning>,
    pub notion_reference: Option<IdReference>,
    pub processing_time: Duration,
}

impl OptimizationStats {
    pub fn new(path: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            path: path.into(),
            content_type,
            detection: None,
            original_chars: 0,
            optimized_chars: 0,
            original_tokens: 0,
            optimized_tokens: 0,
            tokens_approximate: false,
            rules_triggered: BTreeMap::new(),
            warnings: Vec::new(),
            notion_reference: None,
            processing_time: Duration::ZERO,
        }
    }

    /// Add `count` triggers for `rule`. Zero counts are not recorded.
    pub fn record_rule(&mut self, rule: &str, count: usize) {
        if count > 0 {
            *self.rules_triggered.entry(rule.to_string()).or_insert(0) += count;
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn chars_saved(&self) -> usize {
        self.original_chars.saturating_sub(self.optimized_chars)
    }

    pub fn char_reduction_pct(&self) -> f64 {
        reduction_pct(self.original_chars, self.optimized_chars)
    }

    pub fn token_reduction_pct(&self) -> f64 {
        reduction_pct(self.original_tokens, self.optimized_tokens)
    }
}

/// Percentage reduction from `before` to `after`; `0.0` when `before` is zero.
pub fn reduction_pct(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) / before as f64 * 100.0
}
