use serde::Serialize;
use tidy_core::{OptimizationStats, Warning};

/// Result of running one file through the engine.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Optimized without any problem.
    Optimized { text: String, stats: OptimizationStats },
    /// Optimized, but some rule or stage recorded a warning.
    Warned { text: String, stats: OptimizationStats },
    /// Not optimized; nothing to write.
    Skipped { path: String, warning: Warning },
}

impl FileOutcome {
    pub(crate) fn from_run(text: String, stats: OptimizationStats) -> Self {
        if stats.has_warnings() {
            Self::Warned { text, stats }
        } else {
            Self::Optimized { text, stats }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Optimized { stats, .. } | Self::Warned { stats, .. } => &stats.path,
            Self::Skipped { path, .. } => path,
        }
    }

    /// Optimized text, if the file was not skipped.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Optimized { text, .. } | Self::Warned { text, .. } => Some(text),
            Self::Skipped { .. } => None,
        }
    }

    pub fn stats(&self) -> Option<&OptimizationStats> {
        match self {
            Self::Optimized { stats, .. } | Self::Warned { stats, .. } => Some(stats),
            Self::Skipped { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Optimized { stats, .. } | Self::Warned { stats, .. } => &stats.warnings,
            Self::Skipped { warning, .. } => std::slice::from_ref(warning),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
