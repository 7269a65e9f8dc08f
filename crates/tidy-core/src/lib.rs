//! Shared model for the corpus tidy engine: content types, config,
//! per-file statistics, errors and token counting.

pub mod config;
pub mod content;
pub mod error;
pub mod stats;
pub mod tokens;

pub use config::{CodeConfig, DocsConfig, EmailConfig, GuardConfig, MarkdownConfig, NotionConfig, TidyConfig};
pub use content::{ContentType, DetectionResult, Stage};
pub use error::{Result, TidyError};
pub use stats::{reduction_pct, IdReference, OptimizationStats, Warning, WarningKind};
pub use tokens::{estimate_tokens, ApproximateCounter, TokenCounter};
