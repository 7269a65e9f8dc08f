//! Optimizer configuration.
//!
//! Every struct is `#[serde(default)]`: unknown keys are ignored and missing
//! keys fall back to the defaults below.

use crate::{ContentType, Result, TidyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TidyConfig {
    /// Type used when no detector score clears `min_confidence`.
    pub default_type: ContentType,
    pub min_confidence: f64,
    /// Skip privacy policy / terms of service pages.
    pub policy_filter: bool,
    /// Bytes the detector reads when it has to sample a file itself.
    pub detection_sample_bytes: usize,
    pub guard: GuardConfig,
    pub code: CodeConfig,
    pub docs: DocsConfig,
    pub notion: NotionConfig,
    pub email: EmailConfig,
    pub markdown: MarkdownConfig,
}

/// Over-deletion guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Largest fraction of its input a single rule may delete.
    pub max_deletion_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub remove_boilerplate: bool,
    pub remove_logs: bool,
    pub preserve_todos: bool,
    pub preserve_imports: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub preserve_toc: bool,
    pub preserve_breadcrumbs: bool,
    pub preserve_edit_info: bool,
    pub preserve_version_info: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub preserve_callouts: bool,
    pub preserve_toggles: bool,
    pub include_id_comments: bool,
    pub convert_properties: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub preserve_headers: bool,
    pub preserve_quotes: bool,
    pub preserve_signatures: bool,
    /// Quote levels kept; `0` drops all quoted text.
    pub max_quote_depth: usize,
    pub remove_disclaimers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub preserve_html: bool,
    pub preserve_comments: bool,
    pub preserve_images: bool,
    pub preserve_badges: bool,
    pub preserve_frontmatter: bool,
    pub fix_redundant_links: bool,
    pub fix_relative_links: bool,
}

impl Default for TidyConfig {
    fn default() -> Self {
        Self {
            default_type: ContentType::Docs,
            min_confidence: 0.3,
            policy_filter: true,
            detection_sample_bytes: 8 * 1024,
            guard: GuardConfig::default(),
            code: CodeConfig::default(),
            docs: DocsConfig::default(),
            notion: NotionConfig::default(),
            email: EmailConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { max_deletion_ratio: 0.95 }
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            remove_boilerplate: true,
            remove_logs: false,
            preserve_todos: true,
            preserve_imports: true,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            preserve_toc: true,
            preserve_breadcrumbs: false,
            preserve_edit_info: false,
            preserve_version_info: true,
        }
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            preserve_callouts: true,
            preserve_toggles: true,
            include_id_comments: true,
            convert_properties: true,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            preserve_headers: false,
            preserve_quotes: false,
            preserve_signatures: false,
            max_quote_depth: 1,
            remove_disclaimers: false,
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            preserve_html: false,
            preserve_comments: false,
            preserve_images: true,
            preserve_badges: false,
            preserve_frontmatter: true,
            fix_redundant_links: true,
            fix_relative_links: false,
        }
    }
}

impl TidyConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.default_type.is_auto() {
            return Err(TidyError::InvalidConfig("default_type cannot be auto".into()));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TidyError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        let ratio = self.guard.max_deletion_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(TidyError::InvalidConfig(format!(
                "guard.max_deletion_ratio must be within (0, 1], got {ratio}"
            )));
        }
        if self.detection_sample_bytes == 0 {
            return Err(TidyError::InvalidConfig("detection_sample_bytes must be positive".into()));
        }
        Ok(())
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TidyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
