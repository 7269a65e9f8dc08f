//! Run-level statistics folded from per-file outcomes.

use crate::FileOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tidy_core::{reduction_pct, ContentType, IdReference, Result, Warning, WarningKind};
use tracing::info;

/// Totals for a batch of files.
///
/// Updated once per finished file; a zero-file run stays all zeros.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub original_chars: usize,
    pub optimized_chars: usize,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
    /// Set when any file's token counts were estimated.
    pub tokens_approximate: bool,
    pub rules_triggered: BTreeMap<String, usize>,
    pub files_by_type: BTreeMap<ContentType, usize>,
    /// Files whose type came from the detector rather than a forced type.
    pub auto_detected: usize,
    /// Detected files that fell back to the default type.
    pub detection_fallbacks: usize,
    pub policy_pages_skipped: usize,
    pub policy_pages: Vec<String>,
    pub skipped: Vec<String>,
    pub warnings: Vec<Warning>,
    pub notion_references: Vec<IdReference>,
    pub processing_time: Duration,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            files_processed: 0,
            files_skipped: 0,
            original_chars: 0,
            optimized_chars: 0,
            original_tokens: 0,
            optimized_tokens: 0,
            tokens_approximate: false,
            rules_triggered: BTreeMap::new(),
            files_by_type: BTreeMap::new(),
            auto_detected: 0,
            detection_fallbacks: 0,
            policy_pages_skipped: 0,
            policy_pages: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
            notion_references: Vec::new(),
            processing_time: Duration::ZERO,
        }
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's outcome in.
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Optimized { stats, .. } | FileOutcome::Warned { stats, .. } => {
                self.files_processed += 1;
                self.original_chars += stats.original_chars;
                self.optimized_chars += stats.optimized_chars;
                self.original_tokens += stats.original_tokens;
                self.optimized_tokens += stats.optimized_tokens;
                self.tokens_approximate |= stats.tokens_approximate;
                for (rule, count) in &stats.rules_triggered {
                    *self.rules_triggered.entry(rule.clone()).or_insert(0) += count;
                }
                *self.files_by_type.entry(stats.content_type).or_insert(0) += 1;
                if let Some(detection) = &stats.detection {
                    self.auto_detected += 1;
                    if detection.fallback {
                        self.detection_fallbacks += 1;
                    }
                }
                self.warnings.extend(stats.warnings.iter().cloned());
                if let Some(reference) = &stats.notion_reference {
                    self.notion_references.push(reference.clone());
                }
                self.processing_time += stats.processing_time;
            }
            FileOutcome::Skipped { path, warning } => {
                self.files_skipped += 1;
                self.skipped.push(path.clone());
                if warning.kind == WarningKind::PolicyFiltered {
                    self.policy_pages_skipped += 1;
                    self.policy_pages.push(path.clone());
                }
                self.warnings.push(warning.clone());
            }
        }
    }

    /// Add another run's totals; the earlier start time is kept.
    pub fn merge(&mut self, other: RunStats) {
        self.started_at = self.started_at.min(other.started_at);
        self.files_processed += other.files_processed;
        self.files_skipped += other.files_skipped;
        self.original_chars += other.original_chars;
        self.optimized_chars += other.optimized_chars;
        self.original_tokens += other.original_tokens;
        self.optimized_tokens += other.optimized_tokens;
        self.tokens_approximate |= other.tokens_approximate;
        for (rule, count) in other.rules_triggered {
            *self.rules_triggered.entry(rule).or_insert(0) += count;
        }
        for (ct, count) in other.files_by_type {
            *self.files_by_type.entry(ct).or_insert(0) += count;
        }
        self.auto_detected += other.auto_detected;
        self.detection_fallbacks += other.detection_fallbacks;
        self.policy_pages_skipped += other.policy_pages_skipped;
        self.policy_pages.extend(other.policy_pages);
        self.skipped.extend(other.skipped);
        self.warnings.extend(other.warnings);
        self.notion_references.extend(other.notion_references);
        self.processing_time += other.processing_time;
    }

    pub fn files_seen(&self) -> usize {
        self.files_processed + self.files_skipped
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

    /// Rules by trigger count, most frequent first.
    pub fn top_rules(&self, n: usize) -> Vec<(&str, usize)> {
        let mut rules: Vec<(&str, usize)> = self.rules_triggered.iter().map(|(r, c)| (r.as_str(), *c)).collect();
        rules.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rules.truncate(n);
        rules
    }

    /// Markdown table of clean Notion paths and their export IDs.
    /// Empty when the run saw no Notion IDs.
    pub fn notion_reference_table(&self) -> String {
        if self.notion_references.is_empty() {
            return String::new();
        }
        let mut rows: Vec<&IdReference> = self.notion_references.iter().collect();
        rows.sort_by(|a, b| a.clean.cmp(&b.clean).then_with(|| a.id.cmp(&b.id)));
        rows.dedup_by(|a, b| a.clean == b.clean && a.id == b.id);

        let mut out = String::from("## Notion Content ID Reference\n\n");
        out.push_str("| Content Path | Notion ID |\n");
        out.push_str("|-------------|-----------|\n");
        for r in rows {
            out.push_str(&format!("| {} | `{}` |\n", r.clean, r.id));
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn log_summary(&self) {
        info!(
            "tidy run: {} processed, {} skipped ({} policy pages), {} -> {} chars ({:.1}% saved)",
            self.files_processed,
            self.files_skipped,
            self.policy_pages_skipped,
            self.original_chars,
            self.optimized_chars,
            self.char_reduction_pct()
        );
        info!(
            "tokens: {} -> {} ({:.1}% saved{})",
            self.original_tokens,
            self.optimized_tokens,
            self.token_reduction_pct(),
            if self.tokens_approximate { ", estimated" } else { "" }
        );
        for (rule, count) in self.top_rules(10) {
            info!("  {rule}: {count}");
        }
        if !self.warnings.is_empty() {
            info!("{} warnings", self.warnings.len());
        }
    }
}
