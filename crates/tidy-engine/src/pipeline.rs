//! UnifiedOptimizer: policy filter, detection and dispatch over a batch.

use crate::{FileOutcome, RunStats};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tidy_core::{
    ApproximateCounter, ContentType, DetectionResult, Result, Stage, TidyConfig, TidyError, TokenCounter, Warning,
    WarningKind,
};
use tidy_detect::Detector;
use tidy_optimizers::Optimizers;
use tidy_rules::{is_policy_page, DeletionGuard, RuleSet};
use tracing::{debug, info, warn};

/// Bytes sniffed for a NUL before a file is decoded.
const BINARY_SNIFF_BYTES: usize = 1024;

/// Entry point: one instance optimizes any number of files.
pub struct UnifiedOptimizer {
    config: TidyConfig,
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    optimizers: Optimizers,
    guard: DeletionGuard,
    counter: Arc<dyn TokenCounter>,
}

impl UnifiedOptimizer {
    /// Build with the standard rule catalogue.
    pub fn new(config: TidyConfig) -> Result<Self> {
        let rules = RuleSet::standard()?;
        Self::with_rules(config, rules)
    }

    /// Build with a caller-supplied rule set, e.g. the standard catalogue
    /// plus custom rules.
    pub fn with_rules(config: TidyConfig, rules: RuleSet) -> Result<Self> {
        config.validate()?;
        let rules = Arc::new(rules);
        let detector = Arc::new(Detector::from_config(&config));
        let optimizers = Optimizers::new(&config, rules.clone(), detector.clone());
        let guard = DeletionGuard::new(config.guard.max_deletion_ratio);
        Ok(Self { config, rules, detector, optimizers, guard, counter: Arc::new(ApproximateCounter) })
    }

    /// Replace the `ceil(chars / 4)` estimate with a real tokenizer.
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.counter = Arc::new(counter);
        self
    }

    pub fn config(&self) -> &TidyConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn optimizers(&self) -> &Optimizers {
        &self.optimizers
    }

    pub fn detect(&self, path: &Path, content: Option<&str>) -> DetectionResult {
        self.detector.detect(path, content)
    }

    /// Optimize in-memory `content` as if read from `path`.
    pub fn optimize_content(&self, path: &Path, content: &str, forced: ContentType) -> FileOutcome {
        let path_str = path.display().to_string();
        if self.config.policy_filter && is_policy_page(path, content) {
            info!("skipping policy page {path_str}");
            let warning = Warning::new(
                path_str.clone(),
                Stage::Detect,
                WarningKind::PolicyFiltered,
                "policy page filtered",
            );
            return FileOutcome::Skipped { path: path_str, warning };
        }

        let (content_type, detection) = if forced.is_auto() {
            let result = self.detector.detect(path, Some(content));
            (result.content_type, Some(result))
        } else {
            (forced, None)
        };

        let Some(optimizer) = self.optimizers.get(content_type) else {
            // the detector never yields Auto and forced Auto is resolved above
            let warning = Warning::new(
                path_str.clone(),
                Stage::Detect,
                WarningKind::StageFailure,
                format!("no optimizer for {content_type}"),
            );
            return FileOutcome::Skipped { path: path_str, warning };
        };

        let (text, mut stats) = optimizer.process(path, content, self.guard, self.counter.as_ref());
        stats.detection = detection;
        FileOutcome::from_run(text, stats)
    }

    /// Read and optimize one file. Never fails: unreadable or non-text
    /// files come back as `Skipped`.
    pub fn optimize_file(&self, path: &Path, forced: ContentType) -> FileOutcome {
        match read_text(path) {
            Ok(content) => self.optimize_content(path, &content, forced),
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                let path_str = path.display().to_string();
                let warning = Warning::from_error(path_str.clone(), Stage::Read, &err);
                FileOutcome::Skipped { path: path_str, warning }
            }
        }
    }

    /// Optimize every entry of `files` (relative to `root` unless absolute).
    pub fn optimize_directory<P: AsRef<Path>>(&self, root: &Path, files: &[P], forced: ContentType) -> RunStats {
        self.optimize_directory_with(root, files, forced, |_, _| {})
    }

    /// Like [`optimize_directory`](Self::optimize_directory), handing each
    /// optimized `(path, text)` to `sink`. Skipped files never reach it.
    pub fn optimize_directory_with<P, F>(&self, root: &Path, files: &[P], forced: ContentType, mut sink: F) -> RunStats
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &str),
    {
        let started = Instant::now();
        let mut stats = RunStats::new();
        for file in files {
            let path = resolve(root, file.as_ref());
            let outcome = self.optimize_file(&path, forced);
            if let Some(text) = outcome.text() {
                sink(&path, text);
            }
            debug!("{}: {}", path.display(), if outcome.is_skipped() { "skipped" } else { "done" });
            stats.record(&outcome);
        }
        stats.processing_time = started.elapsed();
        stats.log_summary();
        stats
    }
}

fn resolve(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

/// Read `path` as UTF-8 text, rejecting anything with a NUL near the start.
pub fn read_text(path: &Path) -> Result<String> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| TidyError::Read { path: display.clone(), source })?;
    if bytes.iter().take(BINARY_SNIFF_BYTES).any(|b| *b == 0) {
        return Err(TidyError::Encoding { path: display });
    }
    String::from_utf8(bytes).map_err(|_| TidyError::Encoding { path: display })
}
