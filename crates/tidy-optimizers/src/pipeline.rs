//! Stage orchestration shared by every optimizer.
//!
//! preprocess → optimize → postprocess, with a panic in any stage turned into
//! a stage-tagged warning and that stage's input passed through.

use crate::traits::{ContentOptimizer, Prepared};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tidy_core::{OptimizationStats, Stage, TokenCounter, Warning, WarningKind};
use tidy_rules::{panic_message, DeletionGuard, RulePass};
use tracing::{debug, warn};

fn run_stage<T>(path: &str, stage: Stage, stats: &mut OptimizationStats, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Some(v),
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!("{path}: {stage} stage failed: {reason}");
            stats.warn(Warning::new(path, stage, WarningKind::StageFailure, format!("{stage} stage failed: {reason}")));
            None
        }
    }
}

/// Run all stages of `optimizer` over `raw`.
pub fn process<O: ContentOptimizer>(
    optimizer: &O,
    path: &Path,
    raw: &str,
    guard: DeletionGuard,
    counter: &dyn TokenCounter,
) -> (String, OptimizationStats) {
    let started = Instant::now();
    let path_str = path.display().to_string();
    let mut stats = OptimizationStats::new(path_str.clone(), optimizer.content_type());
    stats.original_chars = raw.chars().count();
    stats.original_tokens = counter.count(raw);
    stats.tokens_approximate = counter.is_approximate();

    let Prepared { text, mut meta } = run_stage(&path_str, Stage::Preprocess, &mut stats, || optimizer.preprocess(raw, path))
        .unwrap_or_else(|| Prepared::new(raw, O::Meta::default()));

    let mut pass = RulePass::new(&path_str, guard);
    let input = text.clone();
    let optimized = run_stage(&path_str, Stage::Optimize, &mut stats, || optimizer.optimize(text, &mut meta, &mut pass));
    let (triggered, warnings) = pass.into_parts();
    stats.warnings.extend(warnings);
    // triggers from a failed stage describe text that was thrown away
    let text = match optimized {
        Some(out) => {
            for (rule, count) in &triggered {
                stats.record_rule(rule, *count);
            }
            out
        }
        None => input,
    };

    let input = text.clone();
    let text = run_stage(&path_str, Stage::Postprocess, &mut stats, || optimizer.postprocess(text, &meta))
        .unwrap_or(input);

    stats.notion_reference = optimizer.id_reference(&meta);
    stats.optimized_chars = text.chars().count();
    stats.optimized_tokens = counter.count(&text);
    stats.processing_time = started.elapsed();
    debug!(
        "{}: {} {} -> {} chars, {} rules fired",
        path_str,
        stats.content_type,
        stats.original_chars,
        stats.optimized_chars,
        stats.rules_triggered.len()
    );
    (text, stats)
}
