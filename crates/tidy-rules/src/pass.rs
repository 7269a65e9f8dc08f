//! One optimize stage's worth of rule applications for a single file.

use crate::{apply_guarded, DeletionGuard, Rule, Shields};
use std::collections::BTreeMap;
use tidy_core::{Stage, Warning};
use tracing::{debug, warn};

/// Applies rules to one file's text, collecting trigger counts and warnings.
///
/// A rule that panics or trips the deletion guard leaves the text as it was
/// and records a warning; later rules still run.
pub struct RulePass<'a> {
    path: &'a str,
    guard: DeletionGuard,
    triggered: BTreeMap<String, usize>,
    warnings: Vec<Warning>,
}

impl<'a> RulePass<'a> {
    pub fn new(path: &'a str, guard: DeletionGuard) -> Self {
        Self { path, guard, triggered: BTreeMap::new(), warnings: Vec::new() }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    pub fn guard(&self) -> &DeletionGuard {
        &self.guard
    }

    /// Apply `rule` to the whole text.
    pub fn apply(&mut self, rule: &Rule, text: String) -> String {
        match apply_guarded(rule, &text, &self.guard) {
            Ok((out, count)) => {
                self.record(rule.id(), count);
                out
            }
            Err(err) => {
                warn!("{}: skipping rule {}: {}", self.path, rule.id(), err);
                self.warnings.push(Warning::from_error(self.path, Stage::Optimize, &err));
                text
            }
        }
    }

    /// Apply `rule` outside the regions `shields` computes for the current text.
    pub fn apply_shielded<F>(&mut self, rule: &Rule, text: String, shields: F) -> String
    where
        F: Fn(&str) -> Shields,
    {
        let regions = shields(&text);
        if regions.is_empty() {
            return self.apply(rule, text);
        }
        let result = crate::isolate(rule.id(), || rule.apply_outside(&text, &regions))
            .and_then(|(out, count)| {
                if count > 0 {
                    self.guard.check(rule.id(), &text, &out)?;
                }
                Ok((out, count))
            });
        match result {
            Ok((out, count)) => {
                self.record(rule.id(), count);
                out
            }
            Err(err) => {
                warn!("{}: skipping rule {}: {}", self.path, rule.id(), err);
                self.warnings.push(Warning::from_error(self.path, Stage::Optimize, &err));
                text
            }
        }
    }

    /// Record triggers for a bespoke transform that is not a `Rule`.
    pub fn record(&mut self, id: &str, count: usize) {
        if count > 0 {
            debug!("{}: {} x{}", self.path, id, count);
            *self.triggered.entry(id.to_string()).or_insert(0) += count;
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn triggered(&self) -> &BTreeMap<String, usize> {
        &self.triggered
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (BTreeMap<String, usize>, Vec<Warning>) {
        (self.triggered, self.warnings)
    }
}
