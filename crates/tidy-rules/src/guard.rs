//! Over-deletion guard and panic isolation around a single rule.

use crate::Rule;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tidy_core::{Result, TidyError};

/// Caps the share of its input one rule application may delete.
#[derive(Debug, Clone, Copy)]
pub struct DeletionGuard {
    max_deletion_ratio: f64,
}

impl DeletionGuard {
    pub fn new(max_deletion_ratio: f64) -> Self {
        Self { max_deletion_ratio }
    }

    pub fn max_deletion_ratio(&self) -> f64 {
        self.max_deletion_ratio
    }

    /// Fraction of `before`'s non-whitespace characters missing from `after`.
    /// Whitespace left behind by a deletion does not count as kept content.
    pub fn deletion_ratio(before: &str, after: &str) -> f64 {
        let b = visible_chars(before);
        if b == 0 {
            return 0.0;
        }
        let a = visible_chars(after);
        b.saturating_sub(a) as f64 / b as f64
    }

    pub fn check(&self, rule_id: &str, before: &str, after: &str) -> Result<()> {
        let ratio = Self::deletion_ratio(before, after);
        if ratio > self.max_deletion_ratio {
            return Err(TidyError::OverDeletion { rule: rule_id.to_string(), ratio });
        }
        Ok(())
    }
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

impl Default for DeletionGuard {
    fn default() -> Self {
        Self::new(0.95)
    }
}

/// Text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

/// Run `f` and turn a panic into a `RuleApplication` error for `rule_id`.
pub fn isolate<T>(rule_id: &str, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| TidyError::RuleApplication {
        rule: rule_id.to_string(),
        reason: panic_message(payload.as_ref()),
    })
}

/// Apply `rule` with panic isolation and the deletion guard.
///
/// On error the caller keeps its original text.
pub fn apply_guarded(rule: &Rule, text: &str, guard: &DeletionGuard) -> Result<(String, usize)> {
    let (out, count) = isolate(rule.id(), || rule.apply(text))?;
    if count > 0 {
        guard.check(rule.id(), text, &out)?;
    }
    Ok((out, count))
}
