//! Closed dispatch over the five optimizers.

use crate::pipeline::process;
use crate::traits::ContentOptimizer;
use crate::{CodeOptimizer, DocsOptimizer, EmailOptimizer, MarkdownOptimizer, NotionOptimizer};
use std::path::Path;
use std::sync::Arc;
use tidy_core::{ContentType, OptimizationStats, TidyConfig, TokenCounter};
use tidy_detect::Detector;
use tidy_rules::{DeletionGuard, RuleSet};

/// One optimizer per detectable content type.
pub enum Optimizer {
    Code(CodeOptimizer),
    Docs(DocsOptimizer),
    Notion(NotionOptimizer),
    Email(EmailOptimizer),
    Markdown(MarkdownOptimizer),
}

impl Optimizer {
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Code(o) => o.content_type(),
            Self::Docs(o) => o.content_type(),
            Self::Notion(o) => o.content_type(),
            Self::Email(o) => o.content_type(),
            Self::Markdown(o) => o.content_type(),
        }
    }

    pub fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        match self {
            Self::Code(o) => o.detect_content_type(path, content),
            Self::Docs(o) => o.detect_content_type(path, content),
            Self::Notion(o) => o.detect_content_type(path, content),
            Self::Email(o) => o.detect_content_type(path, content),
            Self::Markdown(o) => o.detect_content_type(path, content),
        }
    }

    /// Run every stage over `raw`.
    pub fn process(
        &self,
        path: &Path,
        raw: &str,
        guard: DeletionGuard,
        counter: &dyn TokenCounter,
    ) -> (String, OptimizationStats) {
        match self {
            Self::Code(o) => process(o, path, raw, guard, counter),
            Self::Docs(o) => process(o, path, raw, guard, counter),
            Self::Notion(o) => process(o, path, raw, guard, counter),
            Self::Email(o) => process(o, path, raw, guard, counter),
            Self::Markdown(o) => process(o, path, raw, guard, counter),
        }
    }
}

/// Dispatch table built once from a config, rule set and detector.
pub struct Optimizers {
    entries: Vec<Optimizer>,
}

impl Optimizers {
    pub fn new(config: &TidyConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let entries = vec![
            Optimizer::Notion(NotionOptimizer::new(config.notion.clone(), rules.clone(), detector.clone())),
            Optimizer::Email(EmailOptimizer::new(config.email.clone(), rules.clone(), detector.clone())),
            Optimizer::Code(CodeOptimizer::new(config.code.clone(), rules.clone(), detector.clone())),
            Optimizer::Markdown(MarkdownOptimizer::new(config.markdown.clone(), rules.clone(), detector.clone())),
            Optimizer::Docs(DocsOptimizer::new(config.docs.clone(), rules, detector)),
        ];
        Self { entries }
    }

    /// `None` for `Auto`, which names no optimizer.
    pub fn get(&self, content_type: ContentType) -> Option<&Optimizer> {
        self.entries.iter().find(|o| o.content_type() == content_type)
    }

    /// Optimizers in tie-break priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Optimizer> {
        self.entries.iter()
    }

    /// `(type, confidence)` from each optimizer, in priority order.
    pub fn confidences(&self, path: &Path, content: &str) -> Vec<(ContentType, f64)> {
        self.entries.iter().map(|o| (o.content_type(), o.detect_content_type(path, content))).collect()
    }
}
