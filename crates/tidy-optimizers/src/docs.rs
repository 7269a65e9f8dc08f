//! Documentation and scraped web pages.

use crate::shared::{active_rules, apply_rules, blank_line_after_headings, join_frontmatter, split_frontmatter, tidy_output, Frontmatter};
use crate::traits::{ContentOptimizer, Prepared};
use std::path::Path;
use std::sync::Arc;
use tidy_core::{ContentType, DocsConfig};
use tidy_detect::Detector;
use tidy_rules::docs::{toc_ranges, BREADCRUMB, EDIT_BANNER, TOC_BLOCK, VERSION_BANNER};
use tidy_rules::format::normalize_newlines;
use tidy_rules::segments::{code_and_tables, inline_code_ranges};
use tidy_rules::{RulePass, RuleSet, Shields};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocsMeta {
    pub frontmatter: Option<Frontmatter>,
}

/// Strips site chrome, forms, tracking lines and doc navigation.
pub struct DocsOptimizer {
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    config: DocsConfig,
    disabled: Vec<&'static str>,
}

impl DocsOptimizer {
    pub fn new(config: DocsConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let toggles = [
            (config.preserve_breadcrumbs, BREADCRUMB),
            (config.preserve_edit_info, EDIT_BANNER),
            (config.preserve_version_info, VERSION_BANNER),
            (config.preserve_toc, TOC_BLOCK),
        ];
        let disabled = toggles.into_iter().filter(|(keep, _)| *keep).map(|(_, id)| id).collect();
        Self { rules, detector, config, disabled }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }
}

impl ContentOptimizer for DocsOptimizer {
    type Meta = DocsMeta;

    fn content_type(&self) -> ContentType {
        ContentType::Docs
    }

    fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        self.detector.score(ContentType::Docs, path, content).confidence
    }

    fn preprocess(&self, raw: &str, _path: &Path) -> Prepared<DocsMeta> {
        let text = normalize_newlines(raw);
        let (frontmatter, body) = split_frontmatter(&text);
        Prepared::new(body, DocsMeta { frontmatter })
    }

    fn optimize(&self, text: String, _meta: &mut DocsMeta, pass: &mut RulePass<'_>) -> String {
        let preserve_toc = self.config.preserve_toc;
        let rules = active_rules(&self.rules, ContentType::Docs, &self.disabled);
        apply_rules(pass, rules, text, move |t: &str| -> Shields {
            let shields = code_and_tables(t).with(inline_code_ranges(t));
            if preserve_toc {
                shields.with(toc_ranges(t))
            } else {
                shields
            }
        })
    }

    fn postprocess(&self, text: String, meta: &DocsMeta) -> String {
        let body = blank_line_after_headings(&text);
        tidy_output(&join_frontmatter(meta.frontmatter.as_ref(), &body))
    }
}
