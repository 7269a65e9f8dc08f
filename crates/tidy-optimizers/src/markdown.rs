//! Markdown files: embedded HTML, badges, images and link cleanup.

use crate::shared::{active_rules, apply_rules, join_frontmatter, split_frontmatter, tidy_output, Frontmatter};
use crate::traits::{ContentOptimizer, Prepared};
use std::path::Path;
use std::sync::Arc;
use tidy_core::{ContentType, MarkdownConfig};
use tidy_detect::Detector;
use tidy_rules::format::normalize_newlines;
use tidy_rules::markdown::{
    BADGE, HTML_BREAK, HTML_COMMENT, HTML_ENTITY, HTML_IMG_TO_MARKDOWN, HTML_SCRIPT_STYLE, HTML_TAG, IMAGE,
    REDUNDANT_LINK, RELATIVE_LINK,
};
use tidy_rules::segments::{fenced_code_ranges, inline_code_ranges};
use tidy_rules::web::{FOOTER_HTML, HEADER_HTML, HTML_FORM, NAV_HTML, NAV_LIST_HTML, SIDEBAR_HTML, SLIDER_HTML};
use tidy_rules::{RulePass, RuleSet, Shields};

/// Trigger id for a dropped frontmatter block.
pub const FRONTMATTER: &str = "markdown_frontmatter";

/// Rules that rewrite or remove HTML markup.
const HTML_RULES: [&str; 12] = [
    HTML_SCRIPT_STYLE,
    HTML_FORM,
    NAV_LIST_HTML,
    NAV_HTML,
    SIDEBAR_HTML,
    SLIDER_HTML,
    HEADER_HTML,
    FOOTER_HTML,
    HTML_TAG,
    HTML_BREAK,
    HTML_IMG_TO_MARKDOWN,
    HTML_ENTITY,
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkdownMeta {
    pub frontmatter: Option<Frontmatter>,
}

pub struct MarkdownOptimizer {
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    config: MarkdownConfig,
    disabled: Vec<&'static str>,
}

impl MarkdownOptimizer {
    pub fn new(config: MarkdownConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let mut disabled = Vec::new();
        if config.preserve_comments {
            disabled.push(HTML_COMMENT);
        }
        if config.preserve_html {
            disabled.extend(HTML_RULES);
        }
        if config.preserve_badges {
            disabled.push(BADGE);
        }
        // kept images get their HTML form rewritten to Markdown instead
        if config.preserve_images {
            disabled.push(IMAGE);
        } else {
            disabled.push(HTML_IMG_TO_MARKDOWN);
        }
        if !config.fix_redundant_links {
            disabled.push(REDUNDANT_LINK);
        }
        if !config.fix_relative_links {
            disabled.push(RELATIVE_LINK);
        }
        Self { rules, detector, config, disabled }
    }

    pub fn config(&self) -> &MarkdownConfig {
        &self.config
    }
}

fn code_shields(text: &str) -> Shields {
    Shields::new().with(fenced_code_ranges(text)).with(inline_code_ranges(text))
}

impl ContentOptimizer for MarkdownOptimizer {
    type Meta = MarkdownMeta;

    fn content_type(&self) -> ContentType {
        ContentType::Markdown
    }

    fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        self.detector.score(ContentType::Markdown, path, content).confidence
    }

    fn preprocess(&self, raw: &str, _path: &Path) -> Prepared<MarkdownMeta> {
        let text = normalize_newlines(raw);
        let (frontmatter, body) = split_frontmatter(&text);
        Prepared::new(body, MarkdownMeta { frontmatter })
    }

    fn optimize(&self, text: String, meta: &mut MarkdownMeta, pass: &mut RulePass<'_>) -> String {
        if !self.config.preserve_frontmatter && meta.frontmatter.is_some() {
            pass.record(FRONTMATTER, 1);
        }
        let rules = active_rules(&self.rules, ContentType::Markdown, &self.disabled);
        apply_rules(pass, rules, text, code_shields)
    }

    fn postprocess(&self, text: String, meta: &MarkdownMeta) -> String {
        let frontmatter = meta.frontmatter.as_ref().filter(|_| self.config.preserve_frontmatter);
        tidy_output(&join_frontmatter(frontmatter, &text))
    }
}
