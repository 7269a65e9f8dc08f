//! Source files: license headers, log statements, TODO notes, import groups.

use crate::shared::active_rules;
use crate::traits::{ContentOptimizer, Prepared};
use std::path::Path;
use std::sync::Arc;
use tidy_core::{CodeConfig, ContentType};
use tidy_detect::{detect_language, Detector, Language};
use tidy_rules::code::{
    JS_IMPORT_GROUP, LICENSE_BLOCK_COMMENT, LICENSE_DOCSTRING, LICENSE_HASH_COMMENTS, LICENSE_SLASH_COMMENTS,
    LOG_STATEMENT, PYTHON_IMPORT_GROUP, TODO_COMMENT,
};
use tidy_rules::format::{ensure_trailing_newline, normalize_newlines, trim_leading_blank_lines};
use tidy_rules::{RulePass, RuleSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeMeta {
    pub language: Option<Language>,
    /// `#!` line, lifted so header rules see the license block first.
    pub shebang: Option<String>,
}

/// Code optimizer: removes boilerplate while keeping the program intact.
pub struct CodeOptimizer {
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    config: CodeConfig,
    disabled: Vec<&'static str>,
}

impl CodeOptimizer {
    pub fn new(config: CodeConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let mut disabled = Vec::new();
        if !config.remove_boilerplate {
            disabled.extend([LICENSE_BLOCK_COMMENT, LICENSE_HASH_COMMENTS, LICENSE_SLASH_COMMENTS, LICENSE_DOCSTRING]);
        }
        if !config.remove_logs {
            disabled.push(LOG_STATEMENT);
        }
        if config.preserve_todos {
            disabled.push(TODO_COMMENT);
        }
        if config.preserve_imports {
            disabled.extend([PYTHON_IMPORT_GROUP, JS_IMPORT_GROUP]);
        }
        Self { rules, detector, config, disabled }
    }

    pub fn config(&self) -> &CodeConfig {
        &self.config
    }
}

impl ContentOptimizer for CodeOptimizer {
    type Meta = CodeMeta;

    fn content_type(&self) -> ContentType {
        ContentType::Code
    }

    fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        self.detector.score(ContentType::Code, path, content).confidence
    }

    fn preprocess(&self, raw: &str, path: &Path) -> Prepared<CodeMeta> {
        let text = normalize_newlines(raw);
        let language = detect_language(path, &text);
        let (shebang, body) = if text.starts_with("#!") {
            let end = text.find('\n').map_or(text.len(), |i| i + 1);
            (Some(text[..end].trim_end().to_string()), &text[end..])
        } else {
            (None, text.as_str())
        };
        Prepared::new(trim_leading_blank_lines(body), CodeMeta { language, shebang })
    }

    fn optimize(&self, mut text: String, _meta: &mut CodeMeta, pass: &mut RulePass<'_>) -> String {
        for rule in active_rules(&self.rules, ContentType::Code, &self.disabled) {
            text = pass.apply(rule, text);
        }
        text
    }

    fn postprocess(&self, text: String, meta: &CodeMeta) -> String {
        let body = ensure_trailing_newline(trim_leading_blank_lines(&text));
        match &meta.shebang {
            Some(shebang) => format!("{shebang}\n{body}"),
            None => body,
        }
    }
}
