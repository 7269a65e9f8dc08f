//! Notion exports: ID suffixes, property blocks, export artifacts.

use crate::shared::{active_rules, apply_rules, join_frontmatter, split_frontmatter, tidy_output, Frontmatter};
use crate::traits::{ContentOptimizer, Prepared};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tidy_core::{ContentType, IdReference, NotionConfig};
use tidy_detect::Detector;
use tidy_rules::format::{normalize_newlines, trim_leading_blank_lines};
use tidy_rules::notion::{callout_ranges, extract_notion_id, strip_id_suffixes, CALLOUT, TOGGLE};
use tidy_rules::segments::code_and_tables;
use tidy_rules::{RulePass, RuleSet, Shields};

/// Trigger id for the ID-suffixed title rewrite.
pub const TITLE: &str = "notion_title";
/// Trigger id for the properties-to-frontmatter conversion.
pub const PROPERTIES: &str = "notion_properties";

static RE_ID_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A<!--[ \t]*Notion ID:[ \t]*[a-f0-9]{32}[ \t]*-->[ \t]*\n*").unwrap());
static RE_ID_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A#[ \t]+(.+?)[ \t]+[a-f0-9]{32}[ \t]*(?:\n|\z)").unwrap());
static RE_PROPERTIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:Property|Properties):[ \t]*\n((?:[^\n]+: [^\n]+(?:\n|\z))+)").unwrap());

/// Notion property name → frontmatter key.
const PROPERTY_KEYS: &[(&str, &str)] = &[
    ("Title", "title"),
    ("Name", "title"),
    ("Tags", "tags"),
    ("Category", "category"),
    ("Categories", "categories"),
    ("Author", "author"),
    ("Authors", "authors"),
    ("Date", "date"),
    ("Published", "date"),
    ("Status", "status"),
    ("Description", "description"),
    ("Summary", "summary"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotionMeta {
    pub frontmatter: Option<Frontmatter>,
    pub reference: Option<IdReference>,
    /// Title with the ID suffix removed, taken from the file name.
    pub title: Option<String>,
    /// YAML lines converted from a `Properties:` block.
    pub properties: Vec<String>,
}

pub struct NotionOptimizer {
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    config: NotionConfig,
    disabled: Vec<&'static str>,
}

impl NotionOptimizer {
    pub fn new(config: NotionConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let mut disabled = Vec::new();
        if config.preserve_callouts {
            disabled.push(CALLOUT);
        }
        if config.preserve_toggles {
            disabled.push(TOGGLE);
        }
        Self { rules, detector, config, disabled }
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }
}

/// Frontmatter key for a Notion property name.
fn property_key(name: &str) -> String {
    match PROPERTY_KEYS.iter().find(|(from, _)| *from == name) {
        Some((_, to)) => to.to_string(),
        None => name.to_lowercase().replace(' ', "_"),
    }
}

/// `Name: value` lines to YAML; `[a, b]` values become lists.
fn properties_to_yaml(block: &str, existing: Option<&Frontmatter>) -> Vec<String> {
    let mut out = Vec::new();
    for line in block.lines() {
        let Some((name, value)) = line.split_once(": ") else {
            continue;
        };
        let key = property_key(name.trim());
        if existing.is_some_and(|fm| fm.get(&key).is_some()) || out.iter().any(|l: &String| l.starts_with(&format!("{key}:"))) {
            continue;
        }
        let value = value.trim();
        match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            Some(list) => {
                out.push(format!("{key}:"));
                out.extend(list.split(',').map(str::trim).filter(|v| !v.is_empty()).map(|v| format!("  - {v}")));
            }
            None => out.push(format!("{key}: {value}")),
        }
    }
    out
}

impl ContentOptimizer for NotionOptimizer {
    type Meta = NotionMeta;

    fn content_type(&self) -> ContentType {
        ContentType::Notion
    }

    fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        self.detector.score(ContentType::Notion, path, content).confidence
    }

    fn preprocess(&self, raw: &str, path: &Path) -> Prepared<NotionMeta> {
        let text = normalize_newlines(raw);
        let (frontmatter, body) = split_frontmatter(&text);
        let body = RE_ID_COMMENT.replace(trim_leading_blank_lines(body), "");

        let mut meta = NotionMeta { frontmatter, ..NotionMeta::default() };
        let file_name = path.file_name().and_then(|n| n.to_str());
        if let Some((title, id)) = file_name.and_then(extract_notion_id) {
            let original = path.display().to_string();
            meta.reference = Some(IdReference { clean: strip_id_suffixes(&original), original, id });
            meta.title = Some(title);
        }
        Prepared::new(trim_leading_blank_lines(&body), meta)
    }

    fn optimize(&self, mut text: String, meta: &mut NotionMeta, pass: &mut RulePass<'_>) -> String {
        if self.config.convert_properties {
            let found = RE_PROPERTIES.captures(&text).map(|caps| {
                let range = caps.get(0).map_or(0..0, |m| m.range());
                (range, properties_to_yaml(&caps[1], meta.frontmatter.as_ref()))
            });
            if let Some((range, lines)) = found {
                text.replace_range(range, "");
                meta.properties = lines;
                pass.record(PROPERTIES, 1);
            }
        }

        let heading = RE_ID_TITLE.captures(&text).map(|caps| {
            let title = meta.title.clone().unwrap_or_else(|| caps[1].trim().to_string());
            (title, caps.get(0).map_or(0, |m| m.end()))
        });
        if let Some((title, end)) = heading {
            text = format!("# {title}\n{}", &text[end..]);
            pass.record(TITLE, 1);
        }

        let preserve_callouts = self.config.preserve_callouts;
        let rules = active_rules(&self.rules, ContentType::Notion, &self.disabled);
        apply_rules(pass, rules, text, move |t: &str| -> Shields {
            let shields = code_and_tables(t);
            if preserve_callouts {
                shields.with(callout_ranges(t))
            } else {
                shields
            }
        })
    }

    fn postprocess(&self, text: String, meta: &NotionMeta) -> String {
        let frontmatter = match &meta.frontmatter {
            Some(fm) => Some(fm.with_lines(&meta.properties)),
            None if meta.properties.is_empty() => None,
            None => Some(Frontmatter::from_lines(&meta.properties)),
        };
        let mut body = String::with_capacity(text.len() + 64);
        if self.config.include_id_comments {
            if let Some(reference) = &meta.reference {
                body.push_str(&format!("<!-- Notion ID: {} -->\n\n", reference.id));
            }
        }
        body.push_str(&text);
        tidy_output(&join_frontmatter(frontmatter.as_ref(), &body))
    }

    fn id_reference(&self, meta: &NotionMeta) -> Option<IdReference> {
        meta.reference.clone()
    }
}
