//! Email messages and threads.
//!
//! Preprocess splits the header block off into metadata and reduces HTML
//! bodies to text. Optimize truncates deep quoting, deduplicates legal
//! disclaimers, then runs the signature and footer rules.

use crate::shared::{active_rules, tidy_output};
use crate::traits::{ContentOptimizer, Prepared};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tidy_core::{ContentType, EmailConfig};
use tidy_detect::Detector;
use tidy_rules::email::{is_attribution, is_disclaimer, quote_depth, strip_quote_markers, MOBILE_FOOTER, SIGNATURE};
use tidy_rules::format::normalize_newlines;
use tidy_rules::markdown::html_to_text;
use tidy_rules::{RulePass, RuleSet};

pub const HTML_BODY: &str = "email_html_body";
pub const QUOTE_TRUNCATION: &str = "email_quote_truncation";
pub const DISCLAIMER: &str = "email_disclaimer";

/// Headers kept when `preserve_headers` is off.
const KEY_HEADERS: [&str; 4] = ["from", "to", "subject", "date"];

static RE_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9-]*):[ \t]*(.*)$").unwrap());
static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());
static RE_HTML_BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\A\s*(?:<!DOCTYPE html|<html\b)|<body\b").unwrap());

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailMeta {
    /// Header fields in their original order, folded lines joined.
    pub headers: Vec<(String, String)>,
    /// Body was HTML and has been reduced to text.
    pub html: bool,
}

impl EmailMeta {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct EmailOptimizer {
    rules: Arc<RuleSet>,
    detector: Arc<Detector>,
    config: EmailConfig,
    disabled: Vec<&'static str>,
}

impl EmailOptimizer {
    pub fn new(config: EmailConfig, rules: Arc<RuleSet>, detector: Arc<Detector>) -> Self {
        let disabled = if config.preserve_signatures { vec![SIGNATURE, MOBILE_FOOTER] } else { Vec::new() };
        Self { rules, detector, config, disabled }
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }
}

/// Parse a leading RFC 822-style header block.
///
/// Returns the fields and the byte offset where the body starts, or `None`
/// when the text does not open with headers naming at least one of
/// From/To/Subject/Date.
pub fn parse_headers(text: &str) -> Option<(Vec<(String, String)>, usize)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if body.trim().is_empty() {
            offset += line.len();
            break;
        }
        if body.starts_with([' ', '\t']) {
            let (_, value) = headers.last_mut()?;
            value.push(' ');
            value.push_str(body.trim());
        } else {
            let caps = RE_HEADER_LINE.captures(body)?;
            headers.push((caps[1].to_string(), caps[2].trim().to_string()));
        }
        offset += line.len();
    }
    let known = headers.iter().any(|(k, _)| KEY_HEADERS.iter().any(|h| k.eq_ignore_ascii_case(h)));
    known.then_some((headers, offset))
}

/// Drop lines quoted deeper than `max_depth`, plus attribution lines whose
/// quoted text went with them. Returns the text and the lines removed.
pub fn truncate_quotes(text: &str, max_depth: usize) -> (String, usize) {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut keep: Vec<bool> = lines.iter().map(|l| quote_depth(l) <= max_depth).collect();
    if keep.iter().all(|k| *k) {
        return (text.to_string(), 0);
    }
    for i in 0..lines.len() {
        if !keep[i] || !is_attribution(lines[i]) {
            continue;
        }
        let next = (i + 1..lines.len()).find(|&j| !lines[j].trim().is_empty());
        if next.is_some_and(|j| !keep[j]) {
            keep[i] = false;
        }
    }
    let removed = keep.iter().filter(|k| !**k).count();
    let out: Vec<&str> = lines.iter().zip(&keep).filter(|(_, k)| **k).map(|(l, _)| *l).collect();
    (out.join("\n"), removed)
}

fn disclaimer_key(paragraph: &str) -> String {
    paragraph
        .lines()
        .map(strip_quote_markers)
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keep the first copy of each disclaimer paragraph, or none with `remove_all`.
pub fn strip_disclaimers(text: &str, remove_all: bool) -> (String, usize) {
    let mut seen = BTreeSet::new();
    let mut removed = 0;
    let mut kept = Vec::new();
    for paragraph in RE_PARAGRAPH_BREAK.split(text) {
        if is_disclaimer(paragraph) && (remove_all || !seen.insert(disclaimer_key(paragraph))) {
            removed += 1;
            continue;
        }
        kept.push(paragraph);
    }
    if removed == 0 {
        return (text.to_string(), 0);
    }
    (kept.join("\n\n"), removed)
}

impl ContentOptimizer for EmailOptimizer {
    type Meta = EmailMeta;

    fn content_type(&self) -> ContentType {
        ContentType::Email
    }

    fn detect_content_type(&self, path: &Path, content: &str) -> f64 {
        self.detector.score(ContentType::Email, path, content).confidence
    }

    fn preprocess(&self, raw: &str, _path: &Path) -> Prepared<EmailMeta> {
        let text = normalize_newlines(raw);
        let (headers, body) = match parse_headers(&text) {
            Some((headers, offset)) => (headers, &text[offset..]),
            None => (Vec::new(), text.as_str()),
        };
        let mut meta = EmailMeta { headers, html: false };
        let declared_html = meta.header("Content-Type").is_some_and(|v| v.to_ascii_lowercase().contains("text/html"));
        if declared_html || RE_HTML_BODY.is_match(body) {
            meta.html = true;
            return Prepared::new(html_to_text(body), meta);
        }
        Prepared::new(body, meta)
    }

    fn optimize(&self, mut text: String, meta: &mut EmailMeta, pass: &mut RulePass<'_>) -> String {
        if meta.html {
            pass.record(HTML_BODY, 1);
        }
        if !self.config.preserve_quotes {
            let (out, removed) = truncate_quotes(&text, self.config.max_quote_depth);
            pass.record(QUOTE_TRUNCATION, removed);
            text = out;
        }
        let (out, removed) = strip_disclaimers(&text, self.config.remove_disclaimers);
        pass.record(DISCLAIMER, removed);
        text = out;

        for rule in active_rules(&self.rules, ContentType::Email, &self.disabled) {
            text = pass.apply(rule, text);
        }
        text
    }

    fn postprocess(&self, text: String, meta: &EmailMeta) -> String {
        let mut out = String::with_capacity(text.len() + 256);
        for (name, value) in &meta.headers {
            let key = KEY_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h));
            if self.config.preserve_headers || key {
                out.push_str(&format!("{name}: {value}\n"));
            }
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(text.trim_start_matches('\n'));
        tidy_output(&out)
    }
}
