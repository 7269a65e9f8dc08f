//! Helpers shared by the optimizers: frontmatter lifting, rule loops, output tidying.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tidy_rules::format::{collapse_blank_lines, ensure_trailing_newline};
use tidy_rules::segments::{fenced_code_ranges, lines_with_offsets};
use tidy_core::ContentType;
use tidy_rules::{Rule, RulePass, RuleSet, Shields};

static RE_FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\A---[ \t]*\n(?:.*?\n)?---[ \t]*(?:\n|\z)").unwrap());
static RE_HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}[ \t]+\S").unwrap());

/// YAML-style frontmatter block, kept verbatim alongside its parsed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Block including both `---` fences, newline-terminated.
    pub raw: String,
    pub fields: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Build a block from already formatted YAML lines.
    pub fn from_lines(lines: &[String]) -> Self {
        let mut raw = String::from("---\n");
        for line in lines {
            raw.push_str(line);
            raw.push('\n');
        }
        raw.push_str("---\n");
        Self { fields: parse_fields(&raw), raw }
    }

    /// Insert extra YAML lines before the closing fence.
    pub fn with_lines(&self, lines: &[String]) -> Self {
        if lines.is_empty() {
            return self.clone();
        }
        let body = self.raw.trim_end().trim_end_matches('-').trim_end();
        let mut raw = String::from(body);
        raw.push('\n');
        for line in lines {
            raw.push_str(line);
            raw.push('\n');
        }
        raw.push_str("---\n");
        Self { fields: parse_fields(&raw), raw }
    }
}

fn parse_fields(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter(|l| !l.starts_with([' ', '\t', '-']))
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Split a leading frontmatter block from the body.
pub fn split_frontmatter(text: &str) -> (Option<Frontmatter>, &str) {
    match RE_FRONTMATTER.find(text) {
        Some(m) => {
            let mut raw = m.as_str().to_string();
            if !raw.ends_with('\n') {
                raw.push('\n');
            }
            let fields = parse_fields(&raw);
            (Some(Frontmatter { raw, fields }), &text[m.end()..])
        }
        None => (None, text),
    }
}

/// Frontmatter (if any), a blank line, then the body.
pub fn join_frontmatter(frontmatter: Option<&Frontmatter>, body: &str) -> String {
    match frontmatter {
        Some(fm) if body.trim().is_empty() => fm.raw.clone(),
        Some(fm) => format!("{}\n{}", fm.raw, body.trim_start_matches('\n')),
        None => body.to_string(),
    }
}

/// Rules for `content_type` in catalogue order, minus the ones switched off.
pub fn active_rules<'a>(
    rules: &'a RuleSet,
    content_type: ContentType,
    disabled: &'a [&'static str],
) -> impl Iterator<Item = &'a Arc<Rule>> + 'a {
    rules.for_type(content_type).filter(move |r| !disabled.iter().any(|id| *id == r.id()))
}

/// Apply `rules` in order, each outside the regions `shields` finds in the
/// text as it stands before that rule.
pub fn apply_rules<'r, F>(
    pass: &mut RulePass<'_>,
    rules: impl IntoIterator<Item = &'r Arc<Rule>>,
    mut text: String,
    shields: F,
) -> String
where
    F: Fn(&str) -> Shields,
{
    for rule in rules {
        text = pass.apply_shielded(rule, text, &shields);
    }
    text
}

/// Make sure every heading outside fenced code is followed by a blank line.
pub fn blank_line_after_headings(text: &str) -> String {
    let fences = fenced_code_ranges(text);
    let lines: Vec<(usize, &str)> = lines_with_offsets(text).collect();
    let mut out = String::with_capacity(text.len() + 16);
    for (i, (start, line)) in lines.iter().enumerate() {
        out.push_str(line);
        let in_fence = fences.iter().any(|r| r.contains(start));
        if in_fence || !RE_HEADING_LINE.is_match(line) {
            continue;
        }
        if let Some((_, next)) = lines.get(i + 1) {
            if !next.trim().is_empty() {
                if !line.ends_with('\n') {
                    out.push('\n');
                }
                out.push('\n');
            }
        }
    }
    out
}

/// Collapse blank-line runs, trim, end with exactly one newline.
pub fn tidy_output(text: &str) -> String {
    ensure_trailing_newline(collapse_blank_lines(text).trim_start_matches('\n'))
}
