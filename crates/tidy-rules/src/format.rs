//! Formatting cleanup: invisible characters, whitespace, duplicate headings.

use crate::{Rule, RuleCategory};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};
use ContentType::*;

pub const ZERO_WIDTH: &str = "zero_width";
pub const TRAILING_WHITESPACE: &str = "trailing_whitespace";
pub const EXCESS_BLANK_LINES: &str = "excess_blank_lines";
pub const DUPLICATE_HEADINGS: &str = "duplicate_headings";

static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}[ \t]+\S").unwrap());

pub(crate) fn rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::builder(ZERO_WIDTH, RuleCategory::FormattingWhitespace, "[\u{200B}\u{200C}\u{200D}\u{FEFF}]")
            .applies_to(&[Code, Docs, Notion, Email, Markdown])
            .build()?,
        Rule::builder(TRAILING_WHITESPACE, RuleCategory::FormattingWhitespace, r"[ \t]+$")
            .multiline()
            .applies_to(&[Docs, Notion, Email])
            .build()?,
        Rule::builder(EXCESS_BLANK_LINES, RuleCategory::FormattingWhitespace, r"\n(?:[ \t]*\n){2,}")
            .replace("\n\n")
            .applies_to(&[Docs, Notion, Email, Markdown])
            .build()?,
        Rule::builder(
            DUPLICATE_HEADINGS,
            RuleCategory::FormattingWhitespace,
            r"^#{1,6}[ \t]+[^\n]+\n(?:[ \t]*\n)*#{1,6}[ \t]+[^\n]+(?:\n(?:[ \t]*\n)*#{1,6}[ \t]+[^\n]+){0,20}",
        )
        .multiline()
        .replace_with(dedupe_heading_run)
        .applies_to(&[Docs, Notion, Markdown])
        .build()?,
    ])
}

/// Drop headings identical to the heading right before them in a run.
fn dedupe_heading_run(caps: &Captures<'_>) -> String {
    let run = &caps[0];
    let mut out: Vec<&str> = Vec::new();
    let mut last_heading: Option<&str> = None;
    let mut dropped = false;
    for line in run.split('\n') {
        if RE_HEADING.is_match(line) {
            let key = line.trim();
            if last_heading == Some(key) {
                dropped = true;
                while out.last().is_some_and(|l| l.trim().is_empty()) {
                    out.pop();
                }
                continue;
            }
            last_heading = Some(key);
        }
        out.push(line);
    }
    if !dropped {
        return run.to_string();
    }
    out.join("\n")
}

/// `\r\n` and lone `\r` become `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Collapse runs of blank lines to a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// Trim trailing whitespace and end with exactly one newline.
/// Empty or all-whitespace text becomes the empty string.
pub fn ensure_trailing_newline(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push_str(trimmed);
    out.push('\n');
    out
}

/// Strip leading blank lines.
pub fn trim_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some(idx) = rest.find('\n') {
        if rest[..idx].trim().is_empty() {
            rest = &rest[idx + 1..];
        } else {
            break;
        }
    }
    rest
}
