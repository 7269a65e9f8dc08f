//! Email artifacts: signatures, mobile footers, quote markers, disclaimers.

use crate::{Rule, RuleCategory};
use regex::Regex;
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};

pub const SIGNATURE: &str = "email_signature";
pub const MOBILE_FOOTER: &str = "email_mobile_footer";

static RE_DISCLAIMER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\*+[ \t]*)?(?:DISCLAIMER|CONFIDENTIAL(?:ITY)?(?:[ \t]+NOTICE)?|LEGAL[ \t]+NOTICE|This (?:e-?mail|message)(?: and any attachments)? (?:is|are|may be) (?:confidential|intended))").unwrap()
});
static RE_ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^On\b.{0,200}\bwrote:[ \t]*$|^-{3,}[ \t]*(?:Original|Forwarded)[ \t]+Message[ \t]*-*[ \t]*$").unwrap()
});

pub(crate) fn rules() -> Result<Vec<Rule>> {
    let email = [ContentType::Email];
    Ok(vec![
        // "-- " delimiter plus at most ten lines
        Rule::builder(SIGNATURE, RuleCategory::EmailArtifacts, r"^--[ \t]*\n(?:[^\n]+(?:\n|\z)){0,10}")
            .multiline()
            .applies_to(&email)
            .build()?,
        Rule::builder(
            MOBILE_FOOTER,
            RuleCategory::EmailArtifacts,
            r"^[ \t]*(?:Sent from my (?:iPhone|iPad|Android|Samsung|mobile|BlackBerry|Galaxy)[^\n]*|Sent via [^\n]+|Get Outlook for (?:iOS|Android)[^\n]*)[ \t]*(?:\n|\z)",
        )
        .multiline()
        .ignore_case()
        .applies_to(&email)
        .build()?,
    ])
}

/// Number of leading `>` markers; whitespace between markers is ignored.
pub fn quote_depth(line: &str) -> usize {
    let mut depth = 0;
    for c in line.chars() {
        match c {
            '>' => depth += 1,
            c if c.is_whitespace() => {}
            _ => break,
        }
    }
    depth
}

/// Line with its quote markers removed.
pub fn strip_quote_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '>' || c.is_whitespace())
}

/// Whether a paragraph opens like a legal disclaimer.
pub fn is_disclaimer(paragraph: &str) -> bool {
    let first = paragraph.lines().map(strip_quote_markers).find(|l| !l.trim().is_empty()).unwrap_or("");
    RE_DISCLAIMER.is_match(first.trim())
}

/// "On <date>, <name> wrote:" and original/forwarded message separators.
pub fn is_attribution(line: &str) -> bool {
    RE_ATTRIBUTION.is_match(strip_quote_markers(line).trim())
}
