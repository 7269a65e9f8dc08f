//! Notion export artifacts and export-ID handling.

use crate::{Rule, RuleCategory};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};

pub const DIVIDER: &str = "notion_divider";
pub const TIMESTAMP: &str = "notion_timestamp";
pub const URL_LINK: &str = "notion_url_link";
pub const URL: &str = "notion_url";
pub const COMMENT_BRACKETS: &str = "notion_comment_brackets";
pub const CITATION: &str = "notion_citation";
pub const LINK_ID: &str = "notion_link_id";
pub const CALLOUT: &str = "notion_callout";
pub const TOGGLE: &str = "notion_toggle";

/// `Title 0123…cdef.md` / `Title_0123…cdef` as exported by Notion.
static RE_NOTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?:%20|[ _])([a-f0-9]{32})(\.[^/\\]*)?$").unwrap());
static RE_CALLOUT_GLYPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[ \t]*(?:📝|💡|⚠\u{FE0F}?|ℹ\u{FE0F}?|🔍|🚫|✅|❌|📌|🔥|❗)[ \t]*").unwrap());

const CALLOUT_PATTERN: &str = "(?m)^>[ \t]*(?:📝|💡|⚠\u{FE0F}?|ℹ\u{FE0F}?|🔍|🚫|✅|❌|📌|🔥|❗)[^\n]*(?:\n>[^\n]*){0,40}";

static RE_CALLOUT: LazyLock<Regex> = LazyLock::new(|| Regex::new(CALLOUT_PATTERN).unwrap());

/// Split a file name into its clean title and 32-hex Notion ID.
pub fn extract_notion_id(file_name: &str) -> Option<(String, String)> {
    let caps = RE_NOTION_ID.captures(file_name)?;
    let title = caps[1].trim().to_string();
    if title.is_empty() {
        return None;
    }
    Some((title, caps[2].to_string()))
}

/// Remove the ID suffix from every component of a path or link target,
/// keeping extensions and separators.
pub fn strip_id_suffixes(path: &str) -> String {
    path.split('/')
        .map(|part| match RE_NOTION_ID.captures(part) {
            Some(caps) => format!("{}{}", &caps[1], caps.get(3).map_or("", |m| m.as_str())),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Callout blocks (`> 💡 …` with continuation lines).
pub fn callout_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
    RE_CALLOUT.find_iter(text).map(|m| m.range()).collect()
}

fn flatten_callout(caps: &Captures<'_>) -> String {
    caps[0]
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let body = line.strip_prefix('>').unwrap_or(line).trim();
            if i == 0 {
                RE_CALLOUT_GLYPH.replace(body, "").into_owned()
            } else {
                body.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn toggle_to_section(caps: &Captures<'_>) -> String {
    let summary = caps[1].trim();
    let body = caps[2].trim();
    format!("\n### {summary}\n\n{body}\n")
}

fn clean_link_target(caps: &Captures<'_>) -> String {
    format!("]({})", strip_id_suffixes(&caps[1]))
}

pub(crate) fn rules() -> Result<Vec<Rule>> {
    let notion = [ContentType::Notion];
    Ok(vec![
        Rule::builder(DIVIDER, RuleCategory::NotionArtifacts, r"^[ \t]*-{3,}[ \t]*(?:\n|\z)")
            .multiline()
            .applies_to(&notion)
            .build()?,
        Rule::builder(
            TIMESTAMP,
            RuleCategory::NotionArtifacts,
            r"^(?:Created|Last Edited|Created time|Last edited time)(?:[ \t:]+)[^\n]*\d{4}[^\n]*(?:\n|\z)",
        )
        .multiline()
        .ignore_case()
        .applies_to(&notion)
        .build()?,
        Rule::builder(URL_LINK, RuleCategory::NotionArtifacts, r"\[([^\]\n]*)\]\(https://(?:www\.)?notion\.so/[^)\s]*\)")
            .replace("$1")
            .applies_to(&notion)
            .build()?,
        Rule::builder(URL, RuleCategory::NotionArtifacts, r"https://(?:www\.)?notion\.so/(?:[\w-]+/)*(?:[\w-]*-)?[a-f0-9]{32}(?:\?[^\s)]*)?")
            .applies_to(&notion)
            .build()?,
        Rule::builder(COMMENT_BRACKETS, RuleCategory::NotionArtifacts, r"\[\[([^\]\n]+)\]\]")
            .replace("$1")
            .applies_to(&notion)
            .build()?,
        Rule::builder(CITATION, RuleCategory::NotionArtifacts, r"\[(\d+)\]\(#cite-[a-f0-9-]+\)")
            .replace("[$1]")
            .applies_to(&notion)
            .build()?,
        Rule::builder(LINK_ID, RuleCategory::NotionArtifacts, r"\]\(([^)\s]*[a-f0-9]{32}[^)\s]*)\)")
            .replace_with(clean_link_target)
            .applies_to(&notion)
            .build()?,
        Rule::builder(CALLOUT, RuleCategory::NotionArtifacts, CALLOUT_PATTERN)
            .multiline()
            .replace_with(flatten_callout)
            .applies_to(&notion)
            .build()?,
        Rule::builder(TOGGLE, RuleCategory::NotionArtifacts, r"<details>\s*<summary>(.*?)</summary>(.*?)</details>")
            .dotall()
            .replace_with(toggle_to_section)
            .applies_to(&notion)
            .build()?,
    ])
}
