//! Markdown/HTML markup cleanup.

use crate::{Rule, RuleCategory};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};

pub const HTML_COMMENT: &str = "html_comment";
pub const HTML_SCRIPT_STYLE: &str = "html_script_style";
pub const BADGE: &str = "badge";
pub const IMAGE: &str = "image";
pub const HTML_IMG_TO_MARKDOWN: &str = "html_img_to_markdown";
pub const HTML_BREAK: &str = "html_break";
pub const HTML_TAG: &str = "html_tag";
pub const HTML_ENTITY: &str = "html_entity";
pub const REDUNDANT_LINK: &str = "redundant_link";
pub const RELATIVE_LINK: &str = "relative_link";

const HTML_TAG_NAMES: &str = "a|abbr|article|aside|b|big|blockquote|body|button|center|cite|code|dd|del|details|dfn|div|dl|dt|em|figcaption|figure|font|h[1-6]|head|header|footer|hr|html|i|iframe|input|ins|kbd|label|li|main|mark|meta|link|noscript|ol|option|p|picture|pre|q|s|samp|section|select|small|source|span|strike|strong|sub|summary|sup|svg|path|table|tbody|td|textarea|tfoot|th|thead|title|tr|tt|u|ul|var|video|audio";

static RE_ATTR_SRC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*["']?([^"'\s>]+)"#).unwrap());
static RE_ATTR_ALT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\balt\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static RE_SCRIPT_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<head\b[^>]*>.*?</head>").unwrap());
static RE_BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</?(?:p|div|tr|li|h[1-6]|table|section|article)\b[^>]*>").unwrap());
static RE_ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]+>").unwrap());
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static RE_BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

fn img_to_markdown(caps: &Captures<'_>) -> String {
    let tag = &caps[0];
    let Some(src) = RE_ATTR_SRC.captures(tag).map(|c| c[1].to_string()) else {
        return String::new();
    };
    let alt = RE_ATTR_ALT
        .captures(tag)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map_or("", |m| m.as_str());
    format!("![{alt}]({src})")
}

fn decode_entity(caps: &Captures<'_>) -> String {
    match &caps[1] {
        "nbsp" | "#160" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" | "#39" => "'",
        "mdash" => "—",
        "ndash" => "–",
        "hellip" => "…",
        _ => return caps[0].to_string(),
    }
    .to_string()
}

fn unlink_redundant(caps: &Captures<'_>) -> String {
    if !caps[1].is_empty() || caps[2].trim() != caps[3].trim() {
        return caps[0].to_string();
    }
    caps[3].to_string()
}

fn unlink_relative(caps: &Captures<'_>) -> String {
    let url = &caps[3];
    let absolute = ["http://", "https://", "mailto:", "ftp://", "#"].iter().any(|p| url.starts_with(p));
    if !caps[1].is_empty() || absolute {
        return caps[0].to_string();
    }
    caps[2].to_string()
}

pub(crate) fn rules() -> Result<Vec<Rule>> {
    let md = [ContentType::Markdown];
    let link = r"(!?)\[([^\]\n]+)\]\(([^)\s]+)\)";
    Ok(vec![
        Rule::builder(HTML_COMMENT, RuleCategory::MarkdownMarkup, r"<!--.*?-->")
            .dotall()
            .applies_to(&md)
            .build()?,
        Rule::builder(HTML_SCRIPT_STYLE, RuleCategory::MarkdownMarkup, r"<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>")
            .dotall()
            .ignore_case()
            .applies_to(&md)
            .build()?,
        // linked badges first so the wrapping link goes too
        Rule::builder(
            BADGE,
            RuleCategory::MarkdownMarkup,
            r"\[!\[[^\]\n]*\]\([^)\n]*(?:badge|shields\.io)[^)\n]*\)\]\([^)\n]*\)|!\[[^\]\n]*\]\([^)\n]*(?:badge|shields\.io)[^)\n]*\)|<img\b[^>]*(?:badge|shields\.io)[^>]*>",
        )
        .ignore_case()
        .applies_to(&md)
        .build()?,
        Rule::builder(IMAGE, RuleCategory::MarkdownMarkup, r"!\[[^\]\n]*\]\([^)\n]*\)|<img\b[^>]*>")
            .ignore_case()
            .applies_to(&md)
            .build()?,
        Rule::builder(HTML_IMG_TO_MARKDOWN, RuleCategory::MarkdownMarkup, r"<img\b[^>]*>")
            .ignore_case()
            .replace_with(img_to_markdown)
            .applies_to(&md)
            .build()?,
        Rule::builder(HTML_BREAK, RuleCategory::MarkdownMarkup, r"<br\s*/?>")
            .ignore_case()
            .replace("\n")
            .applies_to(&md)
            .build()?,
        Rule::builder(HTML_TAG, RuleCategory::MarkdownMarkup, format!(r"</?(?:{HTML_TAG_NAMES})\b[^<>]*>"))
            .ignore_case()
            .applies_to(&md)
            .build()?,
        Rule::builder(HTML_ENTITY, RuleCategory::MarkdownMarkup, r"&(#?[a-zA-Z0-9]{2,8});")
            .replace_with(decode_entity)
            .applies_to(&md)
            .build()?,
        Rule::builder(REDUNDANT_LINK, RuleCategory::MarkdownMarkup, link)
            .replace_with(unlink_redundant)
            .applies_to(&md)
            .build()?,
        Rule::builder(RELATIVE_LINK, RuleCategory::MarkdownMarkup, link)
            .replace_with(unlink_relative)
            .applies_to(&md)
            .build()?,
    ])
}

/// Reduce an HTML document to plain text: drop scripts, styles and tags,
/// turn block boundaries into line breaks, squeeze whitespace.
pub fn html_to_text(html: &str) -> String {
    let text = RE_SCRIPT_STYLE.replace_all(html, "");
    let text = RE_BLOCK_BREAK.replace_all(&text, "\n");
    let text = RE_ANY_TAG.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    let text = RE_SPACES.replace_all(&text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    RE_BLANKS.replace_all(lines.join("\n").trim(), "\n\n").into_owned()
}
