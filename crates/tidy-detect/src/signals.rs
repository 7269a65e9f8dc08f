//! Per-type signal scorers. Each returns unweighted scores in `[0, 1]`.

use crate::language::Language;
use crate::types::{DetectionConfig, SignalScore};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const EXTENSION: &str = "extension";
pub const SHEBANG: &str = "shebang";
pub const IMPORTS: &str = "imports";
pub const DEFINITIONS: &str = "definitions";
pub const CODE_LINES: &str = "code_lines";
pub const DOC_FILE_NAME: &str = "doc_file_name";
pub const HEADINGS: &str = "headings";
pub const TOC: &str = "toc";
pub const LISTS: &str = "lists";
pub const PROSE_LINES: &str = "prose_lines";
pub const FRONTMATTER: &str = "frontmatter";
pub const LINKS: &str = "links";
pub const HTML_TAGS: &str = "html_tags";
pub const FENCES: &str = "fences";
pub const EMPHASIS: &str = "emphasis";
pub const NOTION_ID_FILE_NAME: &str = "notion_id_file_name";
pub const PROPERTIES: &str = "properties";
pub const TIMESTAMPS: &str = "timestamps";
pub const NOTION_URLS: &str = "notion_urls";
pub const CALLOUTS: &str = "callouts";
pub const TOGGLES: &str = "toggles";
pub const WIKI_COMMENTS: &str = "wiki_comments";
pub const HEADER_BLOCK: &str = "header_block";
pub const QUOTES: &str = "quotes";
pub const FORWARDED: &str = "forwarded";
pub const SIGNATURE: &str = "signature";
pub const MOBILE_FOOTER: &str = "mobile_footer";

macro_rules! re {
    ($name:ident, $pat:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pat).unwrap());
    };
}

re!(RE_IMPORT, r#"(?m)^[ \t]*(?:import[ \t]|from[ \t]+\S+[ \t]+import[ \t]|#include[ \t]*[<"]|using[ \t]+[\w.]+;|require[ \t(]|package[ \t]+[\w.]+|use[ \t]+[\w:]+)"#);
re!(RE_DEFINITION, r"\b(?:function|def|class|interface|struct|enum|fn|func|impl|trait|module)[ \t]+\w+");
re!(RE_CODE_LINE, r"(?:[;{}][ \t]*$|^[ \t]*(?:if|for|while|return|else|elif|switch|case|try|catch|let|const|var|pub|fn|def|class)\b)");
re!(RE_HEADING, r"(?m)^#{1,6}[ \t]+\S|^[^\n]+\n(?:={3,}|-{3,})[ \t]*$");
re!(RE_TOC, r"(?im)^[ \t]*(?:#{1,6}[ \t]+)?(?:table of contents|contents|on this page)[ \t]*:?[ \t]*$");
re!(RE_LIST_ITEM, r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]+\S");
re!(RE_LINK, r"\[[^\]\n]+\]\([^)\n]+\)");
re!(RE_HTML_TAG, r"(?i)<(?:div|p|span|a|img|br|table|ul|li|h[1-6]|section|article|nav|header|footer|script|style)\b[^>]*>");
re!(RE_FENCE, r"(?m)^[ \t]{0,3}(?:```|~~~)");
re!(RE_EMPHASIS, r"\*\*[^*\n]+\*\*|__[^_\n]+__");
re!(RE_NOTION_ID_NAME, r"(?:%20|[ _-])[a-f0-9]{32}(?:\.[^./\\]*)?$");
re!(RE_PROPERTY_LINE, r"(?m)^([A-Za-z][A-Za-z ]{1,30}):[ \t]+\S");
re!(RE_NOTION_TIMESTAMP, r"(?im)^(?:created|last edited)(?: time| by)?:[ \t]+[^\n]*\d{4}");
re!(RE_NOTION_URL, r"https://(?:www\.)?notion\.so/");
re!(RE_CALLOUT, "(?m)^>[ \t]*(?:📝|💡|⚠|ℹ|🔍|🚫|✅|❌|📌|🔥|❗)");
re!(RE_TOGGLE, r"(?i)<details>");
re!(RE_WIKI_COMMENT, r"\[\[[^\]\n]+\]\]");
re!(RE_HEADER_LINE, r"^([A-Za-z][A-Za-z-]{0,30}):[ \t]");
re!(RE_QUOTE_LINE, r"(?m)^[ \t]*>");
re!(RE_FORWARDED, r"(?im)^[ >]*(?:On\b.{0,200}\bwrote:[ \t]*$|-{3,}[ \t]*(?:Original|Forwarded)[ \t]+Message)");
re!(RE_SIGNATURE, r"(?m)^--[ \t]?$");
re!(RE_MOBILE_FOOTER, r"(?i)\bSent from my (?:iPhone|iPad|Android|Samsung|mobile|BlackBerry|Galaxy)|\bGet Outlook for (?:iOS|Android)");

/// Lines considered for line-ratio signals.
const RATIO_SAMPLE_LINES: usize = 200;
/// Header lines inspected at the top of a candidate email.
const HEADER_SCAN_LINES: usize = 40;
/// Minimum words for a line to count as prose.
const PROSE_MIN_WORDS: usize = 6;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase()
}

fn non_blank_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|l| !l.trim().is_empty()).take(RATIO_SAMPLE_LINES)
}

fn line_ratio(content: &str, pred: impl Fn(&str) -> bool) -> f64 {
    let (mut total, mut hits) = (0usize, 0usize);
    for line in non_blank_lines(content) {
        total += 1;
        if pred(line) {
            hits += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn is_prose(line: &str) -> bool {
    let t = line.trim();
    let starts_markup = t.starts_with(['#', '>', '|', '<', '-', '*', '`']);
    !starts_markup && t.split_whitespace().count() >= PROSE_MIN_WORDS && t.ends_with(['.', '!', '?', ':', ','])
}

pub fn score_code(path: &Path, content: &str) -> Vec<SignalScore> {
    vec![
        SignalScore::flag(EXTENSION, Language::from_path(path).is_some()),
        SignalScore::flag(SHEBANG, content.starts_with("#!")),
        SignalScore::saturating(IMPORTS, RE_IMPORT.find_iter(content).count(), 2),
        SignalScore::saturating(DEFINITIONS, RE_DEFINITION.find_iter(content).count(), 3),
        SignalScore::new(CODE_LINES, (line_ratio(content, |l| RE_CODE_LINE.is_match(l)) * 2.0).min(1.0)),
    ]
}

pub fn score_docs(path: &Path, content: &str, config: &DetectionConfig) -> Vec<SignalScore> {
    let ext = extension(path);
    let name = stem(path);
    vec![
        SignalScore::flag(EXTENSION, config.docs_extensions.contains(&ext)),
        SignalScore::flag(DOC_FILE_NAME, config.docs_file_names.contains(&name)),
        SignalScore::saturating(HEADINGS, RE_HEADING.find_iter(content).count(), 3),
        SignalScore::flag(TOC, RE_TOC.is_match(content)),
        SignalScore::saturating(LISTS, RE_LIST_ITEM.find_iter(content).count(), 5),
        SignalScore::new(PROSE_LINES, (line_ratio(content, is_prose) * 2.0).min(1.0)),
    ]
}

pub fn score_markdown(path: &Path, content: &str, config: &DetectionConfig) -> Vec<SignalScore> {
    let ext = extension(path);
    let has_frontmatter = content.starts_with("---\n") && content[4..].contains("\n---");
    vec![
        SignalScore::flag(EXTENSION, config.markdown_extensions.contains(&ext)),
        SignalScore::flag(FRONTMATTER, has_frontmatter),
        SignalScore::saturating(HEADINGS, RE_HEADING.find_iter(content).count(), 3),
        SignalScore::saturating(LINKS, RE_LINK.find_iter(content).count(), 3),
        SignalScore::saturating(HTML_TAGS, RE_HTML_TAG.find_iter(content).count(), 5),
        SignalScore::saturating(FENCES, RE_FENCE.find_iter(content).count(), 2),
        SignalScore::flag(EMPHASIS, RE_EMPHASIS.is_match(content)),
    ]
}

pub fn score_notion(path: &Path, content: &str, config: &DetectionConfig) -> Vec<SignalScore> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let properties = RE_PROPERTY_LINE
        .captures_iter(content)
        .filter(|c| config.notion_properties.contains(&c[1].trim().to_ascii_lowercase()))
        .count();
    vec![
        SignalScore::flag(NOTION_ID_FILE_NAME, RE_NOTION_ID_NAME.is_match(file_name)),
        SignalScore::saturating(PROPERTIES, properties, 2),
        SignalScore::flag(TIMESTAMPS, RE_NOTION_TIMESTAMP.is_match(content)),
        SignalScore::flag(NOTION_URLS, RE_NOTION_URL.is_match(content)),
        SignalScore::flag(CALLOUTS, RE_CALLOUT.is_match(content)),
        SignalScore::flag(TOGGLES, RE_TOGGLE.is_match(content)),
        SignalScore::flag(WIKI_COMMENTS, RE_WIKI_COMMENT.is_match(content)),
    ]
}

/// Distinct known header names in the leading header block.
fn header_count(content: &str, config: &DetectionConfig) -> usize {
    let mut seen: Vec<String> = Vec::new();
    for line in content.lines().take(HEADER_SCAN_LINES) {
        if line.trim().is_empty() {
            break;
        }
        let Some(caps) = RE_HEADER_LINE.captures(line) else { continue };
        let name = caps[1].to_ascii_lowercase();
        if config.email_headers.contains(&name) && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.len()
}

pub fn score_email(path: &Path, content: &str, config: &DetectionConfig) -> Vec<SignalScore> {
    let ext = extension(path);
    vec![
        SignalScore::flag(EXTENSION, config.email_extensions.contains(&ext)),
        SignalScore::saturating(HEADER_BLOCK, header_count(content, config), 3),
        SignalScore::flag(QUOTES, RE_QUOTE_LINE.find_iter(content).count() >= 2),
        SignalScore::flag(FORWARDED, RE_FORWARDED.is_match(content)),
        SignalScore::flag(SIGNATURE, RE_SIGNATURE.is_match(content)),
        SignalScore::flag(MOBILE_FOOTER, RE_MOBILE_FOOTER.is_match(content)),
    ]
}
