//! Default detection tables and weights.

use crate::signals::*;
use crate::types::DetectionConfig;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tidy_core::ContentType;

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn w(items: &[(&str, f64)]) -> BTreeMap<String, f64> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// Filename evidence weighs most, content markers next, line ratios least.
fn weights() -> BTreeMap<ContentType, BTreeMap<String, f64>> {
    let mut m = BTreeMap::new();
    m.insert(
        ContentType::Code,
        w(&[(EXTENSION, 0.8), (SHEBANG, 0.3), (IMPORTS, 0.25), (DEFINITIONS, 0.25), (CODE_LINES, 0.2)]),
    );
    m.insert(
        ContentType::Docs,
        w(&[(EXTENSION, 0.5), (DOC_FILE_NAME, 0.3), (HEADINGS, 0.2), (TOC, 0.15), (LISTS, 0.1), (PROSE_LINES, 0.2)]),
    );
    m.insert(
        ContentType::Markdown,
        w(&[
            (EXTENSION, 0.6),
            (FRONTMATTER, 0.3),
            (HEADINGS, 0.2),
            (LINKS, 0.15),
            (HTML_TAGS, 0.3),
            (FENCES, 0.15),
            (EMPHASIS, 0.05),
        ]),
    );
    m.insert(
        ContentType::Notion,
        w(&[
            (NOTION_ID_FILE_NAME, 1.0),
            (PROPERTIES, 0.4),
            (TIMESTAMPS, 0.3),
            (NOTION_URLS, 0.4),
            (CALLOUTS, 0.2),
            (TOGGLES, 0.15),
            (WIKI_COMMENTS, 0.1),
        ]),
    );
    m.insert(
        ContentType::Email,
        w(&[
            (EXTENSION, 1.0),
            (HEADER_BLOCK, 0.6),
            (QUOTES, 0.2),
            (FORWARDED, 0.3),
            (SIGNATURE, 0.15),
            (MOBILE_FOOTER, 0.15),
        ]),
    );
    m
}

/// Default detection configuration.
pub fn default_detection_config() -> DetectionConfig {
    DetectionConfig {
        docs_extensions: s(&[".md", ".rst", ".txt", ".adoc", ".asciidoc"]),
        docs_file_names: s(&[
            "readme", "guide", "tutorial", "manual", "introduction", "getting-started", "getting_started",
            "docs", "documentation", "faq", "changelog", "install", "installation", "usage", "reference", "api",
            "overview", "quickstart",
        ]),
        markdown_extensions: s(&[".md", ".markdown", ".mdx", ".htm", ".html"]),
        email_extensions: s(&[".eml", ".msg", ".mbox"]),
        email_headers: s(&[
            "from", "to", "cc", "bcc", "subject", "date", "reply-to", "message-id", "mime-version",
            "content-type", "sent", "received",
        ]),
        notion_properties: s(&[
            "created", "created by", "last edited", "last edited by", "last edited time", "created time",
            "tags", "status", "assign", "assignee", "property", "properties", "owner",
        ]),
        weights: weights(),
    }
}

/// The default config instance.
pub static DETECTION_CONFIG: LazyLock<DetectionConfig> = LazyLock::new(default_detection_config);
