//! Documentation-site navigation: breadcrumbs, edit/version banners, TOC blocks.

use crate::{Rule, RuleCategory};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};

pub const BREADCRUMB: &str = "breadcrumb";
pub const VERSION_BANNER: &str = "version_banner";
pub const EDIT_BANNER: &str = "edit_banner";
pub const TOC_BLOCK: &str = "toc_block";

const TOC_PATTERN: &str = r"(?im)^[ \t]*(?:#{1,6}[ \t]+)?(?:Table of Contents|Contents|TOC|On this page)[ \t]*:?[ \t]*\n(?:[ \t]*\n)*(?:[ \t]*(?:[-*+]|\d+\.)[ \t]+\[[^\]\n]*\]\([^)\n]*\)[ \t]*(?:\n|\z)){1,60}";

static RE_TOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(TOC_PATTERN).unwrap());

pub(crate) fn rules() -> Result<Vec<Rule>> {
    let docs = [ContentType::Docs];
    Ok(vec![
        Rule::builder(
            BREADCRUMB,
            RuleCategory::DocsNavigation,
            r"^[ \t]*(?:Home|Index|Main|Docs|Documentation)(?:[ \t]*[>»→/][ \t]*[^\n>»→/]+){1,8}[ \t]*(?:\n|\z)",
        )
        .multiline()
        .applies_to(&docs)
        .build()?,
        Rule::builder(VERSION_BANNER, RuleCategory::DocsNavigation, r"^(?:Version|v|Release):[ \t]+\d+\.\d+(?:\.\d+)?[^\n]*(?:\n|\z)")
            .multiline()
            .ignore_case()
            .applies_to(&docs)
            .build()?,
        Rule::builder(
            EDIT_BANNER,
            RuleCategory::DocsNavigation,
            r"^[ \t]*(?:(?:Last updated|Last modified|Updated on):[ \t]+[^\n]*|Edit (?:this page|on GitHub)[^\n]*)(?:\n|\z)",
        )
        .multiline()
        .ignore_case()
        .applies_to(&docs)
        .build()?,
        Rule::builder(TOC_BLOCK, RuleCategory::DocsNavigation, TOC_PATTERN)
            .multiline()
            .ignore_case()
            .applies_to(&docs)
            .build()?,
    ])
}

/// Table-of-contents blocks: a title line followed by a list of links.
pub fn toc_ranges(text: &str) -> Vec<Range<usize>> {
    RE_TOC.find_iter(text).map(|m| m.range()).collect()
}
