//! Source-code boilerplate: license headers, log statements, TODO notes,
//! long import groups.

use crate::{Rule, RuleCategory};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tidy_core::{ContentType, Result};

pub const LICENSE_BLOCK_COMMENT: &str = "license_block_comment";
pub const LICENSE_HASH_COMMENTS: &str = "license_hash_comments";
pub const LICENSE_SLASH_COMMENTS: &str = "license_slash_comments";
pub const LICENSE_DOCSTRING: &str = "license_docstring";
pub const LOG_STATEMENT: &str = "log_statement";
pub const TODO_COMMENT: &str = "todo_comment";
pub const PYTHON_IMPORT_GROUP: &str = "python_import_group";
pub const JS_IMPORT_GROUP: &str = "js_import_group";

static RE_LICENSE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)copyright|\(c\)[ \t]*\d{4}|©|all rights reserved|spdx-license-identifier|licensed under|permission is hereby granted",
    )
    .unwrap()
});
// weaker words only count as the block's opening text
static RE_LICENSE_OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\A[\s/*#"'!-]*(?:licen[cs]e[ \t]*:|author(?:s|\(s\))?[ \t]*:|created by\b)"#).unwrap()
});

/// Whether a comment block reads like a license/authorship header.
///
/// Strong markers count anywhere in the block; `License:`, `Author:` and
/// `Created by` only where the block's text starts.
pub fn has_license_signature(text: &str) -> bool {
    RE_LICENSE_MARKER.is_match(text) || RE_LICENSE_OPENING.is_match(text)
}

fn drop_if_license(caps: &Captures<'_>) -> String {
    let block = &caps[0];
    if has_license_signature(block) {
        String::new()
    } else {
        block.to_string()
    }
}

/// Remove a log line only when its parentheses balance on that line.
fn drop_balanced_line(caps: &Captures<'_>) -> String {
    let line = &caps[0];
    let open = line.matches('(').count();
    let close = line.matches(')').count();
    if open == close {
        String::new()
    } else {
        line.to_string()
    }
}

fn collapse_imports(caps: &Captures<'_>, comment: &str) -> String {
    let group = &caps[0];
    let lines: Vec<&str> = group.trim_end_matches('\n').split('\n').collect();
    if lines.len() <= 2 {
        return group.to_string();
    }
    format!(
        "{}\n{} ... {} more imports ...\n{}\n",
        lines[0],
        comment,
        lines.len() - 2,
        lines[lines.len() - 1]
    )
}

pub(crate) fn rules() -> Result<Vec<Rule>> {
    let code = [ContentType::Code];
    Ok(vec![
        // leading headers; the caller lifts any shebang first.
        // `#include`, `#define`, `#[attr]` and friends are not comments.
        Rule::builder(LICENSE_BLOCK_COMMENT, RuleCategory::CodeBoilerplate, r"\A[ \t]*/\*.*?\*/[ \t]*(?:\n|\z)")
            .dotall()
            .replace_with(drop_if_license)
            .applies_to(&code)
            .build()?,
        Rule::builder(LICENSE_HASH_COMMENTS, RuleCategory::CodeBoilerplate, r"\A(?:[ \t]*#(?:[^\w!\[\n][^\n]*)?(?:\n|\z)){1,60}")
            .replace_with(drop_if_license)
            .applies_to(&code)
            .build()?,
        Rule::builder(LICENSE_SLASH_COMMENTS, RuleCategory::CodeBoilerplate, r"\A(?:[ \t]*//[^\n]*(?:\n|\z)){1,60}")
            .replace_with(drop_if_license)
            .applies_to(&code)
            .build()?,
        Rule::builder(LICENSE_DOCSTRING, RuleCategory::CodeBoilerplate, r#"\A[ \t]*(?:""".*?"""|'''.*?''')[ \t]*(?:\n|\z)"#)
            .dotall()
            .replace_with(drop_if_license)
            .applies_to(&code)
            .build()?,
        Rule::builder(
            LOG_STATEMENT,
            RuleCategory::CodeBoilerplate,
            r"^[ \t]*(?:(?:console\.(?:log|debug|info|warn|error)|System\.out\.println|f?printf|println!?|print|(?:log|logger|logging)\.(?:debug|info|warning|warn|error))[ \t]*\(|(?:std::)?cout[ \t]*<<)[^\n]*(?:\n|\z)",
        )
        .multiline()
        .replace_with(drop_balanced_line)
        .applies_to(&code)
        .build()?,
        Rule::builder(TODO_COMMENT, RuleCategory::CodeBoilerplate, r"^[ \t]*(?://|#)[ \t]*(?:TODO|FIXME|XXX|HACK)\b[^\n]*(?:\n|\z)")
            .multiline()
            .applies_to(&code)
            .build()?,
        Rule::builder(PYTHON_IMPORT_GROUP, RuleCategory::CodeBoilerplate, r"^(?:(?:import|from)[ \t][^\n;]*\n){3,}")
            .multiline()
            .replace_with(|caps| collapse_imports(caps, "#"))
            .applies_to(&code)
            .build()?,
        Rule::builder(
            JS_IMPORT_GROUP,
            RuleCategory::CodeBoilerplate,
            r"^(?:(?:import[ \t][^\n]*;|(?:const|let|var)[ \t]+\w+[ \t]*=[ \t]*require\([^)\n]*\);?)[ \t]*\n){3,}",
        )
        .multiline()
        .replace_with(|caps| collapse_imports(caps, "//"))
        .applies_to(&code)
        .build()?,
    ])
}
