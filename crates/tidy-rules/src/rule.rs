//! A single pattern → replacement rule.

use crate::Shields;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tidy_core::{ContentType, Result, TidyError};

/// Rule grouping, used for reporting and for picking subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    WebsiteChrome,
    FormsCta,
    TrackingMetadata,
    PolicyBoilerplate,
    FormattingWhitespace,
    CodeBoilerplate,
    EmailArtifacts,
    NotionArtifacts,
    MarkdownMarkup,
    DocsNavigation,
    Custom,
}

/// Regex flags a rule is compiled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFlags {
    pub multiline: bool,
    pub dotall: bool,
    pub case_insensitive: bool,
}

pub type ReplaceFn = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// What a match is replaced with.
#[derive(Clone)]
pub enum Replacement {
    /// Expanded with `$1` / `${name}` capture references.
    Template(String),
    Func(ReplaceFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Immutable substitution rule. Trigger counts live in the caller's stats.
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    category: RuleCategory,
    pattern: Regex,
    replacement: Replacement,
    applies_to: Vec<ContentType>,
    flags: RuleFlags,
}

impl Rule {
    pub fn builder(id: impl Into<String>, category: RuleCategory, pattern: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            id: id.into(),
            category,
            pattern: pattern.into(),
            replacement: Replacement::Template(String::new()),
            applies_to: Vec::new(),
            flags: RuleFlags::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    pub fn applies_to(&self) -> &[ContentType] {
        &self.applies_to
    }

    pub fn applies(&self, content_type: ContentType) -> bool {
        self.applies_to.contains(&content_type)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Replace every match in one pass.
    ///
    /// Returns the new text and the number of matches whose replacement
    /// differed from the matched text. With no effective match the input is
    /// returned unchanged with a count of `0`.
    pub fn apply(&self, text: &str) -> (String, usize) {
        self.replace_matches(text, |_| false)
    }

    /// Like [`apply`](Self::apply), but matches that overlap a shielded
    /// range are left as they are. Anchors still see the whole text.
    pub fn apply_outside(&self, text: &str, shields: &Shields) -> (String, usize) {
        self.replace_matches(text, |range| shields.overlaps(range))
    }

    fn replace_matches(&self, text: &str, skip: impl Fn(Range<usize>) -> bool) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if skip(m.range()) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            let replaced_at = out.len();
            match &self.replacement {
                Replacement::Template(t) => caps.expand(t, &mut out),
                Replacement::Func(f) => out.push_str(&f(&caps)),
            }
            if &out[replaced_at..] != m.as_str() {
                count += 1;
            }
            last = m.end();
        }

        if count == 0 {
            return (text.to_string(), 0);
        }
        out.push_str(&text[last..]);
        (out, count)
    }
}

pub struct RuleBuilder {
    id: String,
    category: RuleCategory,
    pattern: String,
    replacement: Replacement,
    applies_to: Vec<ContentType>,
    flags: RuleFlags,
}

impl RuleBuilder {
    pub fn multiline(mut self) -> Self {
        self.flags.multiline = true;
        self
    }

    pub fn dotall(mut self) -> Self {
        self.flags.dotall = true;
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.flags.case_insensitive = true;
        self
    }

    pub fn applies_to(mut self, types: &[ContentType]) -> Self {
        self.applies_to = types.to_vec();
        self
    }

    pub fn replace(mut self, template: impl Into<String>) -> Self {
        self.replacement = Replacement::Template(template.into());
        self
    }

    pub fn replace_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        self.replacement = Replacement::Func(Arc::new(f));
        self
    }

    /// Compile the pattern. A bad pattern is a configuration error.
    pub fn build(self) -> Result<Rule> {
        let pattern = RegexBuilder::new(&self.pattern)
            .multi_line(self.flags.multiline)
            .dot_matches_new_line(self.flags.dotall)
            .case_insensitive(self.flags.case_insensitive)
            .build()
            .map_err(|source| TidyError::InvalidPattern { rule: self.id.clone(), source })?;
        Ok(Rule {
            id: self.id,
            category: self.category,
            pattern,
            replacement: self.replacement,
            applies_to: self.applies_to,
            flags: self.flags,
        })
    }
}
