//! The ordered, immutable rule catalogue.

use crate::{code, docs, email, format, markdown, notion, web, Rule, RuleCategory};
use std::sync::Arc;
use tidy_core::{ContentType, Result, TidyError};
use tracing::debug;

/// Ordered rule collection. Built once, then shared by `Arc` handles.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalogue, narrowest categories first.
    pub fn standard() -> Result<Self> {
        let groups = [
            web::tracking_rules()?,
            web::policy_rules()?,
            web::form_rules()?,
            web::chrome_rules()?,
            docs::rules()?,
            code::rules()?,
            email::rules()?,
            notion::rules()?,
            markdown::rules()?,
            format::rules()?,
        ];
        let mut set = Self::empty();
        for rule in groups.into_iter().flatten() {
            set = set.with_rule(rule)?;
        }
        debug!("standard rule set: {} rules", set.len());
        Ok(set)
    }

    /// Append a rule. Ids must be unique.
    pub fn with_rule(mut self, rule: Rule) -> Result<Self> {
        if self.get(rule.id()).is_some() {
            return Err(TidyError::InvalidConfig(format!("duplicate rule id: {}", rule.id())));
        }
        self.rules.push(Arc::new(rule));
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Rule>> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn require(&self, id: &str) -> Result<Arc<Rule>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| TidyError::InvalidConfig(format!("rule set has no rule {id}")))
    }

    /// Look up several rules, keeping the order given.
    pub fn select(&self, ids: &[&str]) -> Result<Vec<Arc<Rule>>> {
        ids.iter().map(|id| self.require(id)).collect()
    }

    pub fn for_type(&self, content_type: ContentType) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter().filter(move |r| r.applies(content_type))
    }

    pub fn in_category(&self, category: RuleCategory) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter().filter(move |r| r.category() == category)
    }

    /// Caller-added rules for `content_type`, in insertion order.
    pub fn custom_for(&self, content_type: ContentType) -> Vec<Arc<Rule>> {
        self.in_category(RuleCategory::Custom)
            .filter(|r| r.applies(content_type))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
