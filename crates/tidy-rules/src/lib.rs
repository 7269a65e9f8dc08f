//! Rule set for the corpus tidy engine.
//!
//! Groups:
//! 1. Tracking / metadata lines and scraper notices
//! 2. Policy boilerplate (cookie notices)
//! 3. Forms and calls to action
//! 4. Website chrome: nav menus, headers, footers, sidebars
//! 5. Docs navigation: breadcrumbs, edit/version banners, TOC
//! 6. Code boilerplate: license headers, logs, TODOs, import groups
//! 7. Email artifacts, Notion artifacts, Markdown markup
//! 8. Formatting: invisible characters, whitespace, duplicate headings

pub mod code;
pub mod docs;
pub mod email;
pub mod format;
pub mod guard;
pub mod markdown;
pub mod notion;
pub mod pass;
pub mod policy;
pub mod rule;
pub mod segments;
pub mod set;
pub mod web;

pub use guard::{apply_guarded, isolate, panic_message, DeletionGuard};
pub use pass::RulePass;
pub use policy::is_policy_page;
pub use rule::{ReplaceFn, Replacement, Rule, RuleBuilder, RuleCategory, RuleFlags};
pub use segments::Shields;
pub use set::RuleSet;
