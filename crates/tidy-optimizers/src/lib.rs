//! Type-specific optimizers for the corpus tidy engine.
//!
//! Each optimizer runs preprocess → optimize → postprocess over one file's
//! text; [`Optimizer`] is the closed dispatch over all five.

pub mod code;
pub mod docs;
pub mod email;
pub mod markdown;
pub mod notion;
pub mod optimizer;
pub mod pipeline;
pub mod shared;
pub mod traits;

pub use code::{CodeMeta, CodeOptimizer};
pub use docs::{DocsMeta, DocsOptimizer};
pub use email::{EmailMeta, EmailOptimizer};
pub use markdown::{MarkdownMeta, MarkdownOptimizer};
pub use notion::{NotionMeta, NotionOptimizer};
pub use optimizer::{Optimizer, Optimizers};
pub use pipeline::process;
pub use shared::Frontmatter;
pub use traits::{ContentOptimizer, Prepared};

#[cfg(test)]
mod tests;
