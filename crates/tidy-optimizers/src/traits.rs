use std::path::Path;
use tidy_core::{ContentType, IdReference};
use tidy_rules::RulePass;

/// Preprocessed text plus whatever the optimizer lifted out of it.
#[derive(Debug, Clone, Default)]
pub struct Prepared<M> {
    pub text: String,
    pub meta: M,
}

impl<M> Prepared<M> {
    pub fn new(text: impl Into<String>, meta: M) -> Self {
        Self { text: text.into(), meta }
    }
}

/// Trait for type-specific optimizers.
pub trait ContentOptimizer: Send + Sync {
    /// Data carried from preprocess to postprocess.
    type Meta: Default + Send;

    fn content_type(&self) -> ContentType;

    /// Confidence in `[0, 1]` that the file is this optimizer's type.
    fn detect_content_type(&self, path: &Path, content: &str) -> f64;

    /// Normalize input and lift out anything rules must not see.
    fn preprocess(&self, raw: &str, path: &Path) -> Prepared<Self::Meta>;

    /// Apply the type's rules and transforms.
    fn optimize(&self, text: String, meta: &mut Self::Meta, pass: &mut RulePass<'_>) -> String;

    /// Reassemble the final text.
    fn postprocess(&self, text: String, meta: &Self::Meta) -> String;

    /// Export-ID bookkeeping for the run report.
    fn id_reference(&self, _meta: &Self::Meta) -> Option<IdReference> {
        None
    }
}
