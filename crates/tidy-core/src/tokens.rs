//! Token counting.

/// Counts tokens in a piece of text.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Whether counts are an estimate rather than a real tokenizer.
    fn is_approximate(&self) -> bool {
        false
    }
}

/// `ceil(chars / 4)`, used when no tokenizer is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateCounter;

impl TokenCounter for ApproximateCounter {
    fn count(&self, text: &str) -> usize {
        estimate_tokens(text)
    }

    fn is_approximate(&self) -> bool {
        true
    }
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Character-count / 4 estimate, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
