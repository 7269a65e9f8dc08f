use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Read error: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Encoding error: {path} is not valid UTF-8 text")]
    Encoding { path: String },
    #[error("Rule {rule} failed: {reason}")]
    RuleApplication { rule: String, reason: String },
    #[error("Rule {rule} would delete {:.1}% of its input", .ratio * 100.0)]
    OverDeletion { rule: String, ratio: f64 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid pattern for rule {rule}: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TidyError>;
