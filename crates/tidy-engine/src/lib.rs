//! Corpus tidy engine: detects what each file is and runs the matching
//! optimizer over it, folding per-file results into run statistics.
//!
//! ```no_run
//! use std::path::Path;
//! use tidy_core::{ContentType, TidyConfig};
//! use tidy_engine::UnifiedOptimizer;
//!
//! let engine = UnifiedOptimizer::new(TidyConfig::default())?;
//! let stats = engine.optimize_directory(Path::new("corpus"), &["a.md", "b.eml"], ContentType::Auto);
//! println!("{:.1}% smaller", stats.char_reduction_pct());
//! # Ok::<(), tidy_core::TidyError>(())
//! ```

pub mod outcome;
pub mod pipeline;
pub mod stats;

pub use outcome::FileOutcome;
pub use pipeline::{read_text, UnifiedOptimizer};
pub use stats::RunStats;
