//! Picking one content type from per-type scores.

use std::cmp::Ordering;
use tidy_core::{ContentType, DetectionResult};

/// Highest confidence wins; equal confidence goes to the higher-priority type.
pub fn compare(a: &DetectionResult, b: &DetectionResult) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.content_type.priority().cmp(&b.content_type.priority()))
}

/// Choose the best result. Below `min_confidence`, or with nothing scored,
/// `default_type` is returned with `fallback` set and the best confidence kept.
pub fn select_best(mut results: Vec<DetectionResult>, min_confidence: f64, default_type: ContentType) -> DetectionResult {
    results.sort_by(compare);
    match results.into_iter().next() {
        Some(best) if best.confidence >= min_confidence && best.confidence > 0.0 => best,
        Some(best) => fallback(default_type, best.confidence),
        None => fallback(default_type, 0.0),
    }
}

fn fallback(default_type: ContentType, confidence: f64) -> DetectionResult {
    DetectionResult { confidence, fallback: true, ..DetectionResult::new(default_type) }
}
