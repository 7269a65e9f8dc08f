//! Privacy policy / terms-of-service page detection.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_POLICY_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[-_ .])(?:privacy[-_ ]?policy|privacy|terms[-_ ]?(?:of[-_ ]?(?:service|use)|and[-_ ]?conditions)|tos|cookie[-_ ]?policy|gdpr|legal[-_ ]?notice|impressum)(?:$|[-_ .])").unwrap()
});
static RE_POLICY_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:privacy policy|privacy notice|terms of (?:service|use)|terms (?:and|&) conditions|cookie policy|data protection policy|legal notice)\b").unwrap()
});
static RE_POLICY_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bpersonal (?:data|information)\b",
        r"(?i)\bwe (?:collect|process|store)\b",
        r"(?i)\bthird[- ]part(?:y|ies)\b",
        r"(?i)\byour rights\b",
        r"(?i)\bgoverning law\b",
        r"(?i)\blimitation of liability\b",
        r"(?i)\bdata controller\b",
        r"(?i)\bcookies?\b",
        r"(?i)\bGDPR\b",
        r"(?i)\bretention\b",
        r"(?i)\bconsent\b",
        r"(?i)\bindemnif(?:y|ication)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Distinct policy phrases needed alongside a policy-style title.
const MIN_POLICY_PHRASES: usize = 3;
/// How far into the text the title is looked for.
const TITLE_WINDOW: usize = 400;

/// Whether a file is a privacy policy, terms page or similar legal page.
///
/// A policy-style file name is enough; otherwise the opening of the text must
/// carry a policy title and the body several distinct policy phrases.
pub fn is_policy_page(path: &Path, text: &str) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if RE_POLICY_FILENAME.is_match(stem) {
        return true;
    }
    let head_end = text.char_indices().nth(TITLE_WINDOW).map_or(text.len(), |(i, _)| i);
    if !RE_POLICY_TITLE.is_match(&text[..head_end]) {
        return false;
    }
    RE_POLICY_PHRASES.iter().filter(|re| re.is_match(text)).count() >= MIN_POLICY_PHRASES
}
