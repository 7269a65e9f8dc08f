//! End-to-end runs of the tidy engine over files on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tidy_core::{ContentType, TidyConfig, WarningKind};
use tidy_engine::{FileOutcome, UnifiedOptimizer};
use tidy_rules::{Rule, RuleCategory, RuleSet};

const NOTION_ID: &str = "0123456789abcdef0123456789abcdef";

const GUIDE: &str = "Installation\n============\n\nHome | About | Contact\n\n\
This guide explains how to install the tool on a Linux machine.\n\
Download the archive and unpack it into a directory of your choice.\n\
Then add the binary directory to your shell path and restart the terminal.\n";

const THREAD: &str = "From: a@x.com\nTo: b@y.com\nSubject: Re: Re: plan\nDate: Mon, 1 Jan 2024\nMessage-ID: <1@x>\n\n\
Sounds good.\n\nOn Mon, Bob wrote:\n> Level one\n> > Level two\n> > > Level three\n";

const SOURCE: &str = "# Copyright 2020 Foo Corp\n# All rights reserved\nimport os\ndef f(): pass\n";

fn engine() -> UnifiedOptimizer {
    UnifiedOptimizer::new(TidyConfig::default()).unwrap()
}

fn write(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn optimized_text(outcome: &FileOutcome) -> &str {
    outcome.text().unwrap_or_else(|| panic!("{} was skipped: {:?}", outcome.path(), outcome.warnings()))
}

// ========== Scenarios ==========

#[test]
fn test_docs_navigation_line_removed() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "guide.txt", GUIDE);
    let outcome = engine().optimize_file(&path, ContentType::Auto);
    let text = optimized_text(&outcome);
    assert_eq!(outcome.stats().unwrap().content_type, ContentType::Docs);
    assert!(!text.contains("Home | About | Contact"));
    assert!(text.contains("This guide explains how to install the tool"));
}

#[test]
fn test_email_quotes_truncated_to_depth_one() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "thread.eml", THREAD);
    let outcome = engine().optimize_file(&path, ContentType::Auto);
    let text = optimized_text(&outcome);
    assert_eq!(outcome.stats().unwrap().content_type, ContentType::Email);
    assert!(text.contains("> Level one"));
    assert!(!text.contains("Level two"));
    assert!(!text.contains("Message-ID"));
}

#[test]
fn test_code_license_header_removed() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.py", SOURCE);
    let outcome = engine().optimize_file(&path, ContentType::Auto);
    assert_eq!(optimized_text(&outcome), "import os\ndef f(): pass\n");
    assert!(matches!(outcome, FileOutcome::Optimized { .. }));
}

#[test]
fn test_notion_filename_wins_over_email_headers() {
    let path = format!("Meeting Notes {NOTION_ID}.md");
    let content = format!("{THREAD}\nMore notes.\n");
    let outcome = engine().optimize_content(Path::new(&path), &content, ContentType::Auto);
    let stats = outcome.stats().unwrap();
    assert_eq!(stats.content_type, ContentType::Notion);
    let reference = stats.notion_reference.as_ref().unwrap();
    assert_eq!(reference.id, NOTION_ID);
    assert_eq!(reference.clean, "Meeting Notes.md");
}

#[test]
fn test_second_run_is_stable() {
    let engine = engine();
    let cases = [
        ("guide.txt", GUIDE.to_string()),
        ("thread.eml", THREAD.to_string()),
        ("app.py", SOURCE.to_string()),
        ("notes.md", "---\ntitle: x\n---\n# Heading\n\n<!-- draft -->\nSee [a](https://a.com).\n".to_string()),
    ];
    for (path, content) in cases {
        let first = engine.optimize_content(Path::new(path), &content, ContentType::Auto);
        let first = optimized_text(&first).to_string();
        let second = engine.optimize_content(Path::new(path), &first, ContentType::Auto);
        let diff = first.chars().count().abs_diff(optimized_text(&second).chars().count());
        assert!(diff <= 2, "{path}: second pass changed {diff} chars");
    }
}

// ========== Batch runs ==========

#[test]
fn test_batch_survives_binary_file() {
    let dir = TempDir::new().unwrap();
    let mut files = Vec::new();
    for i in 0..10 {
        let name = if i == 4 {
            write(&dir, "image.png", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0");
            "image.png".to_string()
        } else {
            let name = format!("note{i}.txt");
            write(&dir, &name, format!("Note {i}\n\nHome | About | Contact\n\nSome plain text for note {i}.\n"));
            name
        };
        files.push(name);
    }

    let stats = engine().optimize_directory(dir.path(), &files, ContentType::Auto);
    assert_eq!(stats.files_processed, 9);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.skipped.len(), 1);
    assert!(stats.skipped[0].ends_with("image.png"));
    let warning = stats.warnings.iter().find(|w| w.path.ends_with("image.png")).unwrap();
    assert_eq!(warning.kind, WarningKind::EncodingError);
    assert!(stats.optimized_chars < stats.original_chars);
}

#[test]
fn test_missing_file_is_skipped_with_read_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "present.txt", "Hello there.\n");
    let stats = engine().optimize_directory(dir.path(), &["present.txt", "absent.txt"], ContentType::Docs);
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_skipped, 1);
    let warning = stats.warnings.iter().find(|w| w.path.ends_with("absent.txt")).unwrap();
    assert_eq!(warning.kind, WarningKind::ReadError);
}

#[test]
fn test_empty_file_list() {
    let dir = TempDir::new().unwrap();
    let files: [&str; 0] = [];
    let stats = engine().optimize_directory(dir.path(), &files, ContentType::Auto);
    assert_eq!(stats.files_seen(), 0);
    assert_eq!(stats.original_chars, 0);
    assert_eq!(stats.char_reduction_pct(), 0.0);
    assert_eq!(stats.token_reduction_pct(), 0.0);
}

#[test]
fn test_absolute_paths_are_kept() {
    let dir = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let path = write(&other, "app.py", SOURCE);
    let stats = engine().optimize_directory(dir.path(), &[path], ContentType::Auto);
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_by_type.get(&ContentType::Code), Some(&1));
}

#[test]
fn test_sink_receives_optimized_files_only() {
    let dir = TempDir::new().unwrap();
    write(&dir, "app.py", SOURCE);
    write(&dir, "blob.bin", [0u8, 1, 2, 3]);
    let mut written: BTreeMap<PathBuf, String> = BTreeMap::new();
    let stats = engine().optimize_directory_with(dir.path(), &["app.py", "blob.bin"], ContentType::Auto, |path, text| {
        written.insert(path.to_path_buf(), text.to_string());
    });
    assert_eq!(stats.files_processed, 1);
    assert_eq!(written.len(), 1);
    assert_eq!(written.get(&dir.path().join("app.py")).map(String::as_str), Some("import os\ndef f(): pass\n"));
}

#[test]
fn test_run_counts_types_and_rules() {
    let dir = TempDir::new().unwrap();
    write(&dir, "guide.txt", GUIDE);
    write(&dir, "thread.eml", THREAD);
    write(&dir, "app.py", SOURCE);
    let stats = engine().optimize_directory(dir.path(), &["guide.txt", "thread.eml", "app.py"], ContentType::Auto);
    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.auto_detected, 3);
    assert_eq!(stats.files_by_type.values().sum::<usize>(), 3);
    assert!(!stats.rules_triggered.is_empty());
    assert!(stats.tokens_approximate);
    assert!(stats.token_reduction_pct() > 0.0);

    let json: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
    assert_eq!(json["files_processed"], 3);
    assert_eq!(json["files_by_type"]["email"], 1);
}

// ========== Policy filter ==========

const POLICY: &str = "# Privacy Policy\n\nWe collect personal data when you use the service.\n\
We may share it with third parties.\n\nYour rights are described below.\n";

#[test]
fn test_policy_pages_skipped() {
    let dir = TempDir::new().unwrap();
    write(&dir, "privacy-policy.md", "Anything at all.\n");
    write(&dir, "about.md", POLICY);
    write(&dir, "guide.txt", GUIDE);
    let stats = engine().optimize_directory(dir.path(), &["privacy-policy.md", "about.md", "guide.txt"], ContentType::Auto);
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.policy_pages_skipped, 2);
    assert!(stats.warnings.iter().all(|w| w.kind == WarningKind::PolicyFiltered));
}

#[test]
fn test_policy_filter_can_be_disabled() {
    let config = TidyConfig { policy_filter: false, ..TidyConfig::default() };
    let engine = UnifiedOptimizer::new(config).unwrap();
    let outcome = engine.optimize_content(Path::new("about.md"), POLICY, ContentType::Docs);
    assert!(!outcome.is_skipped());
}

// ========== Guards and counters ==========

#[test]
fn test_over_deleting_custom_rule_is_discarded() {
    let wipe = Rule::builder("wipe_everything", RuleCategory::Custom, ".*")
        .dotall()
        .applies_to(&[ContentType::Docs])
        .build()
        .unwrap();
    let rules = RuleSet::standard().unwrap().with_rule(wipe).unwrap();
    let engine = UnifiedOptimizer::with_rules(TidyConfig::default(), rules).unwrap();
    let content = "Lorem ipsum dolor sit amet. ".repeat(40);

    let outcome = engine.optimize_content(Path::new("big.txt"), &content, ContentType::Docs);
    assert!(matches!(outcome, FileOutcome::Warned { .. }));
    assert!(optimized_text(&outcome).contains("Lorem ipsum dolor sit amet."));
    let warning = outcome.warnings().iter().find(|w| w.kind == WarningKind::OverDeletion).unwrap();
    assert_eq!(warning.rule.as_deref(), Some("wipe_everything"));
}

#[test]
fn test_token_counter_plugged_in() {
    let engine = engine().with_token_counter(|s: &str| s.split_whitespace().count());
    let outcome = engine.optimize_content(Path::new("app.py"), SOURCE, ContentType::Code);
    let stats = outcome.stats().unwrap();
    assert_eq!(stats.original_tokens, 14);
    assert_eq!(stats.optimized_tokens, 5);
    assert!(!stats.tokens_approximate);
}

#[test]
fn test_config_loaded_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tidy.json", r#"{"email": {"preserve_quotes": true}, "unknown": 1}"#);
    let engine = UnifiedOptimizer::new(TidyConfig::from_path(&path).unwrap()).unwrap();
    let outcome = engine.optimize_content(Path::new("thread.eml"), THREAD, ContentType::Email);
    assert!(optimized_text(&outcome).contains("Level three"));
}

// ========== Notion references ==========

#[test]
fn test_notion_reference_table_for_run() {
    let dir = TempDir::new().unwrap();
    let b_id = "fedcba9876543210fedcba9876543210";
    write(&dir, &format!("Roadmap {b_id}.md"), format!("# Roadmap {b_id}\n\nQ1 goals.\n"));
    write(&dir, &format!("Meeting Notes {NOTION_ID}.md"), format!("# Meeting Notes {NOTION_ID}\n\nAgenda.\n"));
    let files = [format!("Roadmap {b_id}.md"), format!("Meeting Notes {NOTION_ID}.md")];
    let stats = engine().optimize_directory(dir.path(), &files, ContentType::Auto);
    assert_eq!(stats.files_by_type.get(&ContentType::Notion), Some(&2));
    let table = stats.notion_reference_table();
    let meeting = table.find(&format!("`{NOTION_ID}`")).unwrap();
    let roadmap = table.find(&format!("`{b_id}`")).unwrap();
    assert!(meeting < roadmap);
    assert!(table.starts_with("## Notion Content ID Reference\n"));
}
