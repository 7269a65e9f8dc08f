use crate::*;
use std::path::Path;
use std::sync::Arc;
use tidy_core::{
    ApproximateCounter, CodeConfig, ContentType, DocsConfig, EmailConfig, IdReference, MarkdownConfig, NotionConfig,
    OptimizationStats, Stage, TidyConfig, WarningKind,
};
use tidy_detect::{Detector, Language};
use tidy_rules::email::quote_depth;
use tidy_rules::{code as code_rules, DeletionGuard, RulePass, Rule, RuleCategory, RuleSet};

const NOTION_ID: &str = "0123456789abcdef0123456789abcdef";

fn rules() -> Arc<RuleSet> {
    Arc::new(RuleSet::standard().unwrap())
}

fn detector() -> Arc<Detector> {
    Arc::new(Detector::default())
}

fn run<O: ContentOptimizer>(optimizer: &O, path: &str, raw: &str) -> (String, OptimizationStats) {
    process(optimizer, Path::new(path), raw, DeletionGuard::default(), &ApproximateCounter)
}

fn code(config: CodeConfig) -> CodeOptimizer {
    CodeOptimizer::new(config, rules(), detector())
}

fn docs(config: DocsConfig) -> DocsOptimizer {
    DocsOptimizer::new(config, rules(), detector())
}

fn notion(config: NotionConfig) -> NotionOptimizer {
    NotionOptimizer::new(config, rules(), detector())
}

fn email(config: EmailConfig) -> EmailOptimizer {
    EmailOptimizer::new(config, rules(), detector())
}

fn markdown(config: MarkdownConfig) -> MarkdownOptimizer {
    MarkdownOptimizer::new(config, rules(), detector())
}

// ========== Code ==========

#[test]
fn test_code_license_header_removed_imports_kept() {
    let input = "# Copyright 2020 Foo Corp\n# All rights reserved\nimport os\ndef f(): pass\n";
    let (out, stats) = run(&code(CodeConfig::default()), "app.py", input);
    assert_eq!(out, "import os\ndef f(): pass\n");
    assert_eq!(stats.rules_triggered.get(code_rules::LICENSE_HASH_COMMENTS), Some(&1));
    assert!(stats.optimized_chars < stats.original_chars);
}

#[test]
fn test_code_shebang_survives_header_removal() {
    let input = "#!/usr/bin/env python3\n# Copyright 2020 Foo Corp\nimport sys\n";
    let (out, _) = run(&code(CodeConfig::default()), "tool.py", input);
    assert_eq!(out, "#!/usr/bin/env python3\nimport sys\n");
}

#[test]
fn test_code_plain_leading_comment_kept() {
    let input = "# Helper utilities for parsing\nimport os\n";
    let (out, stats) = run(&code(CodeConfig::default()), "util.py", input);
    assert_eq!(out, input);
    assert!(stats.rules_triggered.is_empty());
}

#[test]
fn test_code_boilerplate_toggle_off() {
    let config = CodeConfig { remove_boilerplate: false, ..CodeConfig::default() };
    let input = "/* Copyright (c) 2021 Example Inc. */\nint main() { return 0; }\n";
    let (out, _) = run(&code(config), "main.c", input);
    assert!(out.starts_with("/* Copyright"));
}

#[test]
fn test_code_block_comment_license_removed() {
    let input = "/*\n * Licensed under the MIT License.\n */\nint main() { return 0; }\n";
    let (out, _) = run(&code(CodeConfig::default()), "main.c", input);
    assert_eq!(out, "int main() { return 0; }\n");
}

#[test]
fn test_code_remove_logs() {
    let input = "def f():\n    print(\"debugging\")\n    return 1\n";
    let (kept, _) = run(&code(CodeConfig::default()), "a.py", input);
    assert_eq!(kept, input);

    let config = CodeConfig { remove_logs: true, ..CodeConfig::default() };
    let (out, stats) = run(&code(config), "a.py", input);
    assert_eq!(out, "def f():\n    return 1\n");
    assert_eq!(stats.rules_triggered.get(code_rules::LOG_STATEMENT), Some(&1));
}

#[test]
fn test_code_todos_removed_when_not_preserved() {
    let input = "x = 1\n# TODO: handle overflow\ny = 2\n";
    let (kept, _) = run(&code(CodeConfig::default()), "a.py", input);
    assert!(kept.contains("TODO"));

    let config = CodeConfig { preserve_todos: false, ..CodeConfig::default() };
    let (out, _) = run(&code(config), "a.py", input);
    assert_eq!(out, "x = 1\ny = 2\n");
}

#[test]
fn test_code_import_group_collapsed_when_not_preserved() {
    let input = "import a\nimport b\nimport c\nimport d\n\nx = 1\n";
    let (kept, _) = run(&code(CodeConfig::default()), "a.py", input);
    assert_eq!(kept, input);

    let config = CodeConfig { preserve_imports: false, ..CodeConfig::default() };
    let (out, _) = run(&code(config), "a.py", input);
    assert_eq!(out, "import a\n# ... 2 more imports ...\nimport d\n\nx = 1\n");
}

#[test]
fn test_code_preprocess_detects_language() {
    let prepared = code(CodeConfig::default()).preprocess("#!/bin/bash\r\necho hi\r\n", Path::new("run"));
    assert_eq!(prepared.meta.language, Some(Language::Shell));
    assert_eq!(prepared.meta.shebang.as_deref(), Some("#!/bin/bash"));
    assert_eq!(prepared.text, "echo hi\n");
}

#[test]
fn test_code_include_block_kept() {
    let input = "#include <stdio.h>\n#include \"license.h\"\n\nint main(void) { return check_license(); }\n";
    let (out, stats) = run(&code(CodeConfig::default()), "main.c", input);
    assert_eq!(out, input);
    assert!(stats.rules_triggered.is_empty());
}

#[test]
fn test_code_module_docstring_mentioning_license_kept() {
    let input = "\"\"\"Helpers for validating software license keys.\"\"\"\nimport os\n";
    let (out, _) = run(&code(CodeConfig::default()), "keys.py", input);
    assert_eq!(out, input);

    let input = "\"\"\"\nAuthor: Ann\n\"\"\"\nx = 1\n";
    let (out, _) = run(&code(CodeConfig::default()), "a.py", input);
    assert_eq!(out, "x = 1\n");
}

#[test]
fn test_code_no_blank_line_left_after_header() {
    let input = "// Copyright 2020 Acme\n\nint main(void) { return 0; }\n";
    let (out, stats) = run(&code(CodeConfig::default()), "main.c", input);
    assert_eq!(out, "int main(void) { return 0; }\n");
    assert_eq!(stats.rules_triggered.get(code_rules::LICENSE_SLASH_COMMENTS), Some(&1));
}

#[test]
fn test_code_trailing_spaces_in_literals_kept() {
    let input = "s = \"\"\"\nline with space  \n\"\"\"\nprint(s)\n";
    let (out, _) = run(&code(CodeConfig::default()), "a.py", input);
    assert_eq!(out, input);
}

// ========== Docs ==========

#[test]
fn test_docs_nav_line_removed() {
    let input = "# Title\n\nHome | About | Contact\n\nReal content here.\n";
    let (out, stats) = run(&docs(DocsConfig::default()), "page.md", input);
    assert!(!out.contains("Home | About"));
    assert!(out.starts_with("# Title\n"));
    assert!(out.contains("Real content here."));
    assert!(stats.optimized_chars < stats.original_chars);
}

#[test]
fn test_docs_fenced_code_shielded() {
    let input = "# Guide\n\n```\nHome | About | Contact\n```\n\nText here.\n";
    let (out, _) = run(&docs(DocsConfig::default()), "guide.md", input);
    assert!(out.contains("```\nHome | About | Contact\n```"));
}

#[test]
fn test_docs_line_with_inline_code_kept() {
    let input = "# Guide\n\nRun `make` then build | test | deploy\n\nMore prose here for the reader.\n";
    let (out, _) = run(&docs(DocsConfig::default()), "guide.md", input);
    assert!(out.contains("\nRun `make` then build | test | deploy\n"));
    assert!(out.contains("More prose here for the reader."));
}

#[test]
fn test_docs_breadcrumbs_toggle() {
    let input = "Home > Guides > Install\n\n# Install\n\nRun the installer.\n";
    let (out, _) = run(&docs(DocsConfig::default()), "install.md", input);
    assert!(!out.contains("Home > Guides"));

    let config = DocsConfig { preserve_breadcrumbs: true, ..DocsConfig::default() };
    let (kept, _) = run(&docs(config), "install.md", input);
    assert!(kept.contains("Home > Guides > Install"));
}

#[test]
fn test_docs_toc_toggle() {
    let input = "## Contents\n\n- [Intro](#intro)\n- [Usage](#usage)\n- [FAQ](#faq)\n\n## Intro\n\nHello there, reader.\n";
    let (kept, _) = run(&docs(DocsConfig::default()), "guide.md", input);
    assert!(kept.contains("- [Usage](#usage)"));

    let config = DocsConfig { preserve_toc: false, ..DocsConfig::default() };
    let (out, _) = run(&docs(config), "guide.md", input);
    assert!(!out.contains("[Usage](#usage)"));
    assert!(out.contains("Hello there, reader."));
}

#[test]
fn test_docs_blank_line_after_heading() {
    let (out, _) = run(&docs(DocsConfig::default()), "a.md", "# Title\nBody text here.\n");
    assert_eq!(out, "# Title\n\nBody text here.\n");
}

#[test]
fn test_docs_frontmatter_survives() {
    let input = "---\ntitle: Guide\n---\n# Guide\n\nBody.\n";
    let (out, _) = run(&docs(DocsConfig::default()), "guide.md", input);
    assert!(out.starts_with("---\ntitle: Guide\n---\n\n# Guide"));
}

// ========== Notion ==========

fn notion_page() -> (String, String) {
    let path = format!("Meeting Notes {NOTION_ID}.md");
    let content = format!(
        "# Meeting Notes {NOTION_ID}\n\nCreated: January 1, 2024 10:00 AM\n\n\
See [Plan](Plan%20fedcba9876543210fedcba9876543210.md).\n\n---\n\nDone.\n"
    );
    (path, content)
}

#[test]
fn test_notion_export_cleaned() {
    let (path, content) = notion_page();
    let (out, stats) = run(&notion(NotionConfig::default()), &path, &content);
    assert!(out.starts_with(&format!("<!-- Notion ID: {NOTION_ID} -->\n\n# Meeting Notes\n")));
    assert!(!out.contains("Created:"));
    assert!(out.contains("[Plan](Plan.md)"));
    assert!(!out.contains("---"));
    assert_eq!(stats.rules_triggered.get(notion::TITLE), Some(&1));
    assert_eq!(
        stats.notion_reference,
        Some(IdReference { original: path.clone(), clean: "Meeting Notes.md".into(), id: NOTION_ID.into() })
    );
}

#[test]
fn test_notion_without_id_comment() {
    let (path, content) = notion_page();
    let config = NotionConfig { include_id_comments: false, ..NotionConfig::default() };
    let (out, stats) = run(&notion(config), &path, &content);
    assert!(out.starts_with("# Meeting Notes\n"));
    assert!(stats.notion_reference.is_some());
}

#[test]
fn test_notion_properties_to_frontmatter() {
    let input = "Properties:\nTags: [alpha, beta]\nStatus: Draft\n\nBody text.\n";
    let (out, stats) = run(&notion(NotionConfig::default()), "notes.md", input);
    assert_eq!(out, "---\ntags:\n  - alpha\n  - beta\nstatus: Draft\n---\n\nBody text.\n");
    assert_eq!(stats.rules_triggered.get(notion::PROPERTIES), Some(&1));
    assert!(stats.notion_reference.is_none());
}

#[test]
fn test_notion_properties_merge_into_existing_frontmatter() {
    let input = "---\ntitle: Notes\n---\nProperties:\nName: Other\nAuthor: Ann\n\nBody.\n";
    let (out, _) = run(&notion(NotionConfig::default()), "notes.md", input);
    assert!(out.starts_with("---\ntitle: Notes\nauthor: Ann\n---\n"));
    assert!(!out.contains("Other"));
}

#[test]
fn test_notion_callouts_and_toggles() {
    let input = "> 💡 Tip here\n> more detail\n\n<details>\n<summary>More</summary>\nHidden body\n</details>\n";
    let (kept, _) = run(&notion(NotionConfig::default()), "page.md", input);
    assert!(kept.contains("> 💡 Tip here"));
    assert!(kept.contains("<details>"));

    let config = NotionConfig { preserve_callouts: false, preserve_toggles: false, ..NotionConfig::default() };
    let (out, _) = run(&notion(config), "page.md", input);
    assert!(!out.contains("💡"));
    assert!(out.contains("Tip here"));
    assert!(out.contains("### More"));
    assert!(!out.contains("<details>"));
}

// ========== Email ==========

const THREAD: &str = "From: a@x.com\nTo: b@y.com\nSubject: Re: Re: plan\nDate: Mon, 1 Jan 2024\nMessage-ID: <1@x>\n\n\
Sounds good.\n\nOn Mon, Bob wrote:\n> Level one\n> > Level two\n> > > Level three\n";

#[test]
fn test_email_quote_depth_truncated() {
    let (out, stats) = run(&email(EmailConfig::default()), "thread.eml", THREAD);
    assert!(out.contains("> Level one"));
    assert!(!out.contains("Level two"));
    assert!(!out.contains("Level three"));
    assert!(out.contains("On Mon, Bob wrote:"));
    assert!(out.lines().all(|l| quote_depth(l) <= 1));
    assert_eq!(stats.rules_triggered.get(email::QUOTE_TRUNCATION), Some(&2));
}

#[test]
fn test_email_key_headers_only() {
    let (out, _) = run(&email(EmailConfig::default()), "thread.eml", THREAD);
    assert!(out.starts_with("From: a@x.com\nTo: b@y.com\nSubject: Re: Re: plan\nDate: Mon, 1 Jan 2024\n\nSounds good."));
    assert!(!out.contains("Message-ID"));

    let config = EmailConfig { preserve_headers: true, ..EmailConfig::default() };
    let (all, _) = run(&email(config), "thread.eml", THREAD);
    assert!(all.contains("Message-ID: <1@x>\n"));
}

#[test]
fn test_email_zero_depth_drops_attribution() {
    let config = EmailConfig { max_quote_depth: 0, ..EmailConfig::default() };
    let (out, _) = run(&email(config), "thread.eml", THREAD);
    assert!(out.lines().all(|l| quote_depth(l) == 0));
    assert!(!out.contains("wrote:"));
    assert!(out.contains("Sounds good."));
}

#[test]
fn test_email_preserve_quotes() {
    let config = EmailConfig { preserve_quotes: true, ..EmailConfig::default() };
    let (out, _) = run(&email(config), "thread.eml", THREAD);
    assert!(out.contains("> > > Level three"));
}

#[test]
fn test_email_disclaimers_deduplicated() {
    let input = "From: a@x.com\n\nHi.\n\nCONFIDENTIALITY NOTICE: This message is private.\n\n\
> Earlier.\n\n> CONFIDENTIALITY NOTICE: This message is private.\n";
    let (out, stats) = run(&email(EmailConfig::default()), "m.eml", input);
    assert_eq!(out.matches("CONFIDENTIALITY NOTICE").count(), 1);
    assert_eq!(stats.rules_triggered.get(email::DISCLAIMER), Some(&1));

    let config = EmailConfig { remove_disclaimers: true, ..EmailConfig::default() };
    let (none, _) = run(&email(config), "m.eml", input);
    assert!(!none.contains("CONFIDENTIALITY"));
}

#[test]
fn test_email_signature_and_mobile_footer() {
    let input = "From: a@x.com\n\nThanks\n\nSent from my iPhone\n\n-- \nAlice\nACME Corp\n";
    let (out, _) = run(&email(EmailConfig::default()), "m.eml", input);
    assert!(!out.contains("ACME Corp"));
    assert!(!out.contains("Sent from my iPhone"));
    assert!(out.contains("Thanks"));

    let config = EmailConfig { preserve_signatures: true, ..EmailConfig::default() };
    let (kept, _) = run(&email(config), "m.eml", input);
    assert!(kept.contains("ACME Corp"));
}

#[test]
fn test_email_html_body_reduced() {
    let input = "From: a@x.com\nContent-Type: text/html\n\n<html><body><p>Hello <b>there</b></p></body></html>\n";
    let (out, stats) = run(&email(EmailConfig::default()), "m.eml", input);
    assert!(out.contains("Hello there"));
    assert!(!out.contains("<p>"));
    assert!(!out.contains("Content-Type"));
    assert_eq!(stats.rules_triggered.get(email::HTML_BODY), Some(&1));
}

#[test]
fn test_parse_headers_folds_continuations() {
    let (headers, offset) = email::parse_headers("Subject: a long\n  subject line\nFrom: x@y.z\n\nbody\n").unwrap();
    assert_eq!(headers[0], ("Subject".to_string(), "a long subject line".to_string()));
    assert_eq!(headers.len(), 2);
    assert_eq!(offset, "Subject: a long\n  subject line\nFrom: x@y.z\n\n".len());
    assert!(email::parse_headers("Just a note\n\nbody\n").is_none());
    assert!(email::parse_headers("Note: unrelated\n\nbody\n").is_none());
}

#[test]
fn test_truncate_quotes_untouched_without_deep_quotes() {
    let (out, removed) = email::truncate_quotes("a\n> b\nc", 1);
    assert_eq!(out, "a\n> b\nc");
    assert_eq!(removed, 0);
}

// ========== Markdown ==========

#[test]
fn test_markdown_html_comment_removed() {
    let (out, stats) = run(&markdown(MarkdownConfig::default()), "a.md", "# T\n\n<!-- hidden -->\nText\n");
    assert!(!out.contains("hidden"));
    assert!(stats.rules_triggered.contains_key(tidy_rules::markdown::HTML_COMMENT));

    let config = MarkdownConfig { preserve_comments: true, ..MarkdownConfig::default() };
    let (kept, _) = run(&markdown(config), "a.md", "# T\n\n<!-- hidden -->\nText\n");
    assert!(kept.contains("<!-- hidden -->"));
}

#[test]
fn test_markdown_code_shielded() {
    let input = "Use `<b>` tags.\n\n```html\n<!-- keep -->\n<b>x</b>\n```\n\nSome <b>bold</b> text.\n";
    let (out, _) = run(&markdown(MarkdownConfig::default()), "a.md", input);
    assert!(out.contains("Use `<b>` tags."));
    assert!(out.contains("```html\n<!-- keep -->\n<b>x</b>\n```"));
    assert!(out.contains("Some bold text."));
}

#[test]
fn test_markdown_preserve_html() {
    let config = MarkdownConfig { preserve_html: true, ..MarkdownConfig::default() };
    let (out, _) = run(&markdown(config), "a.md", "Some <b>bold</b> text.\n");
    assert_eq!(out, "Some <b>bold</b> text.\n");
}

#[test]
fn test_markdown_badges_and_images() {
    let input = "[![Build](https://img.shields.io/badge/build-passing.svg)](https://ci.example.com)\n\n# Project\n\n![diagram](docs/d.png)\n\n<img src=\"a.png\" alt=\"Arch\">\n";
    let (out, _) = run(&markdown(MarkdownConfig::default()), "README.md", input);
    assert!(!out.contains("shields.io"));
    assert!(out.contains("![diagram](docs/d.png)"));
    assert!(out.contains("![Arch](a.png)"));

    let config = MarkdownConfig { preserve_images: false, ..MarkdownConfig::default() };
    let (bare, _) = run(&markdown(config), "README.md", input);
    assert!(!bare.contains("d.png"));
    assert!(!bare.contains("a.png"));
}

#[test]
fn test_markdown_links() {
    let input = "See [https://a.com](https://a.com) and [Guide](docs/guide.md).\n";
    let (out, _) = run(&markdown(MarkdownConfig::default()), "a.md", input);
    assert_eq!(out, "See https://a.com and [Guide](docs/guide.md).\n");

    let config = MarkdownConfig { fix_relative_links: true, ..MarkdownConfig::default() };
    let (fixed, _) = run(&markdown(config), "a.md", input);
    assert_eq!(fixed, "See https://a.com and Guide.\n");
}

#[test]
fn test_markdown_frontmatter_toggle() {
    let input = "---\ntitle: x\n---\n# Heading\n\nBody.\n";
    let (kept, _) = run(&markdown(MarkdownConfig::default()), "a.md", input);
    assert!(kept.starts_with("---\ntitle: x\n---\n"));

    let config = MarkdownConfig { preserve_frontmatter: false, ..MarkdownConfig::default() };
    let (out, stats) = run(&markdown(config), "a.md", input);
    assert_eq!(out, "# Heading\n\nBody.\n");
    assert_eq!(stats.rules_triggered.get(markdown::FRONTMATTER), Some(&1));
}

// ========== Idempotence ==========

fn assert_fixed_point<O: ContentOptimizer>(optimizer: &O, path: &str, input: &str) {
    let (first, _) = run(optimizer, path, input);
    let (second, _) = run(optimizer, path, &first);
    let diff = first.chars().count().abs_diff(second.chars().count());
    assert!(diff <= 2, "{path}: second pass changed {diff} chars\n{first}\n---\n{second}");
}

#[test]
fn test_second_pass_is_stable() {
    let (notion_path, notion_content) = notion_page();
    assert_fixed_point(&code(CodeConfig::default()), "app.py", "# Copyright 2020 Foo\nimport os\n\n\ndef f():  \n    pass\n");
    assert_fixed_point(&docs(DocsConfig::default()), "page.md", "# Title\n\nHome | About | Contact\n\nReal content here.\n");
    assert_fixed_point(&notion(NotionConfig::default()), &notion_path, &notion_content);
    assert_fixed_point(&email(EmailConfig::default()), "thread.eml", THREAD);
    assert_fixed_point(&markdown(MarkdownConfig::default()), "a.md", "---\nt: 1\n---\n# H\n<br>\nText &amp; more\n");
}

// ========== Pipeline ==========

struct Exploding;

impl ContentOptimizer for Exploding {
    type Meta = ();

    fn content_type(&self) -> ContentType {
        ContentType::Docs
    }

    fn detect_content_type(&self, _path: &Path, _content: &str) -> f64 {
        0.0
    }

    fn preprocess(&self, raw: &str, _path: &Path) -> Prepared<()> {
        Prepared::new(raw.trim_end(), ())
    }

    fn optimize(&self, _text: String, _meta: &mut (), pass: &mut RulePass<'_>) -> String {
        pass.record("never_counted", 3);
        panic!("boom");
    }

    fn postprocess(&self, text: String, _meta: &()) -> String {
        text
    }
}

#[test]
fn test_stage_panic_becomes_warning() {
    let (out, stats) = run(&Exploding, "x.md", "keep me  \n");
    assert_eq!(out, "keep me");
    assert_eq!(stats.warnings.len(), 1);
    assert_eq!(stats.warnings[0].stage, Stage::Optimize);
    assert_eq!(stats.warnings[0].kind, WarningKind::StageFailure);
    assert!(stats.warnings[0].message.contains("boom"));
    assert!(stats.rules_triggered.is_empty());
}

#[test]
fn test_over_deletion_guard_keeps_text() {
    let set = RuleSet::standard()
        .unwrap()
        .with_rule(
            Rule::builder("wipe_everything", RuleCategory::Custom, ".*")
                .dotall()
                .applies_to(&[ContentType::Docs])
                .build()
                .unwrap(),
        )
        .unwrap();
    let optimizer = DocsOptimizer::new(DocsConfig::default(), Arc::new(set), detector());
    let input = "Lorem ipsum dolor sit amet. ".repeat(36);
    assert!(input.chars().count() >= 1000);
    let (out, stats) = run(&optimizer, "big.txt", &input);
    assert!(out.contains("Lorem ipsum dolor sit amet."));
    let warning = stats.warnings.iter().find(|w| w.kind == WarningKind::OverDeletion).unwrap();
    assert_eq!(warning.rule.as_deref(), Some("wipe_everything"));
    assert!(!stats.rules_triggered.contains_key("wipe_everything"));
}

#[test]
fn test_over_deletion_guard_counts_only_visible_text() {
    let set = RuleSet::standard()
        .unwrap()
        .with_rule(Rule::builder("line_wipe", RuleCategory::Custom, ".*").applies_to(&[ContentType::Docs]).build().unwrap())
        .unwrap();
    let optimizer = DocsOptimizer::new(DocsConfig::default(), Arc::new(set), detector());
    let input = "short item\n".repeat(91);
    let (out, stats) = run(&optimizer, "list.txt", &input);
    assert_eq!(out.matches("short item").count(), 91);
    let warning = stats.warnings.iter().find(|w| w.kind == WarningKind::OverDeletion).unwrap();
    assert_eq!(warning.rule.as_deref(), Some("line_wipe"));
}

#[test]
fn test_stats_measure_chars_and_tokens() {
    let (out, stats) = run(&docs(DocsConfig::default()), "a.md", "# Title\nBody text here.\n");
    assert_eq!(stats.content_type, ContentType::Docs);
    assert_eq!(stats.path, "a.md");
    assert_eq!(stats.original_chars, 24);
    assert_eq!(stats.optimized_chars, out.chars().count());
    assert_eq!(stats.original_tokens, 6);
    assert!(stats.tokens_approximate);
}

#[test]
fn test_custom_token_counter() {
    let words = |s: &str| s.split_whitespace().count();
    let (_, stats) = process(
        &docs(DocsConfig::default()),
        Path::new("a.md"),
        "# Title\n\nthree more words\n",
        DeletionGuard::default(),
        &words,
    );
    assert_eq!(stats.original_tokens, 5);
    assert!(!stats.tokens_approximate);
}

// ========== Dispatch ==========

#[test]
fn test_dispatch_table_covers_detectable_types() {
    let table = Optimizers::new(&TidyConfig::default(), rules(), detector());
    let order: Vec<ContentType> = table.iter().map(|o| o.content_type()).collect();
    assert_eq!(order, ContentType::DETECTABLE.to_vec());
    assert!(table.get(ContentType::Auto).is_none());
    assert_eq!(table.get(ContentType::Email).map(|o| o.content_type()), Some(ContentType::Email));
}

#[test]
fn test_dispatch_confidences() {
    let table = Optimizers::new(&TidyConfig::default(), rules(), detector());
    let scores = table.confidences(Path::new("thread.eml"), THREAD);
    let (best, _) = scores.iter().fold((ContentType::Auto, -1.0), |acc, (ct, c)| if *c > acc.1 { (*ct, *c) } else { acc });
    assert_eq!(best, ContentType::Email);
    let email_score = table.get(ContentType::Email).unwrap().detect_content_type(Path::new("thread.eml"), THREAD);
    assert_eq!(email_score, 1.0);
}

#[test]
fn test_dispatch_process_uses_type_config() {
    let config = TidyConfig { code: CodeConfig { remove_boilerplate: false, ..CodeConfig::default() }, ..TidyConfig::default() };
    let table = Optimizers::new(&config, rules(), detector());
    let input = "# Copyright 2020 Foo Corp\nimport os\n";
    let (out, stats) = table.get(ContentType::Code).unwrap().process(
        Path::new("a.py"),
        input,
        DeletionGuard::default(),
        &ApproximateCounter,
    );
    assert_eq!(out, input);
    assert_eq!(stats.content_type, ContentType::Code);
}

// ========== Frontmatter ==========

#[test]
fn test_split_frontmatter() {
    let (fm, body) = shared::split_frontmatter("---\ntitle: A\ntags: x\n---\nBody\n");
    let fm = fm.unwrap();
    assert_eq!(fm.get("title"), Some("A"));
    assert_eq!(fm.raw, "---\ntitle: A\ntags: x\n---\n");
    assert_eq!(body, "Body\n");

    let (none, body) = shared::split_frontmatter("--- not frontmatter\ntext\n");
    assert!(none.is_none());
    assert_eq!(body, "--- not frontmatter\ntext\n");
}

#[test]
fn test_frontmatter_value_with_dashes() {
    let (fm, body) = shared::split_frontmatter("---\ntitle: a---b\n---\nBody\n");
    assert_eq!(fm.unwrap().get("title"), Some("a---b"));
    assert_eq!(body, "Body\n");
}

#[test]
fn test_frontmatter_with_lines() {
    let fm = Frontmatter::from_lines(&["title: A".to_string()]);
    let merged = fm.with_lines(&["status: Draft".to_string()]);
    assert_eq!(merged.raw, "---\ntitle: A\nstatus: Draft\n---\n");
    assert_eq!(merged.get("status"), Some("Draft"));
}
