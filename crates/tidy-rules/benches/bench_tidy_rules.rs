use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use tidy_core::ContentType;
use tidy_rules::{segments, DeletionGuard, RulePass, RuleSet};

const BLOCKS: &[&str] = &[
    "Home | About | Services | Contact\n",
    "We use cookies to improve your experience. Accept all cookies.\n",
    "The installer copies the binaries into place and writes a default config file.\n",
    "## Usage\n\nRun the tool with `--help` to see every option.\n",
    "```sh\ncargo install tidy\n```\n",
    "| Option | Default |\n|---|---|\n| level | 2 |\n",
    "Posted on 12/03/2021 by Admin\n",
    "\n\n\n\n",
    "Subscribe to our newsletter\nEmail Address *\nSubscribe\n",
    "Paragraph text describing configuration precedence and overrides in detail.\n",
];

fn generate_page(size_kb: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut text = String::with_capacity(size_kb * 1024);
    while text.len() < size_kb * 1024 {
        if let Some(block) = BLOCKS.choose(&mut rng) {
            text.push_str(block);
            text.push('\n');
        }
    }
    text
}

fn bench_standard_build(c: &mut Criterion) {
    c.bench_function("rule_set_standard", |b| b.iter(|| black_box(RuleSet::standard().unwrap())));
}

fn bench_docs_rules(c: &mut Criterion) {
    let set = RuleSet::standard().unwrap();
    for size in [1, 10, 100] {
        let page = generate_page(size);
        c.bench_function(&format!("docs_rules_{size}kb"), |b| {
            b.iter(|| {
                let mut pass = RulePass::new("bench.md", DeletionGuard::default());
                let mut text = page.clone();
                for rule in set.for_type(ContentType::Docs) {
                    text = pass.apply_shielded(rule, text, segments::code_and_tables);
                }
                black_box(text)
            })
        });
    }
}

fn bench_shields(c: &mut Criterion) {
    let page = generate_page(100);
    c.bench_function("code_and_tables_100kb", |b| {
        b.iter(|| black_box(segments::code_and_tables(black_box(&page))))
    });
}

criterion_group!(benches, bench_standard_build, bench_docs_rules, bench_shields);
criterion_main!(benches);
