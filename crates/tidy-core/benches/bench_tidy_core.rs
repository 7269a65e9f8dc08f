use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tidy_core::{estimate_tokens, ContentType, OptimizationStats, TidyConfig};

fn bench_estimate_tokens(c: &mut Criterion) {
    let text = "Sample paragraph with mixed content, links and headings. ".repeat(2000);
    c.bench_function("estimate_tokens_100kb", |b| {
        b.iter(|| black_box(estimate_tokens(black_box(&text))))
    });
}

fn bench_config_parse(c: &mut Criterion) {
    let json = serde_json::to_string(&TidyConfig::default()).unwrap();
    c.bench_function("config_from_json", |b| {
        b.iter(|| black_box(TidyConfig::from_json_str(black_box(&json)).unwrap()))
    });
}

fn bench_record_rules(c: &mut Criterion) {
    c.bench_function("stats_record_rule_1000", |b| {
        b.iter(|| {
            let mut stats = OptimizationStats::new("bench.md", ContentType::Docs);
            for i in 0..1000 {
                stats.record_rule(&format!("rule_{}", i % 40), 1);
            }
            black_box(stats);
        })
    });
}

criterion_group!(benches, bench_estimate_tokens, bench_config_parse, bench_record_rules);
criterion_main!(benches);
