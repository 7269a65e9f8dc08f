use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tidy_core::{ContentType, TidyConfig};
use tidy_engine::UnifiedOptimizer;

const PIECES: &[(&str, &str)] = &[
    ("guide.txt", "Installation\n\nHome | About | Contact\n\nThis guide explains how to install the tool.\n"),
    ("thread.eml", "From: a@x.com\nTo: b@y.com\nSubject: Re: plan\n\nOk.\n\nOn Mon, Bob wrote:\n> one\n> > two\n"),
    ("app.py", "# Copyright 2020 Foo Corp\nimport os\n\ndef f():\n    return 1\n"),
    ("notes.md", "---\ntitle: x\n---\n# Notes\n\n<!-- draft -->\nSee [a](https://a.com).\n"),
];

fn random_corpus(files: usize) -> Vec<(&'static str, String)> {
    let mut rng = rand::thread_rng();
    (0..files)
        .map(|_| {
            let (name, body) = PIECES.choose(&mut rng).copied().unwrap_or(PIECES[0]);
            (name, body.repeat(rng.gen_range(1..20)))
        })
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let engine = UnifiedOptimizer::new(TidyConfig::default()).expect("default config");
    let corpus = random_corpus(200);

    c.bench_function("auto_dispatch_200_files", |b| {
        b.iter(|| {
            for (name, body) in &corpus {
                black_box(engine.optimize_content(Path::new(name), body, ContentType::Auto));
            }
        })
    });

    c.bench_function("detect_only_200_files", |b| {
        b.iter(|| {
            for (name, body) in &corpus {
                black_box(engine.detect(Path::new(name), Some(body)));
            }
        })
    });
}

fn bench_directory(c: &mut Criterion) {
    let engine = UnifiedOptimizer::new(TidyConfig::default()).expect("default config");
    let dir = tempfile::TempDir::new().expect("temp dir");
    let mut files = Vec::new();
    for (i, (name, body)) in random_corpus(50).into_iter().enumerate() {
        let file = format!("{i}-{name}");
        std::fs::write(dir.path().join(&file), body).expect("write corpus file");
        files.push(file);
    }

    c.bench_function("optimize_directory_50_files", |b| {
        b.iter(|| black_box(engine.optimize_directory(dir.path(), &files, ContentType::Auto)))
    });
}

criterion_group!(benches, bench_dispatch, bench_directory);
criterion_main!(benches);
