use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;
use tidy_detect::Detector;

fn bench_detect_mixed(c: &mut Criterion) {
    let detector = Detector::default();
    let samples = vec![
        ("src/main.py", "#!/usr/bin/env python3\nimport os\nimport sys\n\ndef main():\n    return 0\n".repeat(40)),
        ("thread.txt", "From: a@x.com\nTo: b@y.com\nSubject: Re: plan\n\n> quoted\n> more\n\nThanks\n".repeat(40)),
        ("Page 0123456789abcdef0123456789abcdef.md", "# Page\n\nCreated: 2024-01-01\nTags: a, b\n".repeat(40)),
        ("guide.md", "# Guide\n\nThis guide explains the configuration options in detail.\n\n- [Intro](#intro)\n".repeat(40)),
        ("index.html", "<div class=\"content\"><p>Hello <a href=\"/\">home</a></p></div>\n".repeat(40)),
    ];

    c.bench_function("detect_500_mixed_files", |b| {
        b.iter(|| {
            for _ in 0..100 {
                for (path, content) in &samples {
                    black_box(detector.detect(Path::new(path), Some(content)));
                }
            }
        })
    });

    let large = "Plain prose sentence for sampling purposes only. ".repeat(20_000);
    c.bench_function("detect_1mb_sampled", |b| {
        b.iter(|| black_box(detector.detect(Path::new("large.txt"), Some(black_box(&large)))))
    });
}

criterion_group!(benches, bench_detect_mixed);
criterion_main!(benches);
