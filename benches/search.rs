//! Benchmarks for line search and replace-all.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use neocoder::editor::DocumentBuffer;
use neocoder::search::{find, replace_all};

fn sample_source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("let value{i} = compute(value{i}, {i})"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_find(c: &mut Criterion) {
    let buffer = DocumentBuffer::from_text(&sample_source(5_000));
    c.bench_function("find_5k_lines", |b| {
        b.iter(|| find(black_box(&buffer), black_box("Compute(VALUE42")))
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = sample_source(5_000);
    c.bench_function("replace_all_5k_lines", |b| {
        b.iter(|| replace_all(black_box(&text), black_box("compute"), black_box("evaluate")))
    });
}

criterion_group!(benches, bench_find, bench_replace_all);
criterion_main!(benches);
