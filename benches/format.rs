//! Benchmarks for brace indentation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use neocoder::editor::DocumentBuffer;
use neocoder::format::{TabSize, format};

fn bench_format_nested(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..1_000 {
        source.push_str(&format!("func f{i}() {{\nif x {{\nreturn {i}\n}}\n}}\n"));
    }
    let buffer = DocumentBuffer::from_text(&source);
    let indent = TabSize::new(4).indent_unit();

    c.bench_function("format_5k_lines", |b| {
        b.iter(|| format(black_box(&buffer), black_box(&indent)))
    });
}

criterion_group!(benches, bench_format_nested);
criterion_main!(benches);
