use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use lutforge::{Filter, GeneratorConfig, Mode, emit::document};

fn bench_assemble(c: &mut Criterion) {
    let cfg = GeneratorConfig::default();

    let mut group = c.benchmark_group("assemble");
    group.bench_function("all", |b| {
        b.iter(|| document::assemble(black_box(&cfg), Mode::All));
    });
    group.bench_function("grayscale", |b| {
        b.iter(|| document::assemble(black_box(&cfg), Mode::Single(Filter::Grayscale)));
    });
    group.bench_function("coefficients", |b| {
        b.iter(|| document::assemble(black_box(&cfg), Mode::CoefficientsOnly));
    });
    group.finish();
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
