//! Benchmarks for the index store.
//!
//! Run with: cargo bench -p speedy-core
//! Results are saved to target/criterion/

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use speedy_core::ResultKind;
use speedy_core::index::{IndexStore, IndexedEntry};

fn generate_entries(count: usize) -> IndexStore {
    let names = [
        ("Firefox", ResultKind::Application),
        ("Visual Studio Code", ResultKind::Application),
        ("Terminal", ResultKind::Application),
        ("Documents", ResultKind::Folder),
        ("Downloads", ResultKind::Folder),
        ("projects", ResultKind::Folder),
        ("report-2024.pdf", ResultKind::File),
        ("quarterly-report.xlsx", ResultKind::File),
        ("notes.md", ResultKind::File),
        ("Cargo.toml", ResultKind::File),
        ("holiday-photo.jpg", ResultKind::File),
        ("invoice_march.pdf", ResultKind::File),
    ];

    let mut store = IndexStore::new();
    store.extend((0..count).map(|i| {
        let (name, kind) = names[i % names.len()];
        IndexedEntry::new(format!("/home/user/{i}/{name}"), name, kind)
    }));
    store
}

fn bench_search_basic(c: &mut Criterion) {
    let store = generate_entries(1000);

    c.bench_function("search_basic_1000", |b| {
        b.iter(|| store.search(black_box("report"), black_box(20), 0));
    });
}

fn bench_search_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_scaling");

    for size in &[1_000, 10_000, 50_000, 100_000] {
        let store = generate_entries(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| store.search(black_box("code"), black_box(20), 0));
        });
    }
    group.finish();
}

fn bench_search_queries(c: &mut Criterion) {
    let store = generate_entries(10_000);
    let mut group = c.benchmark_group("search_queries");

    let queries = [
        ("short", "re"),
        ("medium", "report"),
        ("long", "visual studio code"),
        ("partial", "invo"),
        ("no_match", "zzzz"),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::new("query", name), query, |b, q| {
            b.iter(|| store.search(black_box(q), black_box(20), 0));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_search_basic,
    bench_search_scaling,
    bench_search_queries
);
criterion_main!(benches);
