//! Performance benchmarks for the metric index and search path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use dishfinder::index::{BkTree, Catalog};
use dishfinder::metric::{levenshtein, Levenshtein};
use dishfinder::text::Normalizer;
use dishfinder::{SearchConfig, SearchEngine};

/// Deterministic pseudo-word generator, no RNG dependency needed
fn vocabulary(count: usize) -> Vec<String> {
    let syllables = [
        "bor", "scht", "chi", "cken", "nood", "le", "sal", "ad", "pan", "cake", "bur", "rito",
        "tar", "tle", "sou", "pes",
    ];
    (0..count)
        .map(|i| {
            let a = syllables[i % syllables.len()];
            let b = syllables[(i / syllables.len() + i) % syllables.len()];
            let c = syllables[(i * 7 + 3) % syllables.len()];
            format!("{a}{b}{c}")
        })
        .collect()
}

fn bench_bktree_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("bktree_query");

    for size in [1_000, 10_000] {
        let vocab = vocabulary(size);
        let mut tree = BkTree::new(Levenshtein);
        for word in &vocab {
            tree.insert(word);
        }

        group.bench_with_input(BenchmarkId::new("tree", size), &tree, |b, tree| {
            b.iter(|| black_box(tree.query(black_box("borschtle"), 2)));
        });

        group.bench_with_input(BenchmarkId::new("linear_scan", size), &vocab, |b, vocab| {
            b.iter(|| {
                let hits: Vec<&String> = vocab
                    .iter()
                    .filter(|w| levenshtein("borschtle", w) <= 2)
                    .collect();
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let rows: Vec<String> = vocabulary(2_000)
        .into_iter()
        .enumerate()
        .map(|(i, word)| format!("Cafe {},desc,50.0,30.0,{} plate,{}.0", i % 50, word, i % 90))
        .collect();

    let catalog =
        Catalog::build(rows.iter(), Normalizer::new(Default::default())).unwrap();
    let engine = SearchEngine::new(Arc::new(catalog), SearchConfig::default());

    c.bench_function("search_single_token", |b| {
        b.iter(|| black_box(engine.search(black_box("borschtle"))));
    });

    c.bench_function("search_multi_token", |b| {
        b.iter(|| black_box(engine.search(black_box("borschtle plate chicken"))));
    });
}

criterion_group!(benches, bench_bktree_query, bench_search);
criterion_main!(benches);
