use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simgraph::core::FeatureMatrix;
use simgraph::graph::GraphFactory;
use simgraph::query::top_k_neighbors;
use simgraph::similarity::SimilarityMatrix;

const NFEATURES: usize = 64;

fn random_features(n: usize) -> FeatureMatrix {
    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..NFEATURES).map(|_| rng.random::<f64>()).collect())
        .collect();
    FeatureMatrix::from_rows(rows).expect("generated rows are rectangular")
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_compute");
    group.measurement_time(Duration::from_secs(10));

    for &n in &[50usize, 200, 500] {
        let features = random_features(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &features, |b, features| {
            b.iter(|| SimilarityMatrix::compute(black_box(features)))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let features = random_features(500);
    let sim = SimilarityMatrix::compute(&features);

    c.bench_function("top_k_neighbors_500", |b| {
        b.iter(|| top_k_neighbors(black_box(&sim), 250, 5).unwrap())
    });

    c.bench_function("build_graph_500", |b| {
        b.iter(|| GraphFactory::build_graph(black_box(&sim), 0.5))
    });
}

criterion_group!(benches, bench_compute, bench_queries);
criterion_main!(benches);
