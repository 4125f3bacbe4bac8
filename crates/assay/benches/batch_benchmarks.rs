//! Posterior estimation performance benchmarks.
//!
//! Measures training cost and batch prediction throughput on either side of
//! the parallel threshold.

use std::sync::Arc;

use assay::{
    BatchDescriptor, Dataset, Estimator, NaiveBayesConfig, NaiveBayesEstimator, Parser,
    TableDataset,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Generate a hospital-style table with correlated city, state and zip columns.
fn generate_hospital_data(rows: usize) -> String {
    let mut data = String::from("provider,city,state,zip,county\n");

    let places = [
        ("BIRMINGHAM", "AL", "35233", "JEFFERSON"),
        ("DOTHAN", "AL", "36301", "HOUSTON"),
        ("BOAZ", "AL", "35957", "MARSHALL"),
        ("FLORENCE", "AL", "35631", "LAUDERDALE"),
        ("PHOENIX", "AZ", "85006", "MARICOPA"),
        ("TUCSON", "AZ", "85712", "PIMA"),
        ("FRESNO", "CA", "93721", "FRESNO"),
        ("OAKLAND", "CA", "94609", "ALAMEDA"),
    ];

    for row in 0..rows {
        let (city, state, zip, county) = places[row % places.len()];
        // Roughly one cell in 25 carries a typo
        let city = if row % 25 == 7 { "BIRMINGHXM" } else { city };
        data.push_str(&format!(
            "{:05},{},{},{},{}\n",
            10000 + row,
            city,
            state,
            zip,
            county
        ));
    }

    data
}

fn load(rows: usize) -> Arc<TableDataset> {
    let table = Parser::new()
        .parse_str(&generate_hospital_data(rows))
        .unwrap();
    Arc::new(TableDataset::new(table).unwrap())
}

fn trained(dataset: &Arc<TableDataset>, parallel_threshold: usize) -> NaiveBayesEstimator {
    let mut estimator = NaiveBayesEstimator::new(dataset.clone()).unwrap();
    estimator
        .train(&NaiveBayesConfig {
            parallel_threshold,
            ..NaiveBayesConfig::default()
        })
        .unwrap();
    estimator
}

fn city_descriptors(dataset: &TableDataset) -> Vec<BatchDescriptor> {
    let domain = [
        "BIRMINGHAM",
        "BIRMINGHXM",
        "DOTHAN",
        "BOAZ",
        "FLORENCE",
        "PHOENIX",
        "TUCSON",
        "FRESNO",
        "OAKLAND",
    ];
    dataset
        .tids()
        .into_iter()
        .map(|tid| BatchDescriptor::new(tid, "city", domain))
        .collect()
}

/// Benchmark model fitting as the table grows.
fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = load(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(trained(dataset, 256)))
        });
    }

    group.finish();
}

/// Benchmark batch prediction, sequential against parallel.
fn bench_predict_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_batch");

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = load(*rows);
        let records = dataset.records();
        let descriptors = city_descriptors(&dataset);
        group.throughput(Throughput::Elements(descriptors.len() as u64));

        for (label, threshold) in [("sequential", usize::MAX), ("parallel", 0)] {
            let estimator = trained(&dataset, threshold);
            group.bench_with_input(BenchmarkId::new(label, rows), &descriptors, |b, descriptors| {
                b.iter(|| black_box(estimator.predict_pp_batch(&records, descriptors).unwrap()))
            });
        }
    }

    group.finish();
}

/// Benchmark one cell at a time, the path the batch call replaces.
fn bench_predict_single(c: &mut Criterion) {
    let dataset = load(1_000);
    let estimator = trained(&dataset, 256);
    let row = dataset.row(7).unwrap();
    let domain: Vec<String> = ["BIRMINGHAM", "BIRMINGHXM", "DOTHAN"]
        .iter()
        .map(|v| v.to_string())
        .collect();

    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(estimator.predict_pp(&row, "city", &domain).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_train,
    bench_predict_batch,
    bench_predict_single,
);
criterion_main!(benches);
