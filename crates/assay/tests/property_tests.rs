//! Property-based tests for posterior estimation.
//!
//! These tests generate random tables and queries and check that every
//! estimator keeps its contract:
//! 1. **Alignment**: one probability per candidate, in candidate order
//! 2. **Bounds**: every probability lies in [0, 1]
//! 3. **Equivalence**: batch results equal single-cell results
//! 4. **Order**: any permutation of descriptors permutes results the same way
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p assay --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p assay --test property_tests
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use assay::{
    AnyEstimator, BatchDescriptor, Dataset, Estimator, EstimatorConfig, EstimatorKind, Parser,
    TableDataset,
};

const ATTRIBUTES: [&str; 3] = ["city", "state", "zip"];

// =============================================================================
// Test Strategies
// =============================================================================

/// Rows over small alphabets so values repeat and co-occur.
fn table_rows() -> impl Strategy<Value = Vec<(String, String, String)>> {
    prop::collection::vec(("[a-d]", "[w-z]", "[0-2]"), 1..40)
}

/// A duplicate-free candidate list that may include unseen values.
fn domain() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-f]|[w-z]|[0-4]", 1..6)
        .prop_map(|set: BTreeSet<String>| set.into_iter().collect())
}

/// Cell picks together with a random permutation of their indices.
fn picks_with_permutation() -> impl Strategy<Value = (Vec<(usize, usize)>, Vec<usize>)> {
    prop::collection::vec((any::<usize>(), 0usize..3), 1..30).prop_flat_map(|picks| {
        let order: Vec<usize> = (0..picks.len()).collect();
        (Just(picks), Just(order).prop_shuffle())
    })
}

fn kind() -> impl Strategy<Value = EstimatorKind> {
    prop_oneof![Just(EstimatorKind::NaiveBayes), Just(EstimatorKind::Frequency)]
}

fn smoothing() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1.0), 0.01f64..5.0]
}

fn build_dataset(rows: &[(String, String, String)]) -> Arc<TableDataset> {
    let mut csv = ATTRIBUTES.join(",");
    csv.push('\n');
    for (a, b, c) in rows {
        csv.push_str(&format!("{},{},{}\n", a, b, c));
    }
    let table = Parser::new().parse_str(&csv).expect("generated CSV parses");
    Arc::new(TableDataset::new(table).expect("generated headers are valid"))
}

fn trained(
    dataset: &Arc<TableDataset>,
    kind: EstimatorKind,
    smoothing: f64,
    parallel_threshold: usize,
) -> AnyEstimator {
    let options = serde_json::json!({
        "smoothing": smoothing,
        "parallel_threshold": parallel_threshold,
    });
    let config = EstimatorConfig::from_options(
        kind,
        options.as_object().expect("options literal is an object"),
    )
    .expect("valid options");

    let mut estimator = AnyEstimator::new(kind, dataset.clone()).expect("valid schema");
    estimator.train(&config).expect("training succeeds");
    estimator
}

fn descriptors_for(
    dataset: &TableDataset,
    picks: &[(usize, usize)],
    domain: &[String],
) -> Vec<BatchDescriptor> {
    picks
        .iter()
        .map(|&(row, attr)| {
            BatchDescriptor::new(
                row % dataset.row_count(),
                ATTRIBUTES[attr % ATTRIBUTES.len()],
                domain.iter().cloned(),
            )
        })
        .collect()
}

// =============================================================================
// Single-Cell Properties
// =============================================================================

proptest! {
    /// Output pairs up with the candidates in the order given.
    #[test]
    fn output_aligned_with_domain(
        rows in table_rows(),
        values in domain(),
        kind in kind(),
        alpha in smoothing(),
        row in any::<usize>(),
        attr in 0usize..3,
    ) {
        let dataset = build_dataset(&rows);
        let estimator = trained(&dataset, kind, alpha, 256);
        let tid = row % dataset.row_count();
        let record = dataset.row(tid).expect("tid in range");

        let result = estimator
            .predict_pp(&record, ATTRIBUTES[attr], &values)
            .expect("valid query");

        prop_assert_eq!(result.len(), values.len());
        let order: Vec<&str> = result.values().collect();
        let expected: Vec<&str> = values.iter().map(String::as_str).collect();
        prop_assert_eq!(order, expected);
    }

    /// Probabilities stay in [0, 1] and sum to one.
    #[test]
    fn probabilities_bounded(
        rows in table_rows(),
        values in domain(),
        kind in kind(),
        alpha in smoothing(),
        row in any::<usize>(),
        attr in 0usize..3,
    ) {
        let dataset = build_dataset(&rows);
        let estimator = trained(&dataset, kind, alpha, 256);
        let record = dataset.row(row % dataset.row_count()).expect("tid in range");

        let result = estimator
            .predict_pp(&record, ATTRIBUTES[attr], &values)
            .expect("valid query");

        for p in result.probabilities() {
            prop_assert!((0.0..=1.0).contains(&p), "probability {} out of range", p);
        }
        let total: f64 = result.probabilities().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "probabilities sum to {}", total);
    }

    /// Repeated queries on a trained estimator agree exactly.
    #[test]
    fn prediction_is_deterministic(
        rows in table_rows(),
        values in domain(),
        kind in kind(),
        attr in 0usize..3,
    ) {
        let dataset = build_dataset(&rows);
        let estimator = trained(&dataset, kind, 1.0, 256);
        let record = dataset.row(0).expect("at least one row");

        let first = estimator.predict_pp(&record, ATTRIBUTES[attr], &values).expect("valid query");
        let second = estimator.predict_pp(&record, ATTRIBUTES[attr], &values).expect("valid query");
        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Batch Properties
// =============================================================================

proptest! {
    /// Each batch result equals the single-cell result for its descriptor.
    #[test]
    fn batch_equals_single(
        rows in table_rows(),
        values in domain(),
        kind in kind(),
        alpha in smoothing(),
        picks in prop::collection::vec((any::<usize>(), 0usize..3), 0..30),
        parallel_threshold in prop_oneof![Just(0usize), Just(256usize)],
    ) {
        let dataset = build_dataset(&rows);
        let estimator = trained(&dataset, kind, alpha, parallel_threshold);
        let records = dataset.records();
        let descriptors = descriptors_for(&dataset, &picks, &values);

        let batch = estimator.predict_pp_batch(&records, &descriptors).expect("valid batch");
        prop_assert_eq!(batch.len(), descriptors.len());

        for (d, result) in descriptors.iter().zip(&batch) {
            let single = estimator
                .predict_pp(&records[&d.tid], &d.attribute, &d.domain)
                .expect("valid query");
            prop_assert!(result.approx_eq(&single, 1e-12));
        }
    }

    /// Permuting descriptors permutes the results the same way.
    #[test]
    fn batch_follows_descriptor_order(
        rows in table_rows(),
        values in domain(),
        kind in kind(),
        (picks, order) in picks_with_permutation(),
        parallel_threshold in prop_oneof![Just(0usize), Just(256usize)],
    ) {
        let dataset = build_dataset(&rows);
        let estimator = trained(&dataset, kind, 1.0, parallel_threshold);
        let records = dataset.records();

        let original = descriptors_for(&dataset, &picks, &values);
        let permuted: Vec<BatchDescriptor> =
            order.iter().map(|&i| original[i].clone()).collect();

        let a = estimator.predict_pp_batch(&records, &original).expect("valid batch");
        let b = estimator.predict_pp_batch(&records, &permuted).expect("valid batch");
        prop_assert_eq!(b.len(), order.len());

        for (position, &i) in order.iter().enumerate() {
            prop_assert!(b[position].approx_eq(&a[i], 1e-12));
        }
    }
}
