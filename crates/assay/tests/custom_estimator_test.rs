//! Integration tests for estimators defined outside the library.

use std::collections::HashMap;
use std::sync::Arc;

use assay::posterior::validate_domain;
use assay::{
    AssayError, BatchDescriptor, Dataset, DomainPruner, Estimator, Parser, PosteriorResult,
    PruningConfig, Result, Row, TableDataset, Tid,
};

/// Options for [`CurrentValueEstimator`].
struct CurrentValueConfig {
    confidence: f64,
}

/// Trusts each cell's current value with a fixed confidence and spreads the
/// rest evenly over the other candidates.
struct CurrentValueEstimator {
    confidence: Option<f64>,
}

impl CurrentValueEstimator {
    fn new() -> Self {
        Self { confidence: None }
    }
}

impl Estimator for CurrentValueEstimator {
    type Config = CurrentValueConfig;

    fn train(&mut self, config: &CurrentValueConfig) -> Result<()> {
        if !(0.0..=1.0).contains(&config.confidence) {
            return Err(AssayError::Configuration(format!(
                "confidence must lie in [0, 1], got {}",
                config.confidence
            )));
        }
        self.confidence = Some(config.confidence);
        Ok(())
    }

    fn predict_pp(&self, row: &Row, attr: &str, values: &[String]) -> Result<PosteriorResult> {
        let confidence = self.confidence.ok_or(AssayError::NotTrained)?;
        validate_domain(values)?;

        let current = row.observed(attr);
        let holds_current = current.is_some_and(|c| values.iter().any(|v| v == c));
        let probabilities = if !holds_current || values.len() == 1 {
            vec![1.0 / values.len() as f64; values.len()]
        } else {
            let rest = (1.0 - confidence) / (values.len() - 1) as f64;
            values
                .iter()
                .map(|v| if Some(v.as_str()) == current { confidence } else { rest })
                .collect()
        };
        PosteriorResult::new(values, probabilities)
    }

    fn predict_pp_batch(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<PosteriorResult>> {
        descriptors
            .iter()
            .enumerate()
            .map(|(idx, d)| {
                let row = records.get(&d.tid).ok_or_else(|| {
                    AssayError::InvalidQuery(format!("descriptor {}: tid {} missing", idx, d.tid))
                })?;
                self.predict_pp(row, &d.attribute, &d.domain)
            })
            .collect()
    }
}

fn dataset() -> Arc<TableDataset> {
    let table = Parser::new()
        .parse_str("city,state\nLA,CA\nLA,NY\nNYC,NY\n")
        .expect("Parse failed");
    Arc::new(TableDataset::new(table).expect("Invalid dataset"))
}

fn trained(confidence: f64) -> CurrentValueEstimator {
    let mut estimator = CurrentValueEstimator::new();
    estimator
        .train(&CurrentValueConfig { confidence })
        .expect("Training failed");
    estimator
}

// =============================================================================
// Contract
// =============================================================================

#[test]
fn test_custom_estimator_returns_aligned_posteriors() {
    let ds = dataset();
    let estimator = trained(0.7);
    let row = ds.row(1).expect("Row 1 exists");

    let values = vec!["CA".to_string(), "NY".to_string(), "TX".to_string()];
    let result = estimator.predict_pp(&row, "state", &values).unwrap();

    let order: Vec<&str> = result.values().collect();
    assert_eq!(order, vec!["CA", "NY", "TX"]);
    assert!((result.probability("NY").unwrap() - 0.7).abs() < 1e-12);
    assert!((result.probability("CA").unwrap() - 0.15).abs() < 1e-12);
}

#[test]
fn test_custom_estimator_errors() {
    let mut estimator = CurrentValueEstimator::new();
    let row = Row::from_pairs(0, [("state", "CA")]);

    let err = estimator
        .predict_pp(&row, "state", &["CA".to_string()])
        .unwrap_err();
    assert!(matches!(err, AssayError::NotTrained));

    let err = estimator
        .train(&CurrentValueConfig { confidence: 2.0 })
        .unwrap_err();
    assert!(matches!(err, AssayError::Configuration(_)));
}

#[test]
fn test_custom_estimator_as_trait_object() {
    let ds = dataset();
    let boxed: Box<dyn Estimator<Config = CurrentValueConfig>> = Box::new(trained(0.9));

    let descriptors = vec![
        BatchDescriptor::new(2, "city", ["LA", "NYC"]),
        BatchDescriptor::new(0, "city", ["LA", "NYC"]),
    ];
    let batch = boxed.predict_pp_batch(&ds.records(), &descriptors).unwrap();
    assert_eq!(batch[0].argmax().map(|(v, _)| v), Some("NYC"));
    assert_eq!(batch[1].argmax().map(|(v, _)| v), Some("LA"));
}

// =============================================================================
// Pruning
// =============================================================================

#[test]
fn test_custom_estimator_drives_pruning() {
    let ds = dataset();
    let estimator = trained(0.995);
    let pruner = DomainPruner::new(&estimator, PruningConfig::default()).expect("Valid config");

    let report = pruner.run(&*ds, &["state"]).expect("Pruning failed");
    assert_eq!(report.cells, 3);
    assert_eq!(report.weak_labels.len(), 3);
    assert!(report.weak_labels.iter().all(|l| !l.changed));
    assert!(report.domains.iter().all(|d| d.values.len() == 1));
}
