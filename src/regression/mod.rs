//! Standardized-feature ridge regression with a reproducible holdout.
//!
//! ```text
//!  Table + features + target
//!        │  validate (NoData / SelectionIncomplete / NonNumericColumn)
//!        ▼
//!  complete rows ──► holdout_split (seeded) ──► train / test
//!        │
//!        ▼
//!  StandardScaler::fit(train) ──► Ridge::fit(z_train)
//!        │
//!        ▼
//!  Metrics on test  +  TrainedModel
//! ```

mod metrics;
mod ridge;
mod scaler;
mod split;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub use metrics::{mae, mse, r_squared, Metrics};
pub use ridge::Ridge;
pub use scaler::StandardScaler;
pub use split::{holdout_split, Split};

use crate::data::Table;
use crate::error::{LabError, Result};

/// Knobs of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainParams {
    pub test_fraction: f64,
    pub seed: u64,
    pub alpha: f64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            alpha: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TrainedModel – scaler + ridge, frozen feature order
// ---------------------------------------------------------------------------

/// A fitted model. Feature order is frozen at training time: the scaler and
/// the coefficients are indexed by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    features: Vec<String>,
    target: String,
    scaler: StandardScaler,
    ridge: Ridge,
    n_train: usize,
    n_test: usize,
}

impl TrainedModel {
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn ridge(&self) -> &Ridge {
        &self.ridge
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Training and holdout row counts.
    pub fn partition_sizes(&self) -> (usize, usize) {
        (self.n_train, self.n_test)
    }

    /// Predict from values given in [`Self::features`] order.
    pub fn predict(&self, values: &[Option<f64>]) -> Result<f64> {
        if values.len() != self.features.len() {
            return Err(LabError::InputCountMismatch {
                expected: self.features.len(),
                got: values.len(),
            });
        }

        let row = self
            .features
            .iter()
            .zip(values)
            .map(|(name, v)| {
                v.ok_or_else(|| LabError::MissingFeatureValue {
                    feature: name.clone(),
                })
            })
            .collect::<Result<Array1<f64>>>()?;

        Ok(self.ridge.predict_row(&self.scaler.transform_row(&row)))
    }

    /// Predict from values keyed by feature name, in whatever order they
    /// arrive.
    pub fn predict_named(&self, values: &BTreeMap<String, Option<f64>>) -> Result<f64> {
        let ordered = self
            .features
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| LabError::MissingFeatureValue {
                        feature: name.clone(),
                    })
            })
            .collect::<Result<Vec<Option<f64>>>>()?;

        if values.len() != self.features.len() {
            return Err(LabError::InputCountMismatch {
                expected: self.features.len(),
                got: values.len(),
            });
        }
        self.predict(&ordered)
    }

    pub fn save_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating model file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).context("writing model JSON")?;
        log::info!("Saved model for '{}' to {}", self.target, path.display());
        Ok(())
    }

    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening model file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file)).context("parsing model JSON")
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Fit a model on `features` → `target` and score it on the holdout rows.
///
/// Rows missing any selected value are dropped before splitting.
pub fn train(
    table: Option<&Table>,
    features: &[String],
    target: Option<&str>,
    params: &TrainParams,
) -> Result<(TrainedModel, Metrics)> {
    let table = table.ok_or(LabError::NoData)?;
    let target = match target {
        Some(t) if !features.is_empty() => t,
        _ => return Err(LabError::SelectionIncomplete),
    };

    let feature_cols = features
        .iter()
        .map(|f| numeric_column(table, f))
        .collect::<Result<Vec<_>>>()?;
    let target_col = numeric_column(table, target)?;

    let complete: Vec<(Vec<f64>, f64)> = (0..table.n_rows())
        .filter_map(|row| {
            let x = feature_cols
                .iter()
                .map(|col| col[row])
                .collect::<Option<Vec<f64>>>()?;
            Some((x, target_col[row]?))
        })
        .collect();

    let dropped = table.n_rows() - complete.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} rows with missing values before training");
    }

    let split = holdout_split(complete.len(), params.test_fraction, params.seed)?;
    let (x_train, y_train) = gather(&complete, &split.train, features.len());
    let (x_test, y_test) = gather(&complete, &split.test, features.len());

    let scaler = StandardScaler::fit(&x_train);
    let ridge = Ridge::fit(&scaler.transform(&x_train), &y_train, params.alpha)?;
    let metrics = Metrics::evaluate(&y_test, &ridge.predict(&scaler.transform(&x_test)));

    log::info!("Trained ridge on {features:?} -> '{target}': {metrics}");

    let model = TrainedModel {
        features: features.to_vec(),
        target: target.to_string(),
        scaler,
        ridge,
        n_train: split.train.len(),
        n_test: split.test.len(),
    };
    Ok((model, metrics))
}

fn numeric_column<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>]> {
    table
        .column(name)
        .ok_or_else(|| LabError::UnknownColumn {
            column: name.to_string(),
        })?
        .as_numeric()
        .ok_or_else(|| LabError::NonNumericColumn {
            column: name.to_string(),
        })
}

fn gather(rows: &[(Vec<f64>, f64)], indices: &[usize], width: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((indices.len(), width), |(i, j)| rows[indices[i]].0[j]);
    let y = indices.iter().map(|&i| rows[i].1).collect();
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn linear_table(n: usize) -> Table {
        let x: Vec<Option<f64>> = (1..=n).map(|v| Some(v as f64)).collect();
        let y: Vec<Option<f64>> = (1..=n).map(|v| Some(2.0 * v as f64)).collect();
        Table::new(
            vec!["x".into(), "y".into(), "label".into()],
            vec![
                Column::Numeric(x),
                Column::Numeric(y),
                Column::Text(vec![None; n]),
            ],
        )
        .unwrap()
    }

    fn select(features: &[&str]) -> Vec<String> {
        features.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn learns_y_equals_two_x() {
        let table = linear_table(10);
        let (model, metrics) =
            train(Some(&table), &select(&["x"]), Some("y"), &TrainParams::default()).unwrap();

        assert_eq!(model.partition_sizes(), (8, 2));
        assert_eq!(model.features(), &["x"]);
        assert_eq!(model.target(), "y");
        assert!(metrics.mae.is_finite() && metrics.rmse >= metrics.mae);
        // Ridge shrinks the slope to 2·8/9, so x = 5 sits near the training mean.
        let pred = model.predict(&[Some(5.0)]).unwrap();
        assert!((pred - 10.0).abs() < 0.5, "prediction {pred}");
    }

    #[test]
    fn r2_approaches_one_on_exact_linear_data() {
        let table = linear_table(200);
        let (_, metrics) =
            train(Some(&table), &select(&["x"]), Some("y"), &TrainParams::default()).unwrap();
        assert!(metrics.r2 > 0.999, "r2 = {}", metrics.r2);
    }

    #[test]
    fn repeated_training_is_bit_identical() {
        let table = linear_table(37);
        let params = TrainParams::default();
        let (_, a) = train(Some(&table), &select(&["x"]), Some("y"), &params).unwrap();
        let (_, b) = train(Some(&table), &select(&["x"]), Some("y"), &params).unwrap();
        assert_eq!(a.mae.to_bits(), b.mae.to_bits());
        assert_eq!(a.rmse.to_bits(), b.rmse.to_bits());
        assert_eq!(a.r2.to_bits(), b.r2.to_bits());
    }

    #[test]
    fn precondition_failures_are_distinct() {
        let table = linear_table(10);
        let p = TrainParams::default();

        assert!(matches!(
            train(None, &select(&["x"]), Some("y"), &p),
            Err(LabError::NoData)
        ));
        assert!(matches!(
            train(Some(&table), &[], Some("y"), &p),
            Err(LabError::SelectionIncomplete)
        ));
        assert!(matches!(
            train(Some(&table), &select(&["x"]), None, &p),
            Err(LabError::SelectionIncomplete)
        ));
        assert!(matches!(
            train(Some(&table), &select(&["label"]), Some("y"), &p),
            Err(LabError::NonNumericColumn { column }) if column == "label"
        ));
        assert!(matches!(
            train(Some(&table), &select(&["x"]), Some("label"), &p),
            Err(LabError::NonNumericColumn { .. })
        ));
        assert!(matches!(
            train(Some(&table), &select(&["zzz"]), Some("y"), &p),
            Err(LabError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn incomplete_rows_are_dropped() {
        let table = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                Column::Numeric(vec![Some(1.0), None, Some(3.0), Some(4.0)]),
                Column::Numeric(vec![Some(2.0), Some(4.0), None, Some(8.0)]),
            ],
        )
        .unwrap();
        let (model, _) =
            train(Some(&table), &select(&["x"]), Some("y"), &TrainParams::default()).unwrap();
        assert_eq!(model.partition_sizes(), (1, 1));

        let sparse = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                Column::Numeric(vec![Some(1.0), None]),
                Column::Numeric(vec![Some(2.0), Some(4.0)]),
            ],
        )
        .unwrap();
        assert!(matches!(
            train(Some(&sparse), &select(&["x"]), Some("y"), &TrainParams::default()),
            Err(LabError::InsufficientRows { rows: 1 })
        ));
    }

    #[test]
    fn prediction_validates_inputs_in_frozen_order() {
        let table = Table::new(
            vec!["a".into(), "b".into(), "y".into()],
            vec![
                Column::Numeric((0..20).map(|v| Some(v as f64)).collect()),
                Column::Numeric((0..20).map(|v| Some((v % 7) as f64)).collect()),
                Column::Numeric((0..20).map(|v| Some(v as f64 + 3.0 * (v % 7) as f64)).collect()),
            ],
        )
        .unwrap();
        let (model, _) =
            train(Some(&table), &select(&["b", "a"]), Some("y"), &TrainParams::default()).unwrap();

        assert!(matches!(
            model.predict(&[Some(1.0)]),
            Err(LabError::InputCountMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            model.predict(&[Some(1.0), None]),
            Err(LabError::MissingFeatureValue { feature }) if feature == "a"
        ));

        let positional = model.predict(&[Some(2.0), Some(10.0)]).unwrap();
        let named = model
            .predict_named(&BTreeMap::from([
                ("a".to_string(), Some(10.0)),
                ("b".to_string(), Some(2.0)),
            ]))
            .unwrap();
        assert_eq!(positional.to_bits(), named.to_bits());

        assert!(matches!(
            model.predict_named(&BTreeMap::from([("a".to_string(), Some(1.0))])),
            Err(LabError::MissingFeatureValue { feature }) if feature == "b"
        ));
        assert!(matches!(
            model.predict_named(&BTreeMap::from([
                ("a".to_string(), Some(1.0)),
                ("b".to_string(), Some(1.0)),
                ("c".to_string(), Some(1.0)),
            ])),
            Err(LabError::InputCountMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn model_json_round_trip_preserves_predictions() {
        let table = linear_table(30);
        let (model, _) =
            train(Some(&table), &select(&["x"]), Some("y"), &TrainParams::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model.save_json(&path).unwrap();
        let loaded = TrainedModel::load_json(&path).unwrap();

        assert_eq!(loaded.features(), model.features());
        let a = model.predict(&[Some(7.5)]).unwrap();
        let b = loaded.predict(&[Some(7.5)]).unwrap();
        assert!((a - b).abs() < 1e-9);
    }
}
