use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Holdout error metrics of one training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl Metrics {
    pub fn evaluate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        Self {
            mae: mae(y_true, y_pred),
            rmse: mse(y_true, y_pred).sqrt(),
            r2: r_squared(y_true, y_pred),
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAE: {:.3} | RMSE: {:.3} | R²: {:.3}", self.mae, self.rmse, self.r2)
    }
}

pub fn mae(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_true - y_pred).mapv(f64::abs).mean().unwrap_or(f64::NAN)
}

pub fn mse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_true - y_pred).mapv(|e| e * e).mean().unwrap_or(f64::NAN)
}

/// Coefficient of determination. A constant holdout target scores 1.0 when
/// predicted exactly and 0.0 otherwise.
pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let Some(mean) = y_true.mean() else {
        return f64::NAN;
    };
    let ss_res: f64 = (y_true - y_pred).mapv(|e| e * e).sum();
    let ss_tot: f64 = y_true.mapv(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
