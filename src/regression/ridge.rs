use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// L2-regularized linear regression with an unpenalized intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    alpha: f64,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl Ridge {
    /// Fit by solving `(XcᵀXc + αI) β = Xcᵀyc` on centred data, where the
    /// intercept absorbs the means.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self> {
        let n_features = x.ncols();
        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let y_mean = y.mean().unwrap_or(0.0);

        let xc = x - &x_mean;
        let yc = y - y_mean;

        let mut gram = xc.t().dot(&xc);
        for i in 0..n_features {
            gram[[i, i]] += alpha;
        }
        let rhs = xc.t().dot(&yc);

        let coefficients = cholesky_solve(&gram, &rhs).ok_or(LabError::SingularSystem)?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self {
            alpha,
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }

    pub fn predict_row(&self, row: &Array1<f64>) -> f64 {
        row.dot(&self.coefficients) + self.intercept
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve `A x = b` for symmetric positive-definite `A` via `A = L Lᵀ`.
/// Returns `None` when `A` is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let diag = a[[j, j]] - (0..j).map(|k| l[[j, k]].powi(2)).sum::<f64>();
        if diag.is_nan() || diag <= 0.0 {
            return None;
        }
        l[[j, j]] = diag.sqrt();
        for i in (j + 1)..n {
            let off = a[[i, j]] - (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum::<f64>();
            l[[i, j]] = off / l[[j, j]];
        }
    }

    // L w = b
    let mut w = Array1::<f64>::zeros(n);
    for i in 0..n {
        let s = (0..i).map(|k| l[[i, k]] * w[k]).sum::<f64>();
        w[i] = (b[i] - s) / l[[i, i]];
    }

    // Lᵀ x = w
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let s = ((i + 1)..n).map(|k| l[[k, i]] * x[k]).sum::<f64>();
        x[i] = (w[i] - s) / l[[i, i]];
    }
    Some(x)
}
