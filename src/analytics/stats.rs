use serde::Serialize;

use super::{present, View};
use crate::data::Table;

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Non-missing cells.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub const HEADERS: [&'static str; 9] =
        ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Cells in [`Self::HEADERS`] order, statistics rounded to 3 decimals.
    pub fn cells(&self) -> [String; 9] {
        let r = |v: f64| format!("{v:.3}");
        [
            self.column.clone(),
            self.count.to_string(),
            r(self.mean),
            r(self.std),
            r(self.min),
            r(self.q25),
            r(self.q50),
            r(self.q75),
            r(self.max),
        ]
    }
}

/// One [`ColumnSummary`] per numeric column, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

/// Summarize the numeric columns; `Absent` when there are none.
pub fn describe_numeric(table: &Table) -> View<Summary> {
    let columns: Vec<ColumnSummary> = table
        .iter()
        .filter_map(|(name, col)| col.as_numeric().map(|v| summarize(name, v)))
        .collect();

    if columns.is_empty() {
        View::Absent
    } else {
        View::Present(Summary { columns })
    }
}

fn summarize(name: &str, values: &[Option<f64>]) -> ColumnSummary {
    let mut sorted: Vec<f64> = present(values).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = if count == 0 {
        f64::NAN
    } else {
        sorted.iter().sum::<f64>() / count as f64
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    ColumnSummary {
        column: name.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear-interpolation quantile of an ascending slice.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}
