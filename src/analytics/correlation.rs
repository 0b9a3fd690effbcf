use serde::Serialize;

use super::View;
use crate::data::Table;

/// Pairwise Pearson correlations, square over `columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()²` entries.
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    /// Correlation of two named columns.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }
}

/// Correlate every pair of numeric columns, using the rows where both are
/// present. Fewer than two numeric columns is `Absent`.
pub fn correlate(table: &Table) -> View<CorrelationMatrix> {
    let numeric: Vec<(&str, &[Option<f64>])> = table
        .iter()
        .filter_map(|(name, col)| col.as_numeric().map(|v| (name, v)))
        .collect();

    if numeric.len() < 2 {
        return View::Absent;
    }

    let n = numeric.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(numeric[i].1, numeric[j].1);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    View::Present(CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}

/// Pearson's r over pairwise-complete observations; NaN without variance.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn numeric(name: &str, v: &[f64]) -> (String, Column) {
        (name.into(), Column::Numeric(v.iter().copied().map(Some).collect()))
    }

    fn table(cols: Vec<(String, Column)>) -> Table {
        let (names, columns) = cols.into_iter().unzip();
        Table::new(names, columns).unwrap()
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let t = table(vec![
            numeric("x", &[1.0, 2.0, 3.0, 4.0]),
            numeric("y", &[2.0, 4.0, 6.0, 8.0]),
        ]);
        let corr = correlate(&t).present().unwrap();
        assert_eq!(corr.columns, vec!["x", "y"]);
        assert!((corr.between("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((corr.get(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn anti_correlated_columns() {
        let t = table(vec![
            numeric("x", &[1.0, 2.0, 3.0]),
            numeric("y", &[3.0, 2.0, 1.0]),
        ]);
        let corr = correlate(&t).present().unwrap();
        assert!((corr.between("y", "x").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_yields_nan() {
        let t = table(vec![
            numeric("x", &[1.0, 2.0, 3.0]),
            numeric("c", &[5.0, 5.0, 5.0]),
        ]);
        let corr = correlate(&t).present().unwrap();
        assert!(corr.between("x", "c").unwrap().is_nan());
    }

    #[test]
    fn uses_pairwise_complete_rows() {
        let t = Table::new(
            vec!["x".into(), "y".into()],
            vec![
                Column::Numeric(vec![Some(1.0), Some(2.0), None, Some(4.0)]),
                Column::Numeric(vec![Some(1.0), Some(2.0), Some(100.0), Some(4.0)]),
            ],
        )
        .unwrap();
        let r = correlate(&t).present().unwrap().between("x", "y").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_numeric_column_is_absent() {
        let t = table(vec![
            numeric("x", &[1.0, 2.0]),
            ("label".into(), Column::Text(vec![None, None])),
        ]);
        assert!(correlate(&t).is_absent());
    }
}
