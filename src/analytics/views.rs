use serde::Serialize;

use super::{present, View};
use crate::data::{ColumnClassification, Table};

// ---------------------------------------------------------------------------
// 2D views
// ---------------------------------------------------------------------------

/// What the 2D plot should show. Unselected axes are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Plot2dRequest {
    Histogram { column: Option<String>, bins: usize },
    Scatter { x: Option<String>, y: Option<String> },
}

/// Equal-width bins over the column's range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter2d {
    pub x: String,
    pub y: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Plot2d {
    Histogram(Histogram),
    Scatter(Scatter2d),
}

impl Plot2d {
    pub fn title(&self) -> String {
        match self {
            Plot2d::Histogram(h) => format!("Histogram of {}", h.column),
            Plot2d::Scatter(s) => format!("{} vs {}", s.x, s.y),
        }
    }
}

pub fn plot_2d(table: &Table, request: &Plot2dRequest) -> View<Plot2d> {
    match request {
        Plot2dRequest::Histogram { column, bins } => column
            .as_deref()
            .and_then(|c| histogram(table, c, *bins))
            .map(Plot2d::Histogram)
            .into(),
        Plot2dRequest::Scatter { x, y } => {
            let (Some(x), Some(y)) = (x.as_deref(), y.as_deref()) else {
                return View::Absent;
            };
            let (Some(xs), Some(ys)) = (table.numeric(x), table.numeric(y)) else {
                return View::Absent;
            };
            View::Present(Plot2d::Scatter(Scatter2d {
                x: x.to_string(),
                y: y.to_string(),
                points: xs
                    .iter()
                    .zip(ys)
                    .filter_map(|(a, b)| Some([(*a)?, (*b)?]))
                    .collect(),
            }))
        }
    }
}

fn histogram(table: &Table, column: &str, bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let values: Vec<f64> = present(table.numeric(column)?).collect();
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;

    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    // Divide before subtracting so ranges near f64::MAX stay finite.
    let width = hi / bins as f64 - lo / bins as f64;
    if !width.is_finite() || width <= 0.0 {
        return None;
    }

    let mut counts = vec![0usize; bins];
    for v in &values {
        // The last bin is closed on the right.
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram {
        column: column.to_string(),
        edges: (0..=bins).map(|i| lo + width * i as f64).collect(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// 3D view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3d {
    pub axes: [String; 3],
    pub points: Vec<[f64; 3]>,
    /// Colour column name, when the points carry colour values.
    pub color: Option<String>,
    /// One value per point when `color` is set, otherwise empty.
    pub color_values: Vec<f64>,
}

impl Scatter3d {
    pub fn title(&self) -> String {
        let [x, y, z] = &self.axes;
        format!("3D scatter: {x}, {y}, {z}")
    }
}

/// Scatter three numeric columns, optionally coloured by a fourth.
///
/// Any missing or non-numeric axis is `Absent`. A colour column that is not
/// numeric is ignored; rows missing a colour value are dropped.
pub fn plot_3d(
    table: &Table,
    x: Option<&str>,
    y: Option<&str>,
    z: Option<&str>,
    color: Option<&str>,
) -> View<Scatter3d> {
    let (Some(x), Some(y), Some(z)) = (x, y, z) else {
        return View::Absent;
    };
    let (Some(xs), Some(ys), Some(zs)) = (table.numeric(x), table.numeric(y), table.numeric(z))
    else {
        return View::Absent;
    };
    let color = color.and_then(|c| table.numeric(c).map(|v| (c, v)));

    let mut points = Vec::with_capacity(xs.len());
    let mut color_values = Vec::new();
    for row in 0..xs.len() {
        let (Some(a), Some(b), Some(c)) = (xs[row], ys[row], zs[row]) else {
            continue;
        };
        if let Some((_, values)) = color {
            let Some(v) = values[row] else {
                continue;
            };
            color_values.push(v);
        }
        points.push([a, b, c]);
    }

    View::Present(Scatter3d {
        axes: [x.to_string(), y.to_string(), z.to_string()],
        points,
        color: color.map(|(name, _)| name.to_string()),
        color_values,
    })
}

/// The first three numeric columns, if there are that many.
pub fn default_3d_axes(classification: &ColumnClassification) -> Option<[String; 3]> {
    match classification.numeric.as_slice() {
        [x, y, z, ..] => Some([x.clone(), y.clone(), z.clone()]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{classify, Column};

    fn table() -> Table {
        Table::new(
            vec!["a".into(), "b".into(), "label".into(), "c".into()],
            vec![
                Column::Numeric(vec![Some(0.0), Some(1.0), Some(2.0), Some(10.0)]),
                Column::Numeric(vec![Some(5.0), None, Some(7.0), Some(8.0)]),
                Column::Text(vec![Some("p".into()), None, None, None]),
                Column::Numeric(vec![Some(1.0), Some(1.0), Some(1.0), None]),
            ],
        )
        .unwrap()
    }

    fn hist(column: &str, bins: usize) -> View<Plot2d> {
        plot_2d(
            &table(),
            &Plot2dRequest::Histogram {
                column: Some(column.into()),
                bins,
            },
        )
    }

    #[test]
    fn histogram_counts_every_present_value() {
        let View::Present(Plot2d::Histogram(h)) = hist("a", 5) else {
            panic!("expected histogram");
        };
        assert_eq!(h.edges.len(), 6);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[5], 10.0);
        assert_eq!(h.bin_width(), 2.0);
        // 10.0 lands in the right-closed last bin.
        assert_eq!(h.counts, vec![2, 1, 0, 0, 1]);
    }

    #[test]
    fn constant_histogram_uses_unit_range() {
        let View::Present(Plot2d::Histogram(h)) = hist("c", 2) else {
            panic!("expected histogram");
        };
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        assert_eq!(h.edges.first(), Some(&0.5));
        assert_eq!(h.edges.last(), Some(&1.5));
    }

    #[test]
    fn histogram_of_extreme_range_has_finite_edges() {
        let t = Table::new(
            vec!["wide".into()],
            vec![Column::Numeric(vec![Some(-1e308), Some(0.0), Some(1e308)])],
        )
        .unwrap();
        let request = Plot2dRequest::Histogram {
            column: Some("wide".into()),
            bins: 4,
        };
        let View::Present(Plot2d::Histogram(h)) = plot_2d(&t, &request) else {
            panic!("expected histogram");
        };
        assert!(h.edges.iter().all(|e| e.is_finite()));
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[3], 1);
    }

    #[test]
    fn histogram_of_text_or_zero_bins_is_absent() {
        assert!(hist("label", 30).is_absent());
        assert!(hist("a", 0).is_absent());
        assert!(plot_2d(&table(), &Plot2dRequest::Histogram { column: None, bins: 30 }).is_absent());
    }

    #[test]
    fn scatter_skips_incomplete_pairs() {
        let req = Plot2dRequest::Scatter {
            x: Some("a".into()),
            y: Some("b".into()),
        };
        let View::Present(Plot2d::Scatter(s)) = plot_2d(&table(), &req) else {
            panic!("expected scatter");
        };
        assert_eq!(s.points, vec![[0.0, 5.0], [2.0, 7.0], [10.0, 8.0]]);
    }

    #[test]
    fn scatter_without_second_column_is_absent() {
        let req = Plot2dRequest::Scatter {
            x: Some("a".into()),
            y: None,
        };
        assert!(plot_2d(&table(), &req).is_absent());
    }

    #[test]
    fn scatter_3d_requires_three_numeric_axes() {
        let t = table();
        assert!(plot_3d(&t, Some("a"), Some("b"), None, None).is_absent());
        assert!(plot_3d(&t, Some("a"), Some("b"), Some("label"), None).is_absent());

        let s = plot_3d(&t, Some("a"), Some("b"), Some("c"), None).present().unwrap();
        assert_eq!(s.points, vec![[0.0, 5.0, 1.0], [2.0, 7.0, 1.0]]);
        assert!(s.color.is_none() && s.color_values.is_empty());
        assert_eq!(s.title(), "3D scatter: a, b, c");
    }

    #[test]
    fn scatter_3d_colours_by_numeric_column_only() {
        let t = table();
        let s = plot_3d(&t, Some("a"), Some("a"), Some("a"), Some("b")).present().unwrap();
        assert_eq!(s.color.as_deref(), Some("b"));
        assert_eq!(s.color_values, vec![5.0, 7.0, 8.0]);
        assert_eq!(s.points.len(), 3);

        let s = plot_3d(&t, Some("a"), Some("a"), Some("a"), Some("label")).present().unwrap();
        assert!(s.color.is_none());
        assert_eq!(s.points.len(), 4);
    }

    #[test]
    fn default_axes_are_first_three_numeric_columns() {
        let axes = default_3d_axes(&classify(&table())).unwrap();
        assert_eq!(axes, ["a".to_string(), "b".to_string(), "c".to_string()]);
    }
}
