//! Pure views over a [`Table`](crate::data::Table).
//!
//! No view fails: insufficient or unsuitable columns yield [`View::Absent`],
//! which is distinct from an error.

mod correlation;
mod stats;
mod views;

pub use correlation::{correlate, CorrelationMatrix};
pub use stats::{describe_numeric, ColumnSummary, Summary};
pub use views::{
    default_3d_axes, plot_2d, plot_3d, Histogram, Plot2d, Plot2dRequest, Scatter2d, Scatter3d,
};

/// The outcome of a view: a renderable artifact, or nothing to show.
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    Present(T),
    Absent,
}

impl<T> View<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, View::Absent)
    }

    pub fn present(self) -> Option<T> {
        match self {
            View::Present(v) => Some(v),
            View::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for View<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => View::Present(v),
            None => View::Absent,
        }
    }
}

/// Present values of a numeric series.
pub(crate) fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| *v)
}
