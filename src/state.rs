use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rusty_lab::analytics::{
    correlate, default_3d_axes, describe_numeric, plot_3d, CorrelationMatrix, Scatter3d, Summary,
    View,
};
use rusty_lab::data::{classify, loader, ColumnClassification, TableInfo};
use rusty_lab::matrix::{self, MatrixOp};
use rusty_lab::regression::Metrics;
use rusty_lab::session::{Session, Tab};

// ---------------------------------------------------------------------------
// Per-tab UI state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Explorer,
    Regression,
    Matrix,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 3] = [ActiveTab::Explorer, ActiveTab::Regression, ActiveTab::Matrix];

    pub fn label(self) -> &'static str {
        match self {
            ActiveTab::Explorer => "Data Explorer",
            ActiveTab::Regression => "Regression Lab",
            ActiveTab::Matrix => "Matrix Lab",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Histogram,
    Scatter,
}

/// Rotation applied to 3D scatters, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            yaw: 35.0,
            pitch: 25.0,
        }
    }
}

/// Derived views cached per loaded table.
pub struct ExplorerState {
    pub file_info: Option<String>,
    pub classification: ColumnClassification,
    pub summary: View<Summary>,
    pub correlation: View<CorrelationMatrix>,
    pub plot_kind: PlotKind,
    pub x_col: Option<String>,
    pub y_col: Option<String>,
    pub bins: usize,
    pub axes_3d: [Option<String>; 3],
    pub projection: Projection,
}

impl ExplorerState {
    fn new(bins: usize) -> Self {
        Self {
            file_info: None,
            classification: ColumnClassification::default(),
            summary: View::Absent,
            correlation: View::Absent,
            plot_kind: PlotKind::Histogram,
            x_col: None,
            y_col: None,
            bins,
            axes_3d: [None, None, None],
            projection: Projection::default(),
        }
    }
}

pub struct RegressionState {
    pub file_info: Option<String>,
    pub classification: ColumnClassification,
    /// Selected features, in selection order.
    pub features: Vec<String>,
    pub target: Option<String>,
    pub axes_3d: [Option<String>; 3],
    pub projection: Projection,
    pub metrics: Option<Metrics>,
    pub scatter: View<Scatter3d>,
    /// Raw text typed per model feature.
    pub inputs: BTreeMap<String, String>,
    pub prediction: Option<String>,
}

impl Default for RegressionState {
    fn default() -> Self {
        Self {
            file_info: None,
            classification: ColumnClassification::default(),
            features: Vec::new(),
            target: None,
            axes_3d: [None, None, None],
            projection: Projection::default(),
            metrics: None,
            scatter: View::Absent,
            inputs: BTreeMap::new(),
            prediction: None,
        }
    }
}

#[derive(Default)]
pub struct MatrixState {
    pub a: String,
    pub b: String,
    pub op: Option<MatrixOp>,
    pub result: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub session: Arc<Session>,
    pub tab: ActiveTab,
    pub explorer: ExplorerState,
    pub regression: RegressionState,
    pub matrix: MatrixState,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(session: Arc<Session>) -> Self {
        let bins = session.config().histogram_bins;
        Self {
            session,
            tab: ActiveTab::Explorer,
            explorer: ExplorerState::new(bins),
            regression: RegressionState::default(),
            matrix: MatrixState::default(),
            status_message: None,
        }
    }

    pub fn preview_rows(&self) -> usize {
        self.session.config().preview_rows
    }

    /// Read a file and make it the table of `tab`.
    pub fn load_file(&mut self, tab: Tab, path: &Path) -> Result<()> {
        let table = loader::load_file(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let info = self.session.install_table(tab, table);
        self.on_table_loaded(tab, &filename, info);
        Ok(())
    }

    /// Rebuild the derived views of `tab` after its table changed.
    pub fn on_table_loaded(&mut self, tab: Tab, filename: &str, info: TableInfo) {
        let Some(table) = self.session.table(tab) else {
            return;
        };
        let classification = classify(&table);
        let file_info = format!("Loaded file: {filename} | {info}");

        match tab {
            Tab::Explorer => {
                let ex = &mut self.explorer;
                ex.summary = describe_numeric(&table);
                ex.correlation = correlate(&table);
                ex.x_col = None;
                ex.y_col = None;
                ex.axes_3d = [None, None, None];
                ex.classification = classification;
                ex.file_info = Some(file_info);
            }
            Tab::Regression => {
                self.regression = RegressionState {
                    file_info: Some(file_info),
                    classification,
                    ..RegressionState::default()
                };
            }
        }
        self.status_message = None;
    }

    /// Add or remove a feature from the selection.
    pub fn toggle_feature(&mut self, column: &str) {
        let features = &mut self.regression.features;
        if let Some(pos) = features.iter().position(|f| f == column) {
            features.remove(pos);
        } else {
            features.push(column.to_string());
        }
    }

    pub fn train(&mut self) -> rusty_lab::Result<()> {
        let reg = &mut self.regression;
        let metrics = self.session.train(&reg.features, reg.target.as_deref())?;
        reg.metrics = Some(metrics);
        reg.prediction = None;

        if let Some(model) = self.session.model() {
            reg.inputs = model
                .features()
                .iter()
                .map(|f| (f.clone(), String::new()))
                .collect();
        }

        // Explicit axes win; otherwise the first three numeric columns.
        let axes = match &reg.axes_3d {
            [Some(x), Some(y), Some(z)] => Some([x.clone(), y.clone(), z.clone()]),
            _ => default_3d_axes(&reg.classification),
        };
        reg.scatter = match (self.session.table(Tab::Regression), axes) {
            (Some(table), Some([x, y, z])) => {
                plot_3d(&table, Some(&x), Some(&y), Some(&z), reg.target.as_deref())
            }
            _ => View::Absent,
        };
        Ok(())
    }

    /// Predict from the typed inputs; blank, unparsable or non-finite text
    /// is missing.
    pub fn predict(&mut self) -> rusty_lab::Result<()> {
        let Some(model) = self.session.model() else {
            return Err(rusty_lab::LabError::NotTrained);
        };
        let values: Vec<Option<f64>> = model
            .features()
            .iter()
            .map(|f| {
                self.regression
                    .inputs
                    .get(f)
                    .and_then(|text| text.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect();

        let prediction = self.session.predict(&values)?;
        self.regression.prediction =
            Some(format!("Predicted {}: {prediction:.4}", model.target()));
        Ok(())
    }

    pub fn compute_matrix(&mut self) {
        let m = &mut self.matrix;
        let text = match m.op {
            None => "Select an operation.".to_string(),
            Some(op) => match matrix::compute(op, &m.a, Some(&m.b)) {
                Ok(output) => output.to_string(),
                Err(e) => format!("Error: {e}"),
            },
        };
        m.result = Some(text);
    }

    /// Report a failed action in the status bar.
    pub fn report(&mut self, action: &str, err: impl std::fmt::Display) {
        log::error!("{action} failed: {err:#}");
        self.status_message = Some(format!("{action}: {err:#}"));
    }
}
