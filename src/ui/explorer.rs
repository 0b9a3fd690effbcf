use eframe::egui::{self, RichText, Ui};
use rusty_lab::analytics::{self, ColumnSummary, Plot2dRequest, View};
use rusty_lab::session::Tab;

use super::{panels, plot};
use crate::state::{AppState, PlotKind, Projection};

/// Upload, preview, summary, correlation and the 2D / 3D plots.
pub fn explorer_tab(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("📂 Open CSV…").clicked() {
            panels::open_file_dialog(state, Tab::Explorer);
        }
        match &state.explorer.file_info {
            Some(info) => ui.label(info),
            None => ui.weak("No dataset loaded."),
        };
    });

    let Some(table) = state.session.table(Tab::Explorer) else {
        return;
    };

    ui.separator();
    ui.heading("Preview");
    let preview = table.preview(state.preview_rows());
    panels::string_table(ui, "explorer_preview", table.column_names(), &preview);

    ui.separator();
    ui.heading("Summary statistics");
    match &state.explorer.summary {
        View::Present(summary) => {
            let headers: Vec<String> = ColumnSummary::HEADERS.iter().map(|h| h.to_string()).collect();
            let rows: Vec<Vec<String>> = summary.columns.iter().map(|c| c.cells().to_vec()).collect();
            panels::string_table(ui, "explorer_summary", &headers, &rows);
        }
        View::Absent => {
            ui.label("No numeric columns to summarize.");
        }
    }

    ui.separator();
    ui.heading("Correlation");
    match &state.explorer.correlation {
        View::Present(corr) => plot::correlation_heatmap(ui, corr),
        View::Absent => {
            ui.label("At least two numeric columns are needed for a correlation matrix.");
        }
    }

    ui.separator();
    ui.heading("2D plot");
    let ex = &mut state.explorer;
    let numeric = ex.classification.numeric.clone();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.selectable_value(&mut ex.plot_kind, PlotKind::Histogram, "Histogram");
        ui.selectable_value(&mut ex.plot_kind, PlotKind::Scatter, "Scatter");
        ui.separator();
        panels::column_combo(ui, "explorer_x", "X:", &numeric, &mut ex.x_col);
        match ex.plot_kind {
            PlotKind::Histogram => {
                ui.label("Bins:");
                ui.add(egui::Slider::new(&mut ex.bins, 1..=100));
            }
            PlotKind::Scatter => {
                panels::column_combo(ui, "explorer_y", "Y:", &numeric, &mut ex.y_col);
            }
        }
    });

    let request = match ex.plot_kind {
        PlotKind::Histogram => Plot2dRequest::Histogram {
            column: ex.x_col.clone(),
            bins: ex.bins,
        },
        PlotKind::Scatter => Plot2dRequest::Scatter {
            x: ex.x_col.clone(),
            y: ex.y_col.clone(),
        },
    };
    plot::plot_2d(ui, "explorer_plot_2d", &analytics::plot_2d(&table, &request));

    ui.separator();
    ui.heading("3D scatter");
    axes_controls(ui, "explorer", &numeric, &mut ex.axes_3d, &mut ex.projection);
    let [x, y, z] = &ex.axes_3d;
    match analytics::plot_3d(&table, x.as_deref(), y.as_deref(), z.as_deref(), None) {
        View::Present(scatter) => plot::scatter_3d(ui, "explorer_plot_3d", &scatter, ex.projection),
        View::Absent => {
            ui.label("Select three numeric columns.");
        }
    }
}

/// Axis pickers and rotation sliders shared by the 3D scatters.
pub fn axes_controls(
    ui: &mut Ui,
    id: &str,
    options: &[String],
    axes: &mut [Option<String>; 3],
    projection: &mut Projection,
) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (axis, (label, selected)) in ["X:", "Y:", "Z:"].iter().zip(axes.iter_mut()).enumerate() {
            panels::column_combo(ui, &format!("{id}_axis_{axis}"), label, options, selected);
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Rotate").weak());
        ui.add(egui::Slider::new(&mut projection.yaw, -180.0..=180.0).text("yaw"));
        ui.add(egui::Slider::new(&mut projection.pitch, -90.0..=90.0).text("pitch"));
    });
}
