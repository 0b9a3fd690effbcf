use eframe::egui::{self, Color32, RichText, Ui};
use rusty_lab::analytics::View;
use rusty_lab::session::Tab;

use super::explorer::axes_controls;
use super::{panels, plot};
use crate::state::AppState;

pub fn regression_tab(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("📂 Open CSV…").clicked() {
            panels::open_file_dialog(state, Tab::Regression);
        }
        match &state.regression.file_info {
            Some(info) => ui.label(info),
            None => ui.weak("No dataset loaded."),
        };
    });

    if state.session.table(Tab::Regression).is_none() {
        return;
    }

    ui.separator();
    ui.heading("Model setup");
    let numeric = state.regression.classification.numeric.clone();

    ui.label("Features:");
    let mut toggled = None;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for col in &numeric {
            let mut checked = state.regression.features.contains(col);
            if ui.checkbox(&mut checked, col).changed() {
                toggled = Some(col.clone());
            }
        }
    });
    if let Some(col) = toggled {
        state.toggle_feature(&col);
    }

    ui.horizontal(|ui: &mut Ui| {
        panels::column_combo(ui, "regression_target", "Target:", &numeric, &mut state.regression.target);
    });

    ui.label("3D scatter axes (defaults to the first three numeric columns):");
    let reg = &mut state.regression;
    axes_controls(ui, "regression", &numeric, &mut reg.axes_3d, &mut reg.projection);

    if ui.button("▶ Train").clicked() {
        if let Err(e) = state.train() {
            state.report("Training", e);
        }
    }

    if let Some(metrics) = &state.regression.metrics {
        ui.label(RichText::new(metrics.to_string()).strong());
    }

    match &state.regression.scatter {
        View::Present(scatter) => {
            plot::scatter_3d(ui, "regression_plot_3d", scatter, state.regression.projection)
        }
        View::Absent if state.regression.metrics.is_some() => {
            ui.label("Select three numeric columns for the 3D scatter.");
        }
        View::Absent => {}
    }

    let Some(model) = state.session.model() else {
        return;
    };

    ui.separator();
    ui.heading("Predict");
    egui::Grid::new("prediction_inputs")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for feature in model.features() {
                ui.label(feature);
                let text = state.regression.inputs.entry(feature.clone()).or_default();
                ui.add(egui::TextEdit::singleline(text).desired_width(120.0));
                ui.end_row();
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Predict").clicked() {
            if let Err(e) = state.predict() {
                state.regression.prediction = None;
                state.report("Prediction", e);
            }
        }
        if ui.button("💾 Export model…").clicked() {
            panels::export_model_dialog(state);
        }
    });

    if let Some(prediction) = &state.regression.prediction {
        ui.label(RichText::new(prediction).strong().color(Color32::LIGHT_GREEN));
    }
}
