use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use rusty_lab::session::Tab;

use crate::state::{ActiveTab, AppState};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, tab selector and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let target = data_tab(state.tab);
            if ui
                .add_enabled(target.is_some(), egui::Button::new("Open CSV…"))
                .clicked()
            {
                if let Some(tab) = target {
                    open_file_dialog(state, tab);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in ActiveTab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// The session table a UI tab loads into, if any.
pub fn data_tab(tab: ActiveTab) -> Option<Tab> {
    match tab {
        ActiveTab::Explorer => Some(Tab::Explorer),
        ActiveTab::Regression => Some(Tab::Regression),
        ActiveTab::Matrix => None,
    }
}

// ---------------------------------------------------------------------------
// Left side panel – columns of the active tab's table
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    let classification = match state.tab {
        ActiveTab::Explorer => &state.explorer.classification,
        ActiveTab::Regression => &state.regression.classification,
        ActiveTab::Matrix => {
            ui.label("Matrices are entered as text.");
            return;
        }
    };

    if classification.numeric.is_empty() && classification.other.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(
                RichText::new(format!("Numeric ({})", classification.numeric.len())).strong(),
            )
            .id_salt("numeric_columns")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for col in &classification.numeric {
                    ui.label(col);
                }
            });

            egui::CollapsingHeader::new(
                RichText::new(format!("Other ({})", classification.other.len())).strong(),
            )
            .id_salt("other_columns")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for col in &classification.other {
                    ui.label(RichText::new(col).weak());
                }
            });

            if state.tab == ActiveTab::Regression {
                if let Some(model) = state.session.model() {
                    ui.separator();
                    ui.strong(format!("Model → {}", model.target()));
                    let ridge = model.ridge();
                    for (name, coef) in model.features().iter().zip(ridge.coefficients()) {
                        ui.monospace(format!("{name}: {coef:+.4}"));
                    }
                    ui.monospace(format!("intercept: {:+.4}", ridge.intercept()));
                    let (n_train, n_test) = model.partition_sizes();
                    ui.small(format!("{n_train} train / {n_test} holdout rows"));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// Combo box over column names; the empty entry clears the selection.
pub fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: &mut Option<String>,
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_deref().unwrap_or("—"))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut *selected, None, "—");
            for opt in options {
                ui.selectable_value(&mut *selected, Some(opt.clone()), opt);
            }
        });
}

/// A striped, resizable table of strings.
pub fn string_table(ui: &mut Ui, id: &str, headers: &[String], rows: &[Vec<String>]) {
    ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        ui.push_id(id, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0), headers.len())
                .header(20.0, |mut header| {
                    for h in headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(h);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(18.0, |mut table_row| {
                            for cell in row {
                                table_row.col(|ui: &mut Ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, tab: Tab) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV data")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        match state.load_file(tab, &path) {
            Ok(()) => log::info!("Loaded {} into {tab}", path.display()),
            Err(e) => state.report("Loading file", e),
        }
    }
}

pub fn export_model_dialog(state: &mut AppState) {
    let Some(model) = state.session.model() else {
        state.report("Exporting model", rusty_lab::LabError::NotTrained);
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export model")
        .set_file_name("model.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = model.save_json(&path) {
            state.report("Exporting model", e);
        }
    }
}
