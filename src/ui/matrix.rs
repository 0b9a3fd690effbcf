use eframe::egui::{self, RichText, Ui};
use rusty_lab::matrix::MatrixOp;

use crate::state::AppState;

pub fn matrix_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Matrix Lab");
    ui.label("One row per line, values separated by commas.");

    let m = &mut state.matrix;
    ui.columns(2, |columns| {
        columns[0].label("Matrix A");
        columns[0].add(
            egui::TextEdit::multiline(&mut m.a)
                .hint_text("1,2\n3,4")
                .code_editor()
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        columns[1].label("Matrix B");
        columns[1].add(
            egui::TextEdit::multiline(&mut m.b)
                .hint_text("5,6\n7,8")
                .code_editor()
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
    });

    let mut compute = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Operation:");
        egui::ComboBox::from_id_salt("matrix_op")
            .selected_text(m.op.map_or("Select an operation", MatrixOp::label))
            .show_ui(ui, |ui: &mut Ui| {
                for op in MatrixOp::ALL {
                    ui.selectable_value(&mut m.op, Some(op), op.label());
                }
            });
        compute = ui.button("Compute").clicked();
    });
    if compute {
        state.compute_matrix();
    }

    if let Some(result) = &state.matrix.result {
        ui.separator();
        ui.label(RichText::new(result).monospace());
    }
}
