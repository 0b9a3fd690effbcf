use std::sync::Arc;

use eframe::egui;
use rusty_lab::session::Session;

use crate::state::{ActiveTab, AppState};
use crate::ui::{explorer, matrix, panels, regression};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyLabApp {
    pub state: AppState,
}

impl RustyLabApp {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            state: AppState::new(session),
        }
    }
}

impl eframe::App for RustyLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: columns ----
        egui::SidePanel::left("column_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.tab {
                    ActiveTab::Explorer => explorer::explorer_tab(ui, &mut self.state),
                    ActiveTab::Regression => regression::regression_tab(ui, &mut self.state),
                    ActiveTab::Matrix => matrix::matrix_tab(ui, &mut self.state),
                });
        });
    }
}
