mod app;
mod color;
mod state;
mod ui;

use app::RustyLabApp;
use eframe::egui;
use rusty_lab::config::LabConfig;
use rusty_lab::session::SessionManager;

fn main() -> eframe::Result {
    env_logger::init();

    let config = LabConfig::load().unwrap_or_else(|e| {
        log::error!("Falling back to default configuration: {e:#}");
        LabConfig::default()
    });
    let sessions = SessionManager::new(config);
    let session = sessions.create();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Lab – Multi-Tab Data Science",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyLabApp::new(session)))),
    )
}
