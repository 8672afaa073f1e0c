mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::CourtsideApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // Optional game-log path as the first CLI argument; otherwise the user
    // opens one via File → Open.
    let initial_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    eframe::run_native(
        "Courtside – Win/Loss Trends",
        options,
        Box::new(move |_cc| {
            let mut state = AppState::default();
            if let Some(path) = &initial_path {
                state.open_path(path);
            }
            Ok(Box::new(CourtsideApp::new(state)))
        }),
    )
}
