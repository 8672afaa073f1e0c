use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CourtsideApp {
    pub state: AppState,
}

impl CourtsideApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CourtsideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a game log to get started  (File → Open…)");
        });
        return;
    };

    if let (Some(team), Some(season)) = (&state.selection.team, state.selection.season) {
        ui.heading(format!("{team} — {season} season"));
    }
    ui.add_space(4.0);

    if view.is_empty() {
        ui.label(RichText::new("No games for this selection.").italics());
        return;
    }

    let summary = view.summary();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_top(|ui: &mut Ui| {
                let pie_width = 260.0;
                let chart_width = (ui.available_width() - pie_width - 16.0).max(320.0);
                ui.vertical(|ui: &mut Ui| {
                    ui.set_width(chart_width);
                    plot::cumulative_chart(ui, view);
                });
                ui.vertical(|ui: &mut Ui| {
                    ui.set_width(pie_width);
                    ui.strong("Win / loss share");
                    plot::proportion_chart(ui, summary.wins, summary.losses);
                });
            });

            ui.add_space(8.0);
            table::metrics_row(ui, &summary);
            ui.add_space(8.0);
            ui.separator();

            ui.strong("Latest games");
            ui.add_space(4.0);
            table::recent_games_table(ui, view);
        });
}
