use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::GameTypeFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Season selector (ascending; newest preselected on load) ----
    ui.strong("Season");
    let selected_season = state.selection.season;
    egui::ComboBox::from_id_salt("season")
        .selected_text(
            selected_season
                .map(|s| s.to_string())
                .unwrap_or_default(),
        )
        .show_ui(ui, |ui: &mut Ui| {
            for &season in dataset.seasons() {
                if ui
                    .selectable_label(selected_season == Some(season), season.to_string())
                    .clicked()
                {
                    state.select_season(season);
                }
            }
        });
    ui.add_space(8.0);

    // ---- Team selector (scoped to the selected season) ----
    ui.strong("Team");
    let teams = selected_season
        .map(|s| dataset.teams_for_season(s))
        .unwrap_or_default();
    let selected_team = state.selection.team.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("team")
        .selected_text(&selected_team)
        .show_ui(ui, |ui: &mut Ui| {
            for team in &teams {
                if ui.selectable_label(selected_team == *team, team).clicked() {
                    state.select_team(team.clone());
                }
            }
        });
    ui.add_space(8.0);

    // ---- Game type (pill row) ----
    ui.strong("Game type");
    ui.horizontal(|ui: &mut Ui| {
        for filter in GameTypeFilter::ALL {
            if ui
                .selectable_label(state.selection.game_type == filter, filter.to_string())
                .clicked()
            {
                state.select_game_type(filter);
            }
        }
    });

    ui.separator();
    if let Some(path) = &state.source_path {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ui.label(RichText::new(format!("Dataset: {name}")).weak());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} games loaded", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open game log")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
