use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::filter::{FilteredView, ViewSummary, RECENT_GAMES_CAP};

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

/// The scalar metric tiles.  The win-rate tile is omitted entirely when no
/// games survived the filter (never a division by zero).
pub fn metrics_row(ui: &mut Ui, summary: &ViewSummary) {
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Games", summary.games.to_string());
        metric(ui, "Wins", summary.wins.to_string());
        metric(ui, "Losses", summary.losses.to_string());
        if let Some(rate) = summary.win_rate {
            metric(ui, "Win rate", format!("{rate:.2}%"));
        }
    });
}

fn metric(ui: &mut Ui, caption: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(caption).weak());
        ui.label(RichText::new(value).size(22.0).strong());
    });
    ui.add_space(24.0);
}

// ---------------------------------------------------------------------------
// Recent-games table
// ---------------------------------------------------------------------------

const TABLE_COLUMNS: [&str; 9] = [
    "Season", "Game #", "Date", "Team", "Result", "Type", "PTS", "Opponent", "Opp PTS",
];

/// The latest games of the current view, newest first, capped at
/// [`RECENT_GAMES_CAP`] rows.
pub fn recent_games_table(ui: &mut Ui, view: &FilteredView) {
    let rows = view.recent_games(RECENT_GAMES_CAP);

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto(), TABLE_COLUMNS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in TABLE_COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &rows {
                let game = &row.game;
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(game.season.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(opt_text(game.seasongame.map(|n| n.to_string())));
                    });
                    table_row.col(|ui| {
                        ui.label(opt_text(
                            game.game_date.map(|d| d.format("%Y-%m-%d").to_string()),
                        ));
                    });
                    table_row.col(|ui| {
                        ui.label(&game.team);
                    });
                    table_row.col(|ui| {
                        ui.label(
                            RichText::new(game.result.to_string())
                                .color(color::result_color(game.result))
                                .strong(),
                        );
                    });
                    table_row.col(|ui| {
                        ui.label(game.game_type.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(opt_text(game.pts.clone()));
                    });
                    table_row.col(|ui| {
                        ui.label(opt_text(game.opp_id.clone()));
                    });
                    table_row.col(|ui| {
                        ui.label(opt_text(game.opp_pts.clone()));
                    });
                });
            }
        });
}

fn opt_text(value: Option<String>) -> String {
    value.unwrap_or_else(|| "–".to_string())
}
