use chrono::{Datelike, NaiveDate};
use eframe::egui::{Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Polygon};

use crate::color;
use crate::data::filter::{ChartAxis, FilteredGame, FilteredView};

// ---------------------------------------------------------------------------
// Cumulative win/loss line chart
// ---------------------------------------------------------------------------

/// Render the cumulative wins and losses over the filtered games.
pub fn cumulative_chart(ui: &mut Ui, view: &FilteredView) {
    let axis = view.axis;
    let wins = series(view, |g| g.cumulative_wins);
    let losses = series(view, |g| g.cumulative_losses);

    let mut plot = Plot::new("cumulative_chart")
        .legend(Legend::default())
        .height(320.0)
        .y_axis_label("Games")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    plot = match axis {
        ChartAxis::SeasonGame => plot.x_axis_label("Game #"),
        ChartAxis::GameDate => plot
            .x_axis_label("Date")
            .x_axis_formatter(|mark, _range| format_day_number(mark.value)),
    };

    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(wins)
                .name("Cumulative wins")
                .color(color::WIN_COLOR)
                .width(1.5),
        );
        plot_ui.line(
            Line::new(losses)
                .name("Cumulative losses")
                .color(color::LOSS_COLOR)
                .width(1.5),
        );
    });
}

/// Build one series over the view's axis.  Rows without an x-coordinate
/// (e.g. a null date under the date axis) cannot be placed and are skipped.
fn series(view: &FilteredView, y_of: impl Fn(&FilteredGame) -> u32) -> PlotPoints {
    view.games
        .iter()
        .filter_map(|g| x_value(g, view.axis).map(|x| [x, y_of(g) as f64]))
        .collect()
}

fn x_value(row: &FilteredGame, axis: ChartAxis) -> Option<f64> {
    match axis {
        ChartAxis::SeasonGame => row.game.seasongame.map(|n| n as f64),
        ChartAxis::GameDate => row.game.game_date.map(|d| d.num_days_from_ce() as f64),
    }
}

fn format_day_number(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Win/loss proportion chart
// ---------------------------------------------------------------------------

/// Two-slice proportion chart of total wins vs losses, same color mapping
/// as the line chart.
pub fn proportion_chart(ui: &mut Ui, wins: usize, losses: usize) {
    let total = wins + losses;
    if total == 0 {
        return;
    }
    let win_fraction = wins as f64 / total as f64;

    Plot::new("proportion_chart")
        .legend(Legend::default())
        .height(220.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            if let Some(slice) = pie_slice(0.0, win_fraction) {
                plot_ui.polygon(
                    slice
                        .name(format!("Wins ({wins})"))
                        .fill_color(color::dimmed(color::WIN_COLOR, 0.9))
                        .stroke(Stroke::new(1.0, color::WIN_COLOR)),
                );
            }
            if let Some(slice) = pie_slice(win_fraction, 1.0) {
                plot_ui.polygon(
                    slice
                        .name(format!("Losses ({losses})"))
                        .fill_color(color::dimmed(color::LOSS_COLOR, 0.9))
                        .stroke(Stroke::new(1.0, color::LOSS_COLOR)),
                );
            }
        });
}

/// One pie slice as a polygon: the unit-circle arc from `from` to `to`
/// (fractions of a full turn, clockwise from 12 o'clock) plus the center.
fn pie_slice(from: f64, to: f64) -> Option<Polygon<'static>> {
    if to - from <= f64::EPSILON {
        return None;
    }
    let steps = (((to - from) * 64.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let t = from + (to - from) * i as f64 / steps as f64;
        let angle = std::f64::consts::FRAC_PI_2 - t * std::f64::consts::TAU;
        points.push([angle.cos(), angle.sin()]);
    }
    Some(Polygon::new(PlotPoints::from(points)))
}
