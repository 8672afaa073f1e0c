use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::GameResult;

// ---------------------------------------------------------------------------
// Fixed series colors
// ---------------------------------------------------------------------------

/// Wins are green and losses red everywhere in the dashboard: the line
/// chart, the proportion chart and the table result column all share these.
pub const WIN_COLOR: Color32 = Color32::from_rgb(0x53, 0xed, 0x6a);
pub const LOSS_COLOR: Color32 = Color32::from_rgb(0xe4, 0x31, 0x31);

pub fn result_color(result: GameResult) -> Color32 {
    if result.is_win() {
        WIN_COLOR
    } else {
        LOSS_COLOR
    }
}

/// Scale a color's lightness, for fills that sit behind the full-strength
/// stroke (proportion-chart slices).
pub fn dimmed(color: Color32, factor: f32) -> Color32 {
    let srgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = srgb.into_color();
    hsl.lightness = (hsl.lightness * factor).clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
