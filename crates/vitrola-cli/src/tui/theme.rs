//! Vitrola color theme

use palette::{Hsv, IntoColor, Srgb};
use ratatui::style::Color;

/// Colors for every surface the jukebox draws.
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_color: Color,
    pub stage_bg_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub dim_color: Color,
    pub accent_color: Color,
    pub marquee_color: Color,
    pub timer_color: Color,
    pub selection_bg_color: Color,
    pub selection_fg_color: Color,
    pub warning_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let accent = Color::Rgb(233, 160, 62);
        Self {
            bg_color: Color::Rgb(16, 14, 28),
            stage_bg_color: Color::Rgb(24, 20, 40),
            border_color: Color::Rgb(90, 78, 130),
            text_color: Color::Rgb(222, 216, 238),
            dim_color: Color::Rgb(120, 110, 150),
            accent_color: accent,
            marquee_color: Color::Rgb(255, 214, 140),
            timer_color: Color::Rgb(160, 220, 170),
            selection_bg_color: dim_rgb(accent, 0.35),
            selection_fg_color: Color::Rgb(20, 16, 10),
            warning_color: Color::Rgb(230, 180, 80),
        }
    }
}

/// Darken an RGB color by scaling its HSV value; non-RGB colors pass
/// through unchanged.
pub fn dim_rgb(color: Color, factor: f32) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };

    let base = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let mut hsv: Hsv = base.into_color();
    hsv.value = (hsv.value * factor).clamp(0.0, 1.0);
    let rgb: Srgb = hsv.into_color();

    Color::Rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
