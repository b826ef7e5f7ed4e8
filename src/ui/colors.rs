use crate::theme::Theme;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub text: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub rating: Color,
    pub error_bg: Color,
    pub error_fg: Color,
}

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(250, 250, 248),
    text: Color::Rgb(30, 30, 30),
    text_dim: Color::Rgb(110, 110, 110),
    accent: Color::Rgb(1, 120, 200),    // TMDB blue, darkened for contrast
    border: Color::Rgb(190, 190, 190),
    highlight_bg: Color::Rgb(210, 232, 250),
    highlight_fg: Color::Rgb(10, 10, 10),
    rating: Color::Rgb(180, 120, 0),
    error_bg: Color::Rgb(255, 225, 225),
    error_fg: Color::Rgb(150, 0, 0),
};

pub const DARK: Palette = Palette {
    bg: Color::Rgb(13, 37, 63),         // TMDB navy
    text: Color::Rgb(235, 235, 235),
    text_dim: Color::Rgb(150, 160, 170),
    accent: Color::Rgb(1, 180, 228),
    border: Color::Rgb(60, 80, 100),
    highlight_bg: Color::Rgb(30, 70, 110),
    highlight_fg: Color::White,
    rating: Color::Rgb(144, 206, 161),
    error_bg: Color::Rgb(80, 0, 0),
    error_fg: Color::Rgb(255, 200, 200),
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

/// Rating colour bands: 8+ strong, under 5 dimmed
pub fn rating_color(p: &Palette, rating: Option<f64>) -> Color {
    match rating {
        Some(r) if r >= 8.0 => p.rating,
        Some(r) if r >= 5.0 => p.text,
        _ => p.text_dim,
    }
}
