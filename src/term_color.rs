use std::sync::OnceLock;

use ratatui::style::Color;

/// What the attached terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    TrueColor,
    Indexed256,
}

impl ColorSupport {
    /// Interpret a `COLORTERM` value.
    pub fn from_colorterm(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase) {
            Some(v) if v.contains("truecolor") || v.contains("24bit") => ColorSupport::TrueColor,
            _ => ColorSupport::Indexed256,
        }
    }

    /// Detected once per process from the environment.
    pub fn detect() -> Self {
        static SUPPORT: OnceLock<ColorSupport> = OnceLock::new();
        *SUPPORT.get_or_init(|| {
            let value = std::env::var("COLORTERM").ok();
            ColorSupport::from_colorterm(value.as_deref())
        })
    }
}

/// Map an RGB triple to a color the current terminal supports.
pub fn map_rgb_to_color(r: u8, g: u8, b: u8) -> Color {
    map_rgb(r, g, b, ColorSupport::detect())
}

pub fn map_rgb(r: u8, g: u8, b: u8, support: ColorSupport) -> Color {
    match support {
        ColorSupport::TrueColor => Color::Rgb(r, g, b),
        ColorSupport::Indexed256 => Color::Indexed(xterm_index(r, g, b)),
    }
}

// Channel levels of the xterm 6x6x6 cube (indices 16..=231).
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn nearest_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, level)| (**level as i32 - v as i32).unsigned_abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

// Gray ramp 232..=255 covers 8, 18, ..., 238.
fn gray_value(step: u8) -> u8 {
    8 + step * 10
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

fn xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let (ri, gi, bi) = (nearest_level(r), nearest_level(g), nearest_level(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let step = (avg.saturating_sub(3) / 10).min(23) as u8;
    let gray = gray_value(step);

    if distance_sq((r, g, b), (gray, gray, gray)) < distance_sq((r, g, b), cube) {
        232 + step
    } else {
        cube_index as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorterm_detection() {
        assert_eq!(
            ColorSupport::from_colorterm(Some("truecolor")),
            ColorSupport::TrueColor
        );
        assert_eq!(
            ColorSupport::from_colorterm(Some("24BIT")),
            ColorSupport::TrueColor
        );
        assert_eq!(
            ColorSupport::from_colorterm(Some("xterm")),
            ColorSupport::Indexed256
        );
        assert_eq!(ColorSupport::from_colorterm(None), ColorSupport::Indexed256);
    }

    #[test]
    fn truecolor_passes_rgb_through() {
        assert_eq!(
            map_rgb(220, 53, 69, ColorSupport::TrueColor),
            Color::Rgb(220, 53, 69)
        );
    }

    #[test]
    fn cube_corners_map_exactly() {
        assert_eq!(xterm_index(255, 0, 0), 196);
        assert_eq!(xterm_index(0, 0, 255), 21);
        assert_eq!(xterm_index(95, 135, 175), 16 + 36 + 12 + 3);
    }

    #[test]
    fn mid_grays_prefer_the_ramp() {
        let idx = xterm_index(128, 128, 128);
        assert!((232..=255).contains(&idx), "got {idx}");
        assert_eq!(
            map_rgb(128, 128, 128, ColorSupport::Indexed256),
            Color::Indexed(idx)
        );
    }
}
