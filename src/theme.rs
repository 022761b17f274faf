use ratatui::style::Color;

use crate::components::toast::ToastVariant;

// Centralized theme colors. Keep these as small helpers so we can
// map RGB to the terminal-supported color via `crate::term_color` when
// appropriate.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);
pub const DANGER_RGB: (u8, u8, u8) = (220, 53, 69);
pub const SUCCESS_RGB: (u8, u8, u8) = (40, 167, 69);
pub const WARNING_RGB: (u8, u8, u8) = (255, 193, 7);
pub const INFO_RGB: (u8, u8, u8) = (23, 162, 184);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    crate::term_color::map_rgb_to_color(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

pub fn danger() -> Color {
    rgb_to_color(DANGER_RGB)
}

// Sidebar
pub fn panel_bg() -> Color {
    Color::DarkGray
}
pub fn panel_fg() -> Color {
    Color::White
}
pub fn panel_active_bg() -> Color {
    Color::Gray
}
pub fn panel_active_fg() -> Color {
    Color::Black
}

// Menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}
pub fn menu_border() -> Color {
    Color::Gray
}

// Toasts
pub fn toast_bg() -> Color {
    Color::Black
}
pub fn toast_fg() -> Color {
    Color::White
}
pub fn toast_accent(variant: ToastVariant) -> Color {
    match variant {
        ToastVariant::Success => rgb_to_color(SUCCESS_RGB),
        ToastVariant::Error => danger(),
        ToastVariant::Warning => rgb_to_color(WARNING_RGB),
        ToastVariant::Info => rgb_to_color(INFO_RGB),
    }
}

// Dialog / confirm
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn dialog_separator() -> Color {
    Color::DarkGray
}
pub fn button_selected_bg() -> Color {
    Color::Blue
}
pub fn button_selected_fg() -> Color {
    Color::White
}

// Debug log highlight
pub fn debug_highlight() -> Color {
    // Use accent alt for a bright highlight
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn is_mapped(c: Color) -> bool {
        matches!(c, Color::Rgb(_, _, _) | Color::Indexed(_))
    }

    #[test]
    fn accent_returns_a_color_variant() {
        assert!(is_mapped(accent()));
        assert!(is_mapped(accent_alt()));
    }

    #[test]
    fn every_toast_variant_has_a_mapped_accent() {
        for v in [
            ToastVariant::Success,
            ToastVariant::Error,
            ToastVariant::Warning,
            ToastVariant::Info,
        ] {
            assert!(is_mapped(toast_accent(v)), "{v:?}");
        }
        assert_eq!(toast_accent(ToastVariant::Error), danger());
    }
}
