//! Named render fragments.
//!
//! Overlays never hard-code their look; before they draw they ask the host's
//! [`Templates`] for the fragments they need. A registry missing a fragment is
//! how a broken theme surfaces, and the overlay refuses to open rather than
//! paint half a widget.

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

use crate::error::OverlayError;

pub const MENU_ITEM: &str = "menu-item";
pub const MENU_SEPARATOR: &str = "menu-separator";
pub const TOAST: &str = "toast";

/// A named piece of presentation: base style plus an accent for highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub style: Style,
    pub accent: Style,
}

impl Fragment {
    pub const fn new(style: Style, accent: Style) -> Self {
        Self { style, accent }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Templates {
    fragments: HashMap<&'static str, Fragment>,
}

impl Templates {
    /// An empty registry. Nothing can render until fragments are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragments derived from the application theme.
    pub fn builtin() -> Self {
        let mut templates = Self::new();
        templates.insert(
            MENU_ITEM,
            Fragment::new(
                Style::default()
                    .fg(crate::theme::menu_fg())
                    .bg(crate::theme::menu_bg()),
                Style::default()
                    .fg(crate::theme::menu_selected_fg())
                    .bg(crate::theme::menu_selected_bg())
                    .add_modifier(Modifier::BOLD),
            ),
        );
        templates.insert(
            MENU_SEPARATOR,
            Fragment::new(
                Style::default()
                    .fg(crate::theme::dialog_separator())
                    .bg(crate::theme::menu_bg()),
                Style::default().fg(crate::theme::dialog_separator()),
            ),
        );
        templates.insert(
            TOAST,
            Fragment::new(
                Style::default()
                    .fg(crate::theme::toast_fg())
                    .bg(crate::theme::toast_bg()),
                Style::default().fg(Color::Reset).add_modifier(Modifier::BOLD),
            ),
        );
        templates
    }

    pub fn insert(&mut self, name: &'static str, fragment: Fragment) -> Option<Fragment> {
        self.fragments.insert(name, fragment)
    }

    pub fn remove(&mut self, name: &str) -> Option<Fragment> {
        self.fragments.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn require(&self, name: &'static str) -> Result<&Fragment, OverlayError> {
        self.fragments
            .get(name)
            .ok_or(OverlayError::MissingFragment(name))
    }
}
