use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over platform differences in key reporting before events reach
/// the key bindings.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_held: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for events that should be dropped.
    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        let Event::Key(mut key) = evt else {
            return Some(evt);
        };
        match key.kind {
            KeyEventKind::Release => {
                if key.code == KeyCode::Esc {
                    self.esc_held = false;
                }
                return None;
            }
            // Auto-repeated Esc would close a menu and whatever sits below it.
            KeyEventKind::Repeat if key.code == KeyCode::Esc => return None,
            KeyEventKind::Press if key.code == KeyCode::Esc && cfg!(windows) => {
                if self.esc_held {
                    return None;
                }
                self.esc_held = true;
            }
            _ => {}
        }
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        // Shifted letters arrive already upper-cased.
        if let KeyCode::Char(c) = key.code
            && !c.is_ascii_lowercase()
            && key.modifiers == KeyModifiers::SHIFT
        {
            key.modifiers = KeyModifiers::NONE;
        }
        Some(Event::Key(key))
    }
}
