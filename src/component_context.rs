//! Per-call state handed to plain `Component`s.

use ratatui::layout::Rect;

/// Focus flag plus the full screen area, so a dialog can dim
/// everything behind it even when it is given a smaller area to draw into.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    screen: Rect,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            screen: Rect::new(0, 0, 0, 0),
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn screen(&self) -> Rect {
        self.screen
    }

    pub const fn with_screen(mut self, screen: Rect) -> Self {
        self.screen = screen;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let ctx = ComponentContext::new(true)
            .with_screen(Rect::new(0, 0, 80, 24));
        assert!(ctx.focused());
        assert_eq!(ctx.screen().width, 80);
        assert!(!ComponentContext::default().focused());
    }
}
