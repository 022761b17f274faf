//! Frame shared by the chat confirmation dialogs: a centered box over a
//! dimmed screen, sized to its body text, with rows reserved at the bottom
//! for an optional title field and the button bar.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::ui::UiFrame;

const MIN_WIDTH: u16 = 24;
const MAX_WIDTH: u16 = 56;
/// Border plus one column of padding on each side.
const H_CHROME: u16 = 4;
const V_CHROME: u16 = 2;

/// Where each part of a dialog goes for one paint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub frame: Rect,
    pub body: Rect,
    pub input: Option<Rect>,
    pub separator: Rect,
    pub buttons: Rect,
}

#[derive(Debug, Clone)]
pub struct DialogOverlayComponent {
    title: String,
}

impl DialogOverlayComponent {
    pub fn new() -> Self {
        Self {
            title: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Fit the dialog into `area`. The box is as wide as the longest body
    /// line, the title or the button bar (whichever is widest, capped at the
    /// max width) and as tall as the wrapped body plus the reserved rows.
    /// Returns `None` when `area` cannot hold even one body row.
    pub fn layout(
        &self,
        area: Rect,
        body: &str,
        with_input: bool,
        buttons_width: u16,
    ) -> Option<DialogLayout> {
        let title_w = text_width(&self.title).saturating_add(2);
        let body_w = body.lines().map(text_width).max().unwrap_or(0);
        let width = body_w
            .max(title_w)
            .max(buttons_width)
            .saturating_add(H_CHROME)
            .max(MIN_WIDTH)
            .min(MAX_WIDTH)
            .min(area.width);
        if width <= H_CHROME {
            return None;
        }
        let content_w = width - H_CHROME;
        let reserved = 2 + u16::from(with_input);
        let wanted = wrapped_rows(body, content_w)
            .max(1)
            .saturating_add(reserved)
            .saturating_add(V_CHROME);
        let height = wanted.min(area.height);
        if height < reserved + V_CHROME + 1 {
            return None;
        }

        let frame = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        let content = Rect::new(frame.x + 2, frame.y + 1, content_w, height - V_CHROME);
        let bottom = content.y + content.height;
        let row = |y: u16| Rect::new(content.x, y, content_w, 1);
        Some(DialogLayout {
            frame,
            body: Rect::new(content.x, content.y, content_w, content.height - reserved),
            input: with_input.then(|| row(bottom - 3)),
            separator: row(bottom - 2),
            buttons: row(bottom - 1),
        })
    }

    /// Dim `screen`, clear the box and draw its border and title.
    pub fn render_frame(&self, frame: &mut UiFrame<'_>, layout: &DialogLayout, screen: Rect) {
        frame.dim_area(screen);
        frame.render_widget(Clear, layout.frame);
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(crate::theme::dialog_fg())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(crate::theme::menu_border()))
            .style(Style::default().bg(crate::theme::dialog_bg()));
        frame.render_widget(block, layout.frame);
    }
}

impl Default for DialogOverlayComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

/// Rows `text` needs when word-wrapped to `width` columns.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut rows = 0usize;
    for line in text.lines() {
        rows += 1;
        let mut used = 0usize;
        for word in line.split_whitespace() {
            let len = word.chars().count();
            if used > 0 && used + 1 + len <= width {
                used += 1 + len;
                continue;
            }
            if used > 0 {
                rows += 1;
            }
            // words longer than a row are broken across rows
            let extra = len.saturating_sub(1) / width;
            rows += extra;
            used = len - extra * width;
        }
    }
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn dialog(title: &str) -> DialogOverlayComponent {
        let mut d = DialogOverlayComponent::new();
        d.set_title(title);
        d
    }

    #[test]
    fn wraps_words_and_breaks_long_ones() {
        assert_eq!(wrapped_rows("", 10), 0);
        assert_eq!(wrapped_rows("one two", 10), 1);
        assert_eq!(wrapped_rows("one two three", 10), 2);
        assert_eq!(wrapped_rows("abcdefghijklmnopqrstuvwxy", 10), 3);
        assert_eq!(wrapped_rows("a\nb", 10), 2);
    }

    #[test]
    fn delete_dialog_fits_its_body() {
        let area = Rect::new(0, 0, 80, 24);
        let body = "Delete \"General\"? This cannot be undone.";
        let layout = dialog("Delete chat").layout(area, body, false, 21).expect("fits");
        assert_eq!(layout.frame.width, body.chars().count() as u16 + H_CHROME);
        assert_eq!(layout.frame.height, 1 + 2 + V_CHROME);
        assert_eq!(layout.frame.x, (80 - layout.frame.width) / 2);
        assert_eq!(layout.input, None);
        assert_eq!(layout.body.height, 1);
        assert_eq!(layout.separator.y, layout.body.y + 1);
        assert_eq!(layout.buttons.y, layout.frame.bottom() - 2);
    }

    #[test]
    fn rename_dialog_reserves_the_title_row() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = dialog("Rename chat")
            .layout(area, "Enter a new title (1-50 characters).", true, 21)
            .expect("fits");
        let input = layout.input.expect("input row");
        assert_eq!(input.y + 1, layout.separator.y);
        assert_eq!(layout.separator.y + 1, layout.buttons.y);
        assert_eq!(input.width, layout.body.width);
    }

    #[test]
    fn narrow_terminal_wraps_and_clamps() {
        let area = Rect::new(0, 0, 30, 24);
        let body = "Delete \"Release planning\"? This cannot be undone.";
        let layout = dialog("Delete chat").layout(area, body, false, 21).expect("fits");
        assert_eq!(layout.frame.width, 30);
        assert!(layout.body.height >= 2);
        assert!(dialog("x").layout(Rect::new(0, 0, 30, 4), body, true, 21).is_none());
    }

    #[test]
    fn frame_dims_the_screen_and_shows_the_title() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        let d = dialog("Delete chat");
        let layout = d.layout(area, "Sure?", false, 21).expect("fits");
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            d.render_frame(&mut frame, &layout, area);
        }
        assert!(buf[(0, 0)].modifier.contains(Modifier::DIM));
        let title_x = layout.frame.x + 2;
        assert_eq!(buf[(title_x, layout.frame.y)].symbol(), "D");
    }
}
