use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};

use crate::components::{Component, ComponentContext, DialogOverlayComponent};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string};

/// Upper bound on an edited title, counted in characters.
pub const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
}

/// Two-button modal. Optionally carries a single-line text field whose value
/// must be 1..=TITLE_MAX_CHARS characters (after trimming) before Confirm is
/// accepted.
#[derive(Debug)]
pub struct ConfirmOverlayComponent {
    dialog: DialogOverlayComponent,
    keys: KeyBindings,
    visible: bool,
    body: String,
    confirm_label: String,
    input: Option<String>,
    selected_confirm: bool,
    cancel_rect: Option<Rect>,
    confirm_rect: Option<Rect>,
}

impl Default for ConfirmOverlayComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ConfirmOverlayComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.cancel_rect = None;
        self.confirm_rect = None;
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let cancel = "[ Cancel ]".to_string();
        let confirm = format!("[ {} ]", self.confirm_label);
        let cancel_w = cancel.chars().count() as u16;
        let confirm_w = confirm.chars().count() as u16;
        let buttons_w = cancel_w.saturating_add(1).saturating_add(confirm_w);
        let Some(layout) =
            self.dialog
                .layout(area, &self.body, self.input.is_some(), buttons_w)
        else {
            return;
        };
        let screen = if ctx.screen().is_empty() {
            area
        } else {
            ctx.screen()
        };
        self.dialog.render_frame(frame, &layout, screen);

        let paragraph = Paragraph::new(self.body.as_str())
            .alignment(Alignment::Left)
            .style(Style::default().fg(crate::theme::dialog_fg()))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, layout.body);

        let input_valid = self.input_valid();
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.is_empty() {
            return;
        }
        if let (Some(value), Some(row)) = (&self.input, layout.input) {
            let fg = if input_valid {
                crate::theme::dialog_fg()
            } else {
                crate::theme::danger()
            };
            let style = Style::default().fg(fg).add_modifier(Modifier::UNDERLINED);
            let shown = format!("> {value}▏");
            // keep the cursor end of a long title in view
            let width = row.width as usize;
            let skip = shown.chars().count().saturating_sub(width);
            let shown: String = shown.chars().skip(skip).collect();
            safe_set_string(buffer, bounds, row.x, row.y, &shown, style);
        }
        let separator = &layout.separator;
        let line = "─".repeat(separator.width as usize);
        let separator_style = Style::default().fg(crate::theme::dialog_separator());
        safe_set_string(buffer, bounds, separator.x, separator.y, &line, separator_style);

        let selected_style = Style::default()
            .fg(crate::theme::button_selected_fg())
            .bg(crate::theme::button_selected_bg())
            .add_modifier(Modifier::BOLD);
        let unselected_style = Style::default()
            .fg(crate::theme::dialog_fg())
            .bg(crate::theme::panel_bg());
        let (cancel_style, mut confirm_style) = if self.selected_confirm {
            (unselected_style, selected_style)
        } else {
            (selected_style, unselected_style)
        };
        if !input_valid {
            confirm_style = confirm_style.add_modifier(Modifier::DIM);
        }
        let buttons = layout.buttons;
        let start_x = buttons
            .x
            .saturating_add(buttons.width.saturating_sub(buttons_w));
        let confirm_x = start_x.saturating_add(cancel_w + 1);
        safe_set_string(buffer, bounds, start_x, buttons.y, &cancel, cancel_style);
        safe_set_string(buffer, bounds, confirm_x, buttons.y, &confirm, confirm_style);
        self.cancel_rect = Some(Rect::new(start_x, buttons.y, cancel_w, 1));
        self.confirm_rect = Some(Rect::new(confirm_x, buttons.y, confirm_w, 1));
    }

    /// Modal: while visible every key and mouse event is swallowed.
    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        if !self.visible {
            return false;
        }
        self.handle_confirm_event(event);
        matches!(event, Event::Key(_) | Event::Mouse(_) | Event::Paste(_))
    }
}

impl ConfirmOverlayComponent {
    pub fn new() -> Self {
        Self {
            dialog: DialogOverlayComponent::new(),
            keys: KeyBindings::default(),
            visible: false,
            body: String::new(),
            confirm_label: "OK".to_string(),
            input: None,
            selected_confirm: false,
            cancel_rect: None,
            confirm_rect: None,
        }
    }

    pub fn with_keys(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn open(&mut self, title: &str, body: &str, confirm_label: &str) {
        self.dialog.set_title(title);
        self.visible = true;
        self.body = body.to_string();
        self.confirm_label = confirm_label.to_string();
        self.input = None;
        self.selected_confirm = true;
    }

    /// Open with an editable single-line field prefilled with `initial`.
    pub fn open_with_input(&mut self, title: &str, body: &str, confirm_label: &str, initial: &str) {
        self.open(title, body, confirm_label);
        self.input = Some(initial.chars().take(TITLE_MAX_CHARS).collect());
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.input = None;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn input_valid(&self) -> bool {
        match &self.input {
            None => true,
            Some(value) => (1..=TITLE_MAX_CHARS).contains(&value.trim().chars().count()),
        }
    }

    pub fn handle_confirm_event(&mut self, event: &Event) -> Option<ConfirmAction> {
        match event {
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) => {
                if self
                    .confirm_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    self.selected_confirm = true;
                    return self.input_valid().then_some(ConfirmAction::Confirm);
                }
                if self
                    .cancel_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    return Some(ConfirmAction::Cancel);
                }
                None
            }
            Event::Paste(text) => {
                if let Some(value) = self.input.as_mut() {
                    for ch in text.chars().filter(|c| !c.is_control()) {
                        if value.chars().count() >= TITLE_MAX_CHARS {
                            break;
                        }
                        value.push(ch);
                    }
                }
                None
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if let Some(value) = self.input.as_mut() {
                    match key.code {
                        KeyCode::Char(ch)
                            if !key
                                .modifiers
                                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                        {
                            if value.chars().count() < TITLE_MAX_CHARS {
                                value.push(ch);
                            }
                            return None;
                        }
                        KeyCode::Backspace => {
                            value.pop();
                            return None;
                        }
                        _ => {}
                    }
                }
                if self.keys.matches(Action::ConfirmToggle, key) {
                    self.selected_confirm = !self.selected_confirm;
                    None
                } else if self.keys.matches(Action::ConfirmLeft, key) {
                    self.selected_confirm = false;
                    None
                } else if self.keys.matches(Action::ConfirmRight, key) {
                    self.selected_confirm = true;
                    None
                } else if self.keys.matches(Action::ConfirmAccept, key) {
                    if !self.selected_confirm {
                        Some(ConfirmAction::Cancel)
                    } else if self.input_valid() {
                        Some(ConfirmAction::Confirm)
                    } else {
                        None
                    }
                } else if self.keys.matches(Action::ConfirmCancel, key) {
                    Some(ConfirmAction::Cancel)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
