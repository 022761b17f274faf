//! Sidebar list of chats. Every row owns an [`ActionMenu`] that opens from
//! the row's "⋮" button (tap) or from the row body (long press).

use std::rc::Rc;
use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::action_menu::{ActionMenu, MenuEntry, MenuItem, menu_items};
use crate::gesture::{Anchor, GestureMode, NodeId};
use crate::host::OverlayHost;
use crate::keybindings::Action;
use crate::layout::{Bounds, Point};
use crate::portal::{MountId, Mountable};
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

const BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: u64,
    pub title: String,
}

/// What a row menu asked for. The application decides how to carry it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Rename(u64),
    Duplicate(u64),
    Delete(u64),
}

#[derive(Debug)]
struct ChatRow {
    chat: Chat,
    menu: ActionMenu,
    button: NodeId,
    body: NodeId,
    items: Rc<[MenuEntry]>,
    button_bounds: Bounds,
}

fn row_items(id: u64, commands: &Sender<ChatCommand>) -> Rc<[MenuEntry]> {
    let send = |command: ChatCommand| {
        let tx = commands.clone();
        move || {
            // the receiver only goes away during shutdown
            let _ = tx.send(command);
        }
    };
    menu_items([
        MenuItem::new("rename", "Rename", send(ChatCommand::Rename(id)))
            .icon("✎")
            .into(),
        MenuItem::new("duplicate", "Duplicate", send(ChatCommand::Duplicate(id)))
            .icon("⧉")
            .into(),
        MenuEntry::Separator,
        MenuItem::new("delete", "Delete", send(ChatCommand::Delete(id)))
            .icon("✕")
            .danger()
            .into(),
    ])
}

#[derive(Debug)]
pub struct ChatListComponent {
    rows: Vec<ChatRow>,
    selected: usize,
    commands: Sender<ChatCommand>,
    next_chat: u64,
    next_node: u64,
    area: Rect,
}

impl ChatListComponent {
    pub fn new(commands: Sender<ChatCommand>) -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            commands,
            next_chat: 1,
            next_node: 1,
            area: Rect::default(),
        }
    }

    fn node(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;
        id
    }

    /// Append a chat and wire up its menu triggers. Returns the chat id.
    pub fn push(&mut self, title: impl Into<String>, host: &OverlayHost) -> u64 {
        let id = self.next_chat;
        self.next_chat += 1;
        let button = self.node();
        let body = self.node();
        let items = row_items(id, &self.commands);
        let mut menu = ActionMenu::new();
        menu.bind_trigger(button, Bounds::default(), GestureMode::Tap, items.clone());
        menu.bind_trigger(
            body,
            Bounds::default(),
            GestureMode::LongPress(host.long_press()),
            items.clone(),
        );
        self.rows.push(ChatRow {
            chat: Chat {
                id,
                title: title.into(),
            },
            menu,
            button,
            body,
            items,
            button_bounds: Bounds::default(),
        });
        self.layout(self.area);
        id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn chats(&self) -> impl Iterator<Item = &Chat> {
        self.rows.iter().map(|r| &r.chat)
    }

    pub fn chat(&self, id: u64) -> Option<&Chat> {
        self.chats().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.rows.get(self.selected).map(|r| &r.chat)
    }

    pub fn select(&mut self, id: u64) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.rows.iter().position(|r| r.chat.id == id)
    }

    pub fn rename(&mut self, id: u64, title: impl Into<String>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.rows[index].chat.title = title.into();
        true
    }

    /// Copy `id` right below itself. Returns the new chat's id.
    pub fn duplicate(&mut self, id: u64, host: &OverlayHost) -> Option<u64> {
        let index = self.index_of(id)?;
        let title = format!("{} (copy)", self.rows[index].chat.title);
        let new_id = self.push(title, host);
        let row = self.rows.pop()?;
        self.rows.insert(index + 1, row);
        self.layout(self.area);
        Some(new_id)
    }

    /// Drop a chat. Its menu is torn down immediately, open or not.
    pub fn remove(&mut self, id: u64, host: &mut OverlayHost) -> Option<Chat> {
        let index = self.index_of(id)?;
        let mut row = self.rows.remove(index);
        row.menu.unmount(host);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        self.layout(self.area);
        Some(row.chat)
    }

    /// The menu currently open, if any.
    pub fn open_menu(&self) -> Option<&ActionMenu> {
        self.rows.iter().map(|r| &r.menu).find(|m| m.is_open())
    }

    pub fn menu_for(&self, id: u64) -> Option<&ActionMenu> {
        self.index_of(id).map(|index| &self.rows[index].menu)
    }

    /// Hit box of a row's "⋮" button as of the last layout.
    pub fn button_bounds(&self, id: u64) -> Option<Bounds> {
        self.index_of(id).map(|index| self.rows[index].button_bounds)
    }

    /// Open the selected row's menu as if its button had been tapped.
    pub fn open_selected_menu(&mut self, host: &mut OverlayHost) -> bool {
        let Some(row) = self.rows.get_mut(self.selected) else {
            return false;
        };
        let anchor = Anchor::new(row.button, row.button_bounds);
        row.menu.open(anchor, row.items.clone(), host)
    }

    /// Assign each row a line of `area`; rows past the bottom get no hit box.
    pub fn layout(&mut self, area: Rect) {
        self.area = area;
        for (index, row) in self.rows.iter_mut().enumerate() {
            let (body, button) = if (index as u16) < area.height && area.width > BUTTON_WIDTH {
                let y = i32::from(area.y) + index as i32;
                let body_w = i32::from(area.width - BUTTON_WIDTH);
                (
                    Bounds::new(i32::from(area.x), y, body_w, 1),
                    Bounds::new(i32::from(area.x) + body_w, y, i32::from(BUTTON_WIDTH), 1),
                )
            } else {
                (Bounds::default(), Bounds::default())
            };
            row.button_bounds = button;
            row.menu.set_trigger_bounds(row.body, body);
            row.menu.set_trigger_bounds(row.button, button);
        }
    }

    pub fn handle_event(&mut self, event: &Event, host: &mut OverlayHost) -> bool {
        if let Some(row) = self.rows.iter_mut().find(|r| r.menu.is_open()) {
            return row.menu.handle_event(event, host);
        }
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if host.keys.matches(Action::SelectPrev, key) {
                    self.selected = self.selected.saturating_sub(1);
                    true
                } else if host.keys.matches(Action::SelectNext, key) {
                    if self.selected + 1 < self.rows.len() {
                        self.selected += 1;
                    }
                    true
                } else if host.keys.matches(Action::OpenRowMenu, key) {
                    self.open_selected_menu(host)
                } else {
                    false
                }
            }
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let y = i32::from(mouse.row) - i32::from(self.area.y);
                    let inside = rect_has(self.area, mouse.column, mouse.row);
                    if inside && y >= 0 && (y as usize) < self.rows.len() {
                        self.selected = y as usize;
                    }
                }
                let mut consumed = false;
                for row in self.rows.iter_mut() {
                    consumed |= row.menu.handle_event(event, host);
                    if row.menu.is_open() {
                        break;
                    }
                }
                consumed
            }
            _ => false,
        }
    }

    /// Run every row menu's timers.
    pub fn tick(&mut self, host: &mut OverlayHost) -> bool {
        let mut changed = false;
        for row in self.rows.iter_mut() {
            changed |= row.menu.tick(host);
        }
        changed
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        if area != self.area {
            self.layout(area);
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.is_empty() {
            return;
        }
        let base = Style::default()
            .fg(crate::theme::panel_fg())
            .bg(crate::theme::panel_bg());
        for y in bounds.top()..bounds.bottom() {
            for x in bounds.left()..bounds.right() {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(base);
                }
            }
        }
        for (index, row) in self.rows.iter().enumerate() {
            if index as u16 >= area.height {
                break;
            }
            let y = area.y + index as u16;
            let mut style = base;
            if index == self.selected {
                style = style
                    .fg(crate::theme::panel_active_fg())
                    .bg(crate::theme::panel_active_bg());
                if focused {
                    style = style.add_modifier(Modifier::BOLD);
                }
            }
            let title_w = area.width.saturating_sub(BUTTON_WIDTH + 1) as usize;
            let line = format!(
                " {:<width$}",
                truncate_to_width(&row.chat.title, title_w),
                width = title_w
            );
            safe_set_string(buffer, bounds, area.x, y, &line, style);
            let button_style = if row.menu.is_open() {
                style.fg(crate::theme::accent())
            } else {
                style
            };
            let button_x = area.x + area.width.saturating_sub(BUTTON_WIDTH);
            safe_set_string(buffer, bounds, button_x, y, " ⋮ ", button_style);
        }
    }

    /// Paint the menu mounted as `id`. Returns `false` if no row owns it.
    pub fn render_mount(&mut self, id: MountId, frame: &mut UiFrame<'_>, host: &OverlayHost) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.menu.mount_id() == id) else {
            return false;
        };
        row.menu.render(frame, host);
        true
    }

    /// Row under `point`, if any.
    pub fn row_at(&self, point: Point) -> Option<&Chat> {
        let (Ok(column), Ok(line)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
            return None;
        };
        if !rect_has(self.area, column, line) {
            return None;
        }
        self.rows.get((line - self.area.y) as usize).map(|r| &r.chat)
    }
}

fn rect_has(area: Rect, column: u16, row: u16) -> bool {
    crate::layout::rect_contains(area, column, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;
    use ratatui::widgets::{Block, Borders};

    use crate::config::OverlayConfig;
    use crate::drivers::NoHaptics;
    use crate::layout::{DeviceClass, Size};
    use crate::timer::ManualClock;

    fn setup() -> (ManualClock, OverlayHost, ChatListComponent, Receiver<ChatCommand>) {
        let clock = ManualClock::new();
        let host = OverlayHost::new(OverlayConfig::terminal())
            .with_clock(clock.clone())
            .with_haptics(NoHaptics)
            .with_viewport(Size::new(80, 24));
        let (tx, rx) = mpsc::channel();
        let mut list = ChatListComponent::new(tx);
        list.push("General", &host);
        list.push("Rust questions", &host);
        list.push("Lunch", &host);
        list.layout(Rect::new(0, 1, 28, 20));
        (clock, host, list, rx)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key_for(host: &OverlayHost, action: Action) -> Event {
        let combo = host.keys.first_combo(action).expect("default binding");
        Event::Key(KeyEvent::new(combo.code, combo.mods))
    }

    fn click(list: &mut ChatListComponent, host: &mut OverlayHost, column: u16, row: u16) {
        list.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), column, row), host);
        list.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), column, row), host);
    }

    #[test]
    fn layout_places_buttons_on_the_right() {
        let (_clock, _host, list, _rx) = setup();
        assert_eq!(list.button_bounds(2), Some(Bounds::new(25, 2, 3, 1)));
    }

    #[test]
    fn tapping_button_opens_that_rows_menu() {
        let (_clock, mut host, mut list, _rx) = setup();
        click(&mut list, &mut host, 26, 2);
        let menu = list.open_menu().expect("menu open");
        assert_eq!(menu.anchor().map(|a| a.bounds), list.button_bounds(2));
        assert_eq!(menu.items().len(), 4);
        assert_eq!(list.selected().map(|c| c.id), Some(2));
        assert!(menu.is_mounted(&host.root));
    }

    #[test]
    fn choosing_an_item_sends_its_command() {
        let (_clock, mut host, mut list, rx) = setup();
        click(&mut list, &mut host, 26, 1);
        let row = list
            .open_menu()
            .and_then(|m| m.row_bounds(3))
            .expect("delete row");
        let (x, y) = (row.x as u16, row.y as u16);
        list.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), x, y), &mut host);
        assert_eq!(rx.try_recv(), Ok(ChatCommand::Delete(1)));
        assert!(list.open_menu().is_none());
    }

    #[test]
    fn long_press_on_body_opens_menu() {
        let (clock, mut host, mut list, _rx) = setup();
        list.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 4, 3), &mut host);
        assert!(list.open_menu().is_none());
        clock.advance(Duration::from_millis(499));
        list.tick(&mut host);
        assert!(list.open_menu().is_none());
        clock.advance(Duration::from_millis(1));
        assert!(list.tick(&mut host));
        assert_eq!(
            list.open_menu().and_then(|m| m.anchor()).map(|a| a.bounds),
            Some(Bounds::new(0, 3, 25, 1))
        );
    }

    #[test]
    fn keyboard_selects_and_opens() {
        let (clock, mut host, mut list, rx) = setup();
        assert!(list.handle_event(&key_for(&host, Action::SelectNext), &mut host));
        assert!(list.handle_event(&key_for(&host, Action::OpenRowMenu), &mut host));
        assert!(list.menu_for(2).is_some_and(ActionMenu::is_open));
        // focus lands on the first action after the delay
        clock.advance(host.timing().menu_focus_delay);
        list.tick(&mut host);
        list.handle_event(&key_for(&host, Action::MenuActivate), &mut host);
        assert_eq!(rx.try_recv(), Ok(ChatCommand::Rename(2)));
    }

    #[test]
    fn escape_closes_without_command() {
        let (_clock, mut host, mut list, rx) = setup();
        list.open_selected_menu(&mut host);
        assert!(list.handle_event(&key_for(&host, Action::MenuClose), &mut host));
        assert!(list.open_menu().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn duplicate_and_remove_keep_rows_consistent() {
        let (_clock, mut host, mut list, _rx) = setup();
        let copy = list.duplicate(1, &host).expect("duplicated");
        let titles: Vec<_> = list.chats().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["General", "General (copy)", "Rust questions", "Lunch"]);
        assert_eq!(list.button_bounds(copy), Some(Bounds::new(25, 2, 3, 1)));

        assert!(list.select(3));
        list.open_selected_menu(&mut host);
        let mount = list.menu_for(3).map(|m| m.mount_id()).expect("menu");
        assert!(host.root.contains(mount));
        assert_eq!(list.remove(3, &mut host).map(|c| c.title), Some("Lunch".into()));
        assert!(!host.root.contains(mount));
        assert_eq!(list.selected().map(|c| c.id), Some(2));
        assert!(list.rename(2, "Rustaceans"));
        assert_eq!(list.chat(2).map(|c| c.title.as_str()), Some("Rustaceans"));
    }

    #[test]
    fn menu_opens_beside_the_sidebar_on_narrow_terminals() {
        let (_clock, mut host, mut list, _rx) = setup();
        assert_eq!(host.device_class(), DeviceClass::Mobile);
        let sidebar = Rect::new(0, 0, host.sidebar_width(), 24);
        assert_eq!(sidebar.width, 20);
        list.layout(Block::default().borders(Borders::ALL).inner(sidebar));
        assert!(list.open_selected_menu(&mut host));
        let bounds = list.open_menu().map(ActionMenu::bounds).expect("menu open");
        let button = list.button_bounds(1).expect("button");
        assert!(bounds.left() >= i32::from(sidebar.right()), "{bounds:?}");
        assert!(bounds.left() >= button.right(), "{bounds:?} covers {button:?}");
    }

    #[test]
    fn render_marks_selected_row_and_buttons() {
        let (_clock, _host, mut list, _rx) = setup();
        let area = Rect::new(0, 0, 28, 5);
        let mut buf = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buf);
            list.render(&mut frame, area, true);
        }
        assert_eq!(buf[(1, 0)].symbol(), "G");
        assert_eq!(buf[(26, 0)].symbol(), "⋮");
        assert!(buf[(1, 0)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(1, 1)].modifier.contains(Modifier::BOLD));
    }
}
