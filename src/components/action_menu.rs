//! Floating contextual menu.
//!
//! One [`ActionMenu`] lives per trigger site (typically a list row) and is
//! reused across opens. While open it is portalled into the host's root and
//! behaves modally: the rest of the viewport acts as its backdrop.

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::components::template::{self, Fragment, Templates};
use crate::config::MenuSizing;
use crate::error::OverlayError;
use crate::event_bus::{AmbientSignal, OverlayEvent};
use crate::gesture::{Anchor, GestureMode, GestureOutcome, GestureTrigger, NodeId, PointerEvent};
use crate::host::OverlayHost;
use crate::keybindings::Action;
use crate::layout::{Bounds, Point, Size};
use crate::portal::{MountId, MountKind, Mountable};
use crate::timer::Timeout;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuItemVariant {
    #[default]
    Default,
    Danger,
}

#[derive(Clone)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub variant: MenuItemVariant,
    action: Rc<dyn Fn()>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, action: impl Fn() + 'static) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            variant: MenuItemVariant::Default,
            action: Rc::new(action),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn danger(mut self) -> Self {
        self.variant = MenuItemVariant::Danger;
        self
    }

    pub fn invoke(&self) {
        (self.action)();
    }

    fn text(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{icon} {}", self.label),
            None => self.label.clone(),
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum MenuEntry {
    Action(MenuItem),
    Separator,
}

impl MenuEntry {
    pub fn is_action(&self) -> bool {
        matches!(self, MenuEntry::Action(_))
    }
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        MenuEntry::Action(item)
    }
}

/// Build a shareable item list.
pub fn menu_items<I>(entries: I) -> Rc<[MenuEntry]>
where
    I: IntoIterator<Item = MenuEntry>,
{
    entries.into_iter().collect()
}

#[derive(Debug)]
struct TriggerSite {
    gesture: GestureTrigger,
    items: Rc<[MenuEntry]>,
}

pub struct ActionMenu {
    mount: MountId,
    anchor: Option<Anchor>,
    open: bool,
    items: Rc<[MenuEntry]>,
    position: Point,
    size: Size,
    focus: Option<usize>,
    focus_timer: Timeout,
    unmount_timer: Timeout,
    triggers: Vec<TriggerSite>,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self {
            mount: MountId::new(MountKind::Menu),
            anchor: None,
            open: false,
            items: Rc::from(Vec::new()),
            position: Point::default(),
            size: Size::default(),
            focus: None,
            focus_timer: Timeout::new(),
            unmount_timer: Timeout::new(),
            triggers: Vec::new(),
        }
    }

    /// Watch `node` and open with `items` when its gesture completes.
    pub fn bind_trigger(
        &mut self,
        node: NodeId,
        bounds: Bounds,
        mode: GestureMode,
        items: Rc<[MenuEntry]>,
    ) {
        self.triggers.push(TriggerSite {
            gesture: GestureTrigger::bind(node, bounds, mode),
            items,
        });
    }

    /// Refresh the hit box of every trigger bound to `node`.
    pub fn set_trigger_bounds(&mut self, node: NodeId, bounds: Bounds) {
        for site in self.triggers.iter_mut().filter(|s| s.gesture.node() == node) {
            site.gesture.set_bounds(bounds);
        }
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Closed but still mounted while the exit animation runs.
    pub fn is_closing(&self) -> bool {
        !self.open && self.unmount_timer.is_armed()
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn items(&self) -> &[MenuEntry] {
        &self.items
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::at(self.position, self.size)
    }

    /// Index into [`items`](Self::items) of the focused action row.
    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// Hit box of the row materialized for `items()[index]`.
    pub fn row_bounds(&self, index: usize) -> Option<Bounds> {
        if index >= self.items.len() {
            return None;
        }
        let b = self.bounds();
        Some(Bounds::new(
            b.x + 1,
            b.y + 1 + index as i32,
            (b.width - 2).max(0),
            1,
        ))
    }

    fn check_fragments(&self, templates: &Templates, items: &[MenuEntry]) -> Result<(), OverlayError> {
        templates.require(template::MENU_ITEM)?;
        if items.iter().any(|e| !e.is_action()) {
            templates.require(template::MENU_SEPARATOR)?;
        }
        Ok(())
    }

    fn box_size(sizing: MenuSizing, items: &[MenuEntry]) -> Size {
        match sizing {
            MenuSizing::Fixed(size) => size,
            MenuSizing::FitContent => {
                let widest = items
                    .iter()
                    .filter_map(|e| match e {
                        MenuEntry::Action(item) => Some(item.text().chars().count()),
                        MenuEntry::Separator => None,
                    })
                    .max()
                    .unwrap_or(0) as i32;
                Size::new((widest + 4).max(12), items.len() as i32 + 2)
            }
        }
    }

    /// Open against `anchor` with `items`. Returns `false` and stays closed
    /// when the render templates are incomplete.
    pub fn open(&mut self, anchor: Anchor, items: Rc<[MenuEntry]>, host: &mut OverlayHost) -> bool {
        if let Err(err) = self.check_fragments(&host.templates, &items) {
            tracing::error!(menu = %self.mount, %err, "menu open aborted");
            return false;
        }
        let now = host.now();
        self.unmount_timer.cancel();
        self.attach_to(&mut host.root);
        for site in self.triggers.iter_mut() {
            site.gesture.cancel();
        }
        self.size = Self::box_size(host.menu_sizing(), &items);
        self.position = host.place(anchor.bounds, self.size);
        self.items = items;
        self.focus = None;
        self.anchor = Some(anchor);
        self.open = true;
        self.focus_timer.arm(now, host.timing().menu_focus_delay);
        tracing::debug!(
            menu = %self.mount,
            node = anchor.node.raw(),
            x = self.position.x,
            y = self.position.y,
            "menu opened"
        );
        host.bus.publish(OverlayEvent::MenuOpened {
            menu: self.mount,
            anchor,
            items: self.items.clone(),
        });
        true
    }

    /// Close and schedule the unmount. Closing a closed menu does nothing.
    pub fn close(&mut self, host: &mut OverlayHost) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        for site in self.triggers.iter_mut() {
            site.gesture.cancel();
        }
        self.focus_timer.cancel();
        self.focus = None;
        self.unmount_timer.arm(host.now(), host.timing().menu_exit);
        tracing::debug!(menu = %self.mount, "menu closed");
        host.bus.publish(OverlayEvent::MenuClosed {
            menu: self.mount,
            anchor: self.anchor,
        });
        self.anchor = None;
        true
    }

    /// Tear down immediately, e.g. when the owning row goes away.
    pub fn unmount(&mut self, host: &mut OverlayHost) {
        self.close(host);
        self.unmount_timer.cancel();
        self.detach_from(&mut host.root);
    }

    /// Invoke the action at `index`, then close.
    pub fn activate(&mut self, index: usize, host: &mut OverlayHost) -> bool {
        if !self.open {
            return false;
        }
        let items = self.items.clone();
        let Some(MenuEntry::Action(item)) = items.get(index) else {
            return false;
        };
        tracing::debug!(menu = %self.mount, item = %item.id, "menu item activated");
        item.invoke();
        self.close(host);
        true
    }

    fn action_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_action())
            .map(|(i, _)| i)
    }

    fn move_focus(&mut self, forward: bool) {
        let actions: Vec<usize> = self.action_indices().collect();
        if actions.is_empty() {
            self.focus = None;
            return;
        }
        let current = self
            .focus
            .and_then(|f| actions.iter().position(|&i| i == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => actions.len() - 1,
            (Some(pos), true) => (pos + 1) % actions.len(),
            (Some(pos), false) => (pos + actions.len() - 1) % actions.len(),
        };
        self.focus = Some(actions[next]);
    }

    fn row_at(&self, point: Point) -> Option<usize> {
        (0..self.items.len()).find(|&i| self.row_bounds(i).is_some_and(|b| b.contains(point)))
    }

    /// React to input nobody owns. Only an open menu listens.
    pub fn handle_ambient(&mut self, signal: AmbientSignal, host: &mut OverlayHost) -> bool {
        if !self.open {
            return false;
        }
        match signal {
            AmbientSignal::Escape => self.close(host),
            AmbientSignal::PointerDown(point) => {
                if self.bounds().contains(point) {
                    // clicks inside the box never reach whatever is underneath
                    if let Some(index) = self.row_at(point) {
                        self.activate(index, host);
                    }
                } else {
                    self.close(host);
                }
                true
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, host: &mut OverlayHost) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if host.keys.matches(Action::MenuDown, key) {
            self.move_focus(true);
            true
        } else if host.keys.matches(Action::MenuUp, key) {
            self.move_focus(false);
            true
        } else if host.keys.matches(Action::MenuActivate, key) {
            if let Some(index) = self.focus {
                self.activate(index, host);
            }
            true
        } else {
            false
        }
    }

    /// Feed pointer input to the bound triggers. Returns whether the event
    /// was consumed.
    pub fn handle_pointer(&mut self, event: &PointerEvent, host: &mut OverlayHost) -> bool {
        if self.open {
            return event.position.is_some();
        }
        let now = host.now();
        let mut consumed = false;
        let mut activated = None;
        for site in self.triggers.iter_mut() {
            match site.gesture.handle_pointer(event, now) {
                GestureOutcome::Activated(anchor) if activated.is_none() => {
                    activated = Some((anchor, site.items.clone()));
                }
                outcome => consumed |= outcome.consumed(),
            }
        }
        if let Some((anchor, items)) = activated {
            self.open(anchor, items, host);
            return true;
        }
        consumed
    }

    pub fn handle_event(&mut self, event: &Event, host: &mut OverlayHost) -> bool {
        if self.open
            && let Some(signal) = AmbientSignal::from_event(event, &host.keys)
        {
            return self.handle_ambient(signal, host);
        }
        match event {
            Event::Key(key) if self.open => self.handle_key(key, host),
            Event::Mouse(mouse) => PointerEvent::from_mouse(mouse)
                .is_some_and(|pointer| self.handle_pointer(&pointer, host)),
            _ => false,
        }
    }

    /// Run due timers. Returns whether anything visible changed.
    pub fn tick(&mut self, host: &mut OverlayHost) -> bool {
        let now: Instant = host.now();
        let mut changed = false;
        if self.focus_timer.fire(now) && self.open {
            let first = self.action_indices().next();
            self.focus = first;
            changed = true;
        }
        if self.unmount_timer.fire(now) {
            self.detach_from(&mut host.root);
            tracing::debug!(menu = %self.mount, "menu unmounted");
            changed = true;
        }
        if !self.open {
            let pulse = host.timing().haptic_pulse;
            let mut fired = None;
            for site in self.triggers.iter_mut() {
                if let Some(anchor) = site.gesture.tick(now, host.haptics_mut(), pulse) {
                    fired = Some((anchor, site.items.clone()));
                    break;
                }
            }
            if let Some((anchor, items)) = fired {
                changed |= self.open(anchor, items, host);
            }
        }
        changed
    }

    /// Paint the menu if it is mounted. The backdrop is dimmed while open.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, host: &OverlayHost) {
        if !self.is_mounted(&host.root) {
            return;
        }
        let (Some(item), Some(separator)) = (
            host.templates.get(template::MENU_ITEM).copied(),
            host.templates
                .get(template::MENU_SEPARATOR)
                .copied()
                .or_else(|| host.templates.get(template::MENU_ITEM).copied()),
        ) else {
            return;
        };
        let area = frame.area();
        if self.open {
            frame.dim_area(area);
        }
        let Some(rect) = self.bounds().to_rect() else {
            return;
        };
        let closing = Style::default().add_modifier(Modifier::DIM);
        let mut base = item.style;
        if !self.open {
            base = base.patch(closing);
        }
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(base.fg(crate::theme::menu_border()))
            .style(base);
        frame.render_widget(block, rect);
        let paint = RowPaint {
            bounds: rect.intersection(area),
            item,
            separator,
        };
        for (index, entry) in self.items.iter().enumerate() {
            let Some(row) = self.row_bounds(index).and_then(|b| b.to_rect()) else {
                continue;
            };
            if row.y >= rect.y.saturating_add(rect.height).saturating_sub(1) {
                break;
            }
            self.render_row(frame, &paint, row, entry, index);
        }
    }

    fn render_row(
        &self,
        frame: &mut UiFrame<'_>,
        paint: &RowPaint,
        row: Rect,
        entry: &MenuEntry,
        index: usize,
    ) {
        let RowPaint {
            bounds,
            item,
            separator,
        } = *paint;
        let buffer = frame.buffer_mut();
        match entry {
            MenuEntry::Separator => {
                let line = "─".repeat(row.width as usize);
                safe_set_string(buffer, bounds, row.x, row.y, &line, separator.style);
            }
            MenuEntry::Action(action) => {
                let mut style = if self.focus == Some(index) {
                    item.accent
                } else {
                    item.style
                };
                if action.variant == MenuItemVariant::Danger {
                    style = style.fg(crate::theme::danger());
                }
                if !self.open {
                    style = style.add_modifier(Modifier::DIM);
                }
                let width = row.width as usize;
                let text = format!(" {:<width$}", action.text(), width = width.saturating_sub(1));
                safe_set_string(
                    buffer,
                    bounds,
                    row.x,
                    row.y,
                    &truncate_to_width(&text, width),
                    style,
                );
            }
        }
    }
}

/// Clip area and fragments shared by every row of one paint pass.
#[derive(Clone, Copy)]
struct RowPaint {
    bounds: Rect,
    item: Fragment,
    separator: Fragment,
}

impl Default for ActionMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Mountable for ActionMenu {
    fn mount_id(&self) -> MountId {
        self.mount
    }
}

impl fmt::Debug for ActionMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionMenu")
            .field("mount", &self.mount)
            .field("open", &self.open)
            .field("anchor", &self.anchor)
            .field("items", &self.items.len())
            .field("focus", &self.focus)
            .field("triggers", &self.triggers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::buffer::Buffer;

    use crate::config::{LongPress, OverlayConfig};
    use crate::drivers::NoHaptics;
    use crate::gesture::PointerPhase;
    use crate::timer::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn host(clock: &ManualClock) -> OverlayHost {
        OverlayHost::new(OverlayConfig::terminal())
            .with_clock(clock.clone())
            .with_haptics(NoHaptics)
            .with_viewport(Size::new(100, 30))
    }

    fn items(log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<[MenuEntry]> {
        let rename = log.clone();
        let delete = log.clone();
        menu_items([
            MenuItem::new("rename", "Rename", move || rename.borrow_mut().push("rename")).into(),
            MenuEntry::Separator,
            MenuItem::new("delete", "Delete", move || delete.borrow_mut().push("delete"))
                .danger()
                .into(),
        ])
    }

    fn anchor() -> Anchor {
        Anchor::new(NodeId::new(1), Bounds::new(10, 5, 1, 1))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn open_mounts_and_focuses_after_delay() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut menu = ActionMenu::new();
        assert!(menu.open(anchor(), items(&log), &mut host));
        assert!(menu.is_open());
        assert!(host.root.contains(menu.mount_id()));
        assert_eq!(menu.position(), Point::new(12, 5));
        assert_eq!(menu.focused(), None);
        clock.advance(ms(100));
        assert!(menu.tick(&mut host));
        assert_eq!(menu.focused(), Some(0));
    }

    #[test]
    fn close_defers_unmount_and_is_idempotent() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let closed = Rc::new(RefCell::new(0));
        let c = closed.clone();
        host.bus.subscribe(move |ev| {
            if let OverlayEvent::MenuClosed { .. } = ev {
                *c.borrow_mut() += 1;
            }
        });
        let mut menu = ActionMenu::new();
        menu.open(anchor(), items(&Rc::default()), &mut host);
        assert!(menu.close(&mut host));
        assert!(!menu.close(&mut host));
        assert_eq!(*closed.borrow(), 1);
        assert_eq!(menu.anchor(), None);
        assert!(menu.is_closing());
        assert!(host.root.contains(menu.mount_id()));
        clock.advance(ms(199));
        menu.tick(&mut host);
        assert!(host.root.contains(menu.mount_id()));
        clock.advance(ms(1));
        menu.tick(&mut host);
        assert!(!host.root.contains(menu.mount_id()));
    }

    #[test]
    fn reopening_during_exit_keeps_menu_mounted() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let mut menu = ActionMenu::new();
        menu.open(anchor(), items(&Rc::default()), &mut host);
        menu.close(&mut host);
        clock.advance(ms(150));
        menu.open(anchor(), items(&Rc::default()), &mut host);
        clock.advance(ms(100));
        menu.tick(&mut host);
        assert!(menu.is_open());
        assert!(host.root.contains(menu.mount_id()));
    }

    #[test]
    fn keyboard_navigation_skips_separators_and_wraps() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut menu = ActionMenu::new();
        menu.open(anchor(), items(&log), &mut host);
        assert!(menu.handle_event(&key(KeyCode::Down), &mut host));
        assert_eq!(menu.focused(), Some(0));
        menu.handle_event(&key(KeyCode::Down), &mut host);
        assert_eq!(menu.focused(), Some(2));
        menu.handle_event(&key(KeyCode::Char('j')), &mut host);
        assert_eq!(menu.focused(), Some(0));
        menu.handle_event(&key(KeyCode::Up), &mut host);
        assert_eq!(menu.focused(), Some(2));
        menu.handle_event(&key(KeyCode::Enter), &mut host);
        assert_eq!(*log.borrow(), vec!["delete"]);
        assert!(!menu.is_open());
    }

    #[test]
    fn action_runs_before_close_notification() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let log = Rc::new(RefCell::new(Vec::new()));
        let events = log.clone();
        host.bus.subscribe(move |e| events.borrow_mut().push(e.name()));
        let action = log.clone();
        let entries = menu_items([
            MenuItem::new("probe", "Probe", move || action.borrow_mut().push("action")).into(),
        ]);
        let mut menu = ActionMenu::new();
        menu.open(anchor(), entries, &mut host);
        assert!(menu.activate(0, &mut host));
        assert!(!menu.activate(0, &mut host));
        assert_eq!(*log.borrow(), vec!["menu-opened", "action", "menu-closed"]);
    }

    #[test]
    fn escape_and_backdrop_close_but_content_clicks_do_not() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let mut menu = ActionMenu::new();
        menu.open(anchor(), items(&Rc::default()), &mut host);
        // separator row: consumed without closing
        let sep = menu.row_bounds(1).unwrap();
        assert!(menu.handle_event(&click(sep.x as u16, sep.y as u16), &mut host));
        assert!(menu.is_open());
        assert!(menu.handle_event(&click(90, 25), &mut host));
        assert!(!menu.is_open());

        menu.open(anchor(), items(&Rc::default()), &mut host);
        assert!(menu.handle_event(&key(KeyCode::Esc), &mut host));
        assert!(!menu.is_open());
        // closed menus ignore ambient input
        assert!(!menu.handle_ambient(AmbientSignal::Escape, &mut host));
    }

    #[test]
    fn missing_fragment_aborts_open() {
        let clock = ManualClock::new();
        let mut templates = Templates::builtin();
        templates.remove(template::MENU_SEPARATOR);
        let mut host = host(&clock).with_templates(templates);
        let mut menu = ActionMenu::new();
        assert!(!menu.open(anchor(), items(&Rc::default()), &mut host));
        assert!(!menu.is_open());
        assert!(host.root.layers().is_empty());
        assert_eq!(host.bus.published(), 0);
        // a list without separators only needs the item fragment
        let plain = menu_items([MenuItem::new("a", "A", || {}).into()]);
        assert!(menu.open(anchor(), plain, &mut host));
    }

    #[test]
    fn tap_trigger_opens_with_bound_items() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let mut menu = ActionMenu::new();
        let node = NodeId::new(3);
        menu.bind_trigger(node, Bounds::new(20, 4, 1, 1), GestureMode::Tap, items(&Rc::default()));
        let down = PointerEvent::primary(PointerPhase::Down, Point::new(20, 4));
        let up = PointerEvent::primary(PointerPhase::Up, Point::new(20, 4));
        assert!(!menu.handle_pointer(&down, &mut host));
        assert!(menu.handle_pointer(&up, &mut host));
        assert!(menu.is_open());
        assert_eq!(menu.anchor().map(|a| a.node), Some(node));
        assert_eq!(menu.items().len(), 3);
    }

    #[test]
    fn long_press_trigger_opens_from_tick() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let mut menu = ActionMenu::new();
        menu.bind_trigger(
            NodeId::new(4),
            Bounds::new(0, 4, 20, 1),
            GestureMode::LongPress(LongPress::default()),
            items(&Rc::default()),
        );
        let down = PointerEvent::primary(PointerPhase::Down, Point::new(5, 4));
        menu.handle_pointer(&down, &mut host);
        clock.advance(ms(499));
        menu.tick(&mut host);
        assert!(!menu.is_open());
        clock.advance(ms(1));
        assert!(menu.tick(&mut host));
        assert!(menu.is_open());
        // the release lands on the open menu and is swallowed
        let up = PointerEvent::primary(PointerPhase::Up, Point::new(5, 4));
        assert!(menu.handle_pointer(&up, &mut host));
        assert!(menu.is_open());
    }

    #[test]
    fn render_draws_rows_inside_box() {
        let clock = ManualClock::new();
        let mut host = host(&clock);
        let mut menu = ActionMenu::new();
        menu.open(anchor(), items(&Rc::default()), &mut host);
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        menu.render(&mut frame, &host);
        let row = menu.row_bounds(0).unwrap();
        let text: String = (0..8)
            .filter_map(|dx| buf.cell(((row.x + dx) as u16, row.y as u16)))
            .map(|c| c.symbol().to_string())
            .collect();
        assert!(text.contains("Rename"), "{text:?}");
        let sep = menu.row_bounds(1).unwrap();
        assert_eq!(buf.cell((sep.x as u16, sep.y as u16)).unwrap().symbol(), "─");
    }
}
