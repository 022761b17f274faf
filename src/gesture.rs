//! Tap and long-press activation for a single node.
//!
//! A [`GestureTrigger`] watches one node's hit box. Pointer input is fed in
//! through [`GestureTrigger::handle_pointer`]; a long press completes in
//! [`GestureTrigger::tick`] once its hold timer is due. Activation is reported
//! as a return value carrying the [`Anchor`] the caller should open against.

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::config::LongPress;
use crate::drivers::haptics::{self, Haptics};
use crate::layout::{Bounds, Point};
use crate::timer::Timeout;

/// Non-owning key of a view node. The owner keeps the node alive; overlays
/// only remember which node they were opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// The node an overlay opens against, with its bounding box at activation
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub node: NodeId,
    pub bounds: Bounds,
}

impl Anchor {
    pub const fn new(node: NodeId, bounds: Bounds) -> Self {
        Self { node, bounds }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Tap,
    LongPress(LongPress),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform asked for its own context menu (right click).
    ContextMenu,
}

pub const PRIMARY_POINTER: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Contact index; [`PRIMARY_POINTER`] is the first finger or left button.
    pub pointer: u8,
    pub position: Option<Point>,
}

impl PointerEvent {
    pub const fn primary(phase: PointerPhase, position: Point) -> Self {
        Self {
            phase,
            pointer: PRIMARY_POINTER,
            position: Some(position),
        }
    }

    /// Left button is the primary contact, right button a context-menu
    /// request, middle button a secondary contact.
    pub fn from_mouse(mouse: &MouseEvent) -> Option<Self> {
        let position = Some(Point::new(i32::from(mouse.column), i32::from(mouse.row)));
        let (phase, pointer) = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => (PointerPhase::Down, PRIMARY_POINTER),
            MouseEventKind::Up(MouseButton::Left) => (PointerPhase::Up, PRIMARY_POINTER),
            MouseEventKind::Drag(MouseButton::Left) => (PointerPhase::Move, PRIMARY_POINTER),
            MouseEventKind::Down(MouseButton::Right) => {
                (PointerPhase::ContextMenu, PRIMARY_POINTER)
            }
            MouseEventKind::Down(MouseButton::Middle) => (PointerPhase::Down, 1),
            MouseEventKind::Up(MouseButton::Middle) => (PointerPhase::Up, 1),
            _ => return None,
        };
        Some(Self {
            phase,
            pointer,
            position,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Not for this trigger.
    Ignored,
    /// A gesture is in progress; the event may still propagate.
    Tracking,
    /// Open now. The event is consumed.
    Activated(Anchor),
    /// Consumed without activation.
    Suppressed,
}

impl GestureOutcome {
    pub fn consumed(&self) -> bool {
        matches!(self, GestureOutcome::Activated(_) | GestureOutcome::Suppressed)
    }
}

#[derive(Debug, Clone)]
pub struct GestureTrigger {
    node: NodeId,
    bounds: Bounds,
    mode: GestureMode,
    start: Option<Point>,
    hold: Timeout,
    fired: bool,
}

impl GestureTrigger {
    pub fn bind(node: NodeId, bounds: Bounds, mode: GestureMode) -> Self {
        Self {
            node,
            bounds,
            mode,
            start: None,
            hold: Timeout::new(),
            fired: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.node, self.bounds)
    }

    /// A long press is being held and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.hold.is_armed()
    }

    /// Next instant [`tick`](Self::tick) has work to do.
    pub fn deadline(&self) -> Option<Instant> {
        self.hold.deadline()
    }

    /// Drop a pending long press. The release owed by a press that already
    /// fired stays suppressed.
    pub fn cancel(&mut self) -> bool {
        self.start = None;
        self.hold.cancel()
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> GestureOutcome {
        if event.pointer != PRIMARY_POINTER {
            return GestureOutcome::Ignored;
        }
        let Some(position) = event.position else {
            return GestureOutcome::Ignored;
        };
        match self.mode {
            GestureMode::Tap => self.handle_tap(event.phase, position),
            GestureMode::LongPress(config) => {
                self.handle_long_press(event.phase, position, config, now)
            }
        }
    }

    fn handle_tap(&mut self, phase: PointerPhase, position: Point) -> GestureOutcome {
        let inside = self.bounds.contains(position);
        match phase {
            PointerPhase::Down if inside => {
                self.start = Some(position);
                GestureOutcome::Tracking
            }
            PointerPhase::Up => {
                let pressed = self.start.take().is_some();
                if pressed && inside {
                    GestureOutcome::Activated(self.anchor())
                } else {
                    GestureOutcome::Ignored
                }
            }
            PointerPhase::Move if self.start.is_some() => GestureOutcome::Tracking,
            _ => GestureOutcome::Ignored,
        }
    }

    fn handle_long_press(
        &mut self,
        phase: PointerPhase,
        position: Point,
        config: LongPress,
        now: Instant,
    ) -> GestureOutcome {
        let inside = self.bounds.contains(position);
        match phase {
            PointerPhase::Down if inside => {
                self.start = Some(position);
                self.fired = false;
                self.hold.arm(now, config.threshold);
                GestureOutcome::Tracking
            }
            PointerPhase::Move => {
                let Some(start) = self.start else {
                    return GestureOutcome::Ignored;
                };
                let dx = (position.x - start.x).abs();
                let dy = (position.y - start.y).abs();
                if dx > config.move_cancel || dy > config.move_cancel {
                    self.start = None;
                    self.hold.cancel();
                    return GestureOutcome::Ignored;
                }
                GestureOutcome::Tracking
            }
            PointerPhase::Up => {
                self.start = None;
                self.hold.cancel();
                if std::mem::take(&mut self.fired) {
                    // the release that ends a fired press is not a click
                    GestureOutcome::Suppressed
                } else {
                    GestureOutcome::Ignored
                }
            }
            PointerPhase::ContextMenu if inside => GestureOutcome::Suppressed,
            _ => GestureOutcome::Ignored,
        }
    }

    /// Complete a held long press. Pulses `haptics` when it fires.
    pub fn tick(
        &mut self,
        now: Instant,
        haptics: &mut dyn Haptics,
        pulse: Duration,
    ) -> Option<Anchor> {
        if !self.hold.fire(now) {
            return None;
        }
        self.start = None;
        self.fired = true;
        haptics::pulse_if_supported(haptics, pulse);
        tracing::debug!(node = self.node.raw(), "long press activated");
        Some(self.anchor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::NoHaptics;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn long_press() -> GestureTrigger {
        GestureTrigger::bind(
            NodeId::new(7),
            Bounds::new(100, 100, 200, 40),
            GestureMode::LongPress(LongPress::default()),
        )
    }

    fn at(phase: PointerPhase, x: i32, y: i32) -> PointerEvent {
        PointerEvent::primary(phase, Point::new(x, y))
    }

    #[derive(Default)]
    struct CountingHaptics(u32);

    impl Haptics for CountingHaptics {
        fn is_supported(&self) -> bool {
            true
        }

        fn pulse(&mut self, _duration: Duration) -> std::io::Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn tap_activates_on_release_inside() {
        let mut t = GestureTrigger::bind(NodeId::new(1), Bounds::new(0, 0, 3, 1), GestureMode::Tap);
        let now = Instant::now();
        assert_eq!(t.handle_pointer(&at(PointerPhase::Down, 1, 0), now), GestureOutcome::Tracking);
        let out = t.handle_pointer(&at(PointerPhase::Up, 1, 0), now);
        assert_eq!(out, GestureOutcome::Activated(t.anchor()));
        assert!(out.consumed());
    }

    #[test]
    fn tap_released_outside_does_nothing() {
        let mut t = GestureTrigger::bind(NodeId::new(1), Bounds::new(0, 0, 3, 1), GestureMode::Tap);
        let now = Instant::now();
        t.handle_pointer(&at(PointerPhase::Down, 1, 0), now);
        assert_eq!(t.handle_pointer(&at(PointerPhase::Up, 9, 9), now), GestureOutcome::Ignored);
        // a release without a press is ignored as well
        assert_eq!(t.handle_pointer(&at(PointerPhase::Up, 1, 0), now), GestureOutcome::Ignored);
    }

    #[test]
    fn long_press_fires_once_after_threshold() {
        let mut t = long_press();
        let mut haptics = CountingHaptics::default();
        let t0 = Instant::now();
        t.handle_pointer(&at(PointerPhase::Down, 150, 110), t0);
        t.handle_pointer(&at(PointerPhase::Move, 158, 118), t0 + ms(200));
        assert_eq!(t.tick(t0 + ms(499), &mut haptics, ms(50)), None);
        assert_eq!(t.tick(t0 + ms(500), &mut haptics, ms(50)), Some(t.anchor()));
        assert_eq!(t.tick(t0 + ms(900), &mut haptics, ms(50)), None);
        assert_eq!(haptics.0, 1);
        // the trailing release is swallowed
        assert_eq!(
            t.handle_pointer(&at(PointerPhase::Up, 158, 118), t0 + ms(950)),
            GestureOutcome::Suppressed
        );
    }

    #[test]
    fn long_press_cancelled_by_movement() {
        let mut t = long_press();
        let t0 = Instant::now();
        t.handle_pointer(&at(PointerPhase::Down, 150, 110), t0);
        t.handle_pointer(&at(PointerPhase::Move, 161, 110), t0 + ms(100));
        assert!(!t.is_pending());
        assert_eq!(t.tick(t0 + ms(1000), &mut NoHaptics, ms(50)), None);
    }

    #[test]
    fn long_press_cancelled_by_early_release() {
        let mut t = long_press();
        let t0 = Instant::now();
        t.handle_pointer(&at(PointerPhase::Down, 150, 110), t0);
        assert_eq!(
            t.handle_pointer(&at(PointerPhase::Up, 150, 110), t0 + ms(300)),
            GestureOutcome::Ignored
        );
        assert_eq!(t.tick(t0 + ms(1000), &mut NoHaptics, ms(50)), None);
    }

    #[test]
    fn context_menu_inside_node_is_suppressed() {
        let mut t = long_press();
        let now = Instant::now();
        assert_eq!(
            t.handle_pointer(&at(PointerPhase::ContextMenu, 120, 120), now),
            GestureOutcome::Suppressed
        );
        assert_eq!(
            t.handle_pointer(&at(PointerPhase::ContextMenu, 10, 10), now),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn secondary_or_positionless_contacts_are_ignored() {
        let mut t = long_press();
        let now = Instant::now();
        let second = PointerEvent {
            phase: PointerPhase::Down,
            pointer: 1,
            position: Some(Point::new(150, 110)),
        };
        assert_eq!(t.handle_pointer(&second, now), GestureOutcome::Ignored);
        let missing = PointerEvent {
            phase: PointerPhase::Down,
            pointer: PRIMARY_POINTER,
            position: None,
        };
        assert_eq!(t.handle_pointer(&missing, now), GestureOutcome::Ignored);
        assert!(!t.is_pending());
    }

    #[test]
    fn mouse_buttons_map_to_pointer_phases() {
        use crossterm::event::KeyModifiers;
        let mouse = |kind| MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        let down = PointerEvent::from_mouse(&mouse(MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(down, Some(PointerEvent::primary(PointerPhase::Down, Point::new(3, 4))));
        let right = PointerEvent::from_mouse(&mouse(MouseEventKind::Down(MouseButton::Right)));
        assert_eq!(right.map(|p| p.phase), Some(PointerPhase::ContextMenu));
        assert_eq!(PointerEvent::from_mouse(&mouse(MouseEventKind::ScrollUp)), None);
    }
}
