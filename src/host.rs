//! Everything an overlay needs from its surroundings.

use std::fmt;
use std::time::Instant;

use crate::components::template::Templates;
use crate::config::{LongPress, MenuSizing, OverlayConfig, OverlayTiming, ToastConfig};
use crate::drivers::haptics::{Haptics, NoHaptics, TerminalBell};
use crate::event_bus::EventBus;
use crate::keybindings::KeyBindings;
use crate::layout::{Bounds, DeviceClass, DeviceMode, Point, PositionSolver, Size};
use crate::portal::PortalRoot;
use crate::timer::{Clock, SystemClock};

/// Shared collaborators for menus and toasts: the portal root, the event
/// bus, render templates, the clock and the viewport they are placed in.
pub struct OverlayHost {
    pub root: PortalRoot,
    pub bus: EventBus,
    pub templates: Templates,
    pub keys: KeyBindings,
    haptics: Box<dyn Haptics>,
    clock: Box<dyn Clock>,
    viewport: Size,
    solver: PositionSolver,
    device: DeviceMode,
    menu_sizing: MenuSizing,
    timing: OverlayTiming,
    long_press: LongPress,
    toasts: ToastConfig,
}

impl OverlayHost {
    pub fn new(config: OverlayConfig) -> Self {
        let haptics: Box<dyn Haptics> = if config.haptics {
            Box::new(TerminalBell::new())
        } else {
            Box::new(NoHaptics)
        };
        Self {
            root: PortalRoot::new(),
            bus: EventBus::new(),
            templates: Templates::builtin(),
            keys: KeyBindings::default(),
            haptics,
            clock: Box::new(SystemClock),
            viewport: Size::new(80, 24),
            solver: PositionSolver::new(config.placement),
            device: config.device,
            menu_sizing: config.menu_sizing,
            timing: config.timing,
            long_press: config.long_press,
            toasts: config.toasts,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device.resolve(self.viewport, self.solver.metrics())
    }

    pub fn solver(&self) -> &PositionSolver {
        &self.solver
    }

    /// Columns reserved for the sidebar at the current viewport width. Mobile
    /// placement keeps menus to the right of this region.
    pub fn sidebar_width(&self) -> u16 {
        let width = self.solver.sidebar_width(self.viewport.width);
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Place a box of `size` next to `anchor` in the current viewport.
    pub fn place(&self, anchor: Bounds, size: Size) -> Point {
        self.solver
            .solve(anchor, self.viewport, self.device_class(), size)
    }

    pub fn menu_sizing(&self) -> MenuSizing {
        self.menu_sizing
    }

    pub fn timing(&self) -> &OverlayTiming {
        &self.timing
    }

    pub fn long_press(&self) -> LongPress {
        self.long_press
    }

    pub fn toasts(&self) -> &ToastConfig {
        &self.toasts
    }

    pub fn haptics_mut(&mut self) -> &mut dyn Haptics {
        self.haptics.as_mut()
    }
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl fmt::Debug for OverlayHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHost")
            .field("root", &self.root)
            .field("bus", &self.bus)
            .field("viewport", &self.viewport)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}
