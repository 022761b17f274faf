//! Overlay notifications and ambient input signals.
//!
//! Menus and toasts announce lifecycle changes through one [`EventBus`] owned
//! by the host. Input they do not own (Escape, pointer presses outside of
//! them) is classified once into an [`AmbientSignal`] and handed to every
//! open overlay, so no instance listens to raw terminal input on its own.

use std::fmt;
use std::rc::Rc;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};

use crate::components::action_menu::MenuEntry;
use crate::components::toast::ToastId;
use crate::gesture::Anchor;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::Point;
use crate::portal::MountId;

#[derive(Clone)]
pub enum OverlayEvent {
    MenuOpened {
        menu: MountId,
        anchor: Anchor,
        items: Rc<[MenuEntry]>,
    },
    MenuClosed {
        menu: MountId,
        anchor: Option<Anchor>,
    },
    ToastDismissed {
        toast: ToastId,
    },
}

impl OverlayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayEvent::MenuOpened { .. } => "menu-opened",
            OverlayEvent::MenuClosed { .. } => "menu-closed",
            OverlayEvent::ToastDismissed { .. } => "toast-dismissed",
        }
    }
}

impl fmt::Debug for OverlayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayEvent::MenuOpened {
                menu,
                anchor,
                items,
            } => f
                .debug_struct("MenuOpened")
                .field("menu", menu)
                .field("anchor", anchor)
                .field("items", &items.len())
                .finish(),
            OverlayEvent::MenuClosed { menu, anchor } => f
                .debug_struct("MenuClosed")
                .field("menu", menu)
                .field("anchor", anchor)
                .finish(),
            OverlayEvent::ToastDismissed { toast } => f
                .debug_struct("ToastDismissed")
                .field("toast", toast)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&OverlayEvent)>;

/// Synchronous publish/subscribe channel. Listeners run in subscription
/// order on the publishing call stack.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    published: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&OverlayEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: OverlayEvent) {
        self.published += 1;
        tracing::trace!(event = event.name(), "publish");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total number of events published so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.listeners.len())
            .field("published", &self.published)
            .finish()
    }
}

/// Input that every open overlay may react to but none of them owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientSignal {
    Escape,
    PointerDown(Point),
}

impl AmbientSignal {
    pub fn from_event(event: &Event, keys: &KeyBindings) -> Option<Self> {
        match event {
            Event::Key(key)
                if key.kind != KeyEventKind::Release && keys.matches(Action::MenuClose, key) =>
            {
                Some(AmbientSignal::Escape)
            }
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) => {
                Some(AmbientSignal::PointerDown(Point::new(
                    i32::from(mouse.column),
                    i32::from(mouse.row),
                )))
            }
            _ => None,
        }
    }
}
