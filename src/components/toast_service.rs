//! Bounded, ordered stack of toasts.
//!
//! The service owns every toast it shows. Insertion order is stack order:
//! the oldest toast sits on top and is the first to be evicted when the stack
//! is full. Evicted and cleared toasts move to a separate leaving list so
//! their exit animation can finish without counting against capacity.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use crate::components::template;
use crate::components::toast::{
    Toast, ToastId, ToastLifecycle, ToastOptions, ToastOverrides, ToastVariant,
};
use crate::config::ToastConfig;
use crate::host::OverlayHost;
use crate::layout::Point;
use crate::portal::{MountId, MountKind, Mountable};
use crate::timer::Timeout;
use crate::ui::UiFrame;

#[derive(Debug)]
pub struct ToastService {
    config: ToastConfig,
    active: Vec<Toast>,
    leaving: Vec<Toast>,
    sweep_timer: Timeout,
}

impl ToastService {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
            leaving: Vec::new(),
            sweep_timer: Timeout::new(),
        }
    }

    /// A service configured from the host.
    pub fn for_host(host: &OverlayHost) -> Self {
        Self::new(*host.toasts())
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    /// Show a toast. Returns `None` if it could not be rendered.
    pub fn show(&mut self, options: ToastOptions, host: &mut OverlayHost) -> Option<ToastId> {
        self.sweep(host);
        if let Err(err) = host.templates.require(template::TOAST) {
            tracing::error!(%err, title = %options.title, "toast not shown");
            return None;
        }
        while self.active.len() >= self.config.max_concurrent.max(1) {
            let mut oldest = self.active.remove(0);
            tracing::debug!(toast = %oldest.id(), "evicting oldest toast");
            oldest.dismiss(host);
            self.leaving.push(oldest);
        }
        let mut toast = Toast::new(options);
        if !toast.mount(host) {
            return None;
        }
        let id = toast.id();
        self.active.push(toast);
        self.reposition();
        Some(id)
    }

    /// Show a toast of `variant` with that variant's default duration.
    pub fn notify(
        &mut self,
        variant: ToastVariant,
        title: impl Into<String>,
        message: Option<&str>,
        overrides: ToastOverrides,
        host: &mut OverlayHost,
    ) -> Option<ToastId> {
        let duration = match variant {
            ToastVariant::Error => std::time::Duration::ZERO,
            ToastVariant::Warning => self.config.warning_duration,
            ToastVariant::Success | ToastVariant::Info => self.config.default_duration,
        };
        let mut options = ToastOptions::new(title)
            .variant(variant)
            .duration(duration);
        if let Some(message) = message {
            options = options.message(message);
        }
        self.show(options.apply(overrides), host)
    }

    pub fn success(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        host: &mut OverlayHost,
    ) -> Option<ToastId> {
        self.notify(ToastVariant::Success, title, message, ToastOverrides::default(), host)
    }

    /// Errors stay until acknowledged.
    pub fn error(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        host: &mut OverlayHost,
    ) -> Option<ToastId> {
        self.notify(ToastVariant::Error, title, message, ToastOverrides::default(), host)
    }

    pub fn warning(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        host: &mut OverlayHost,
    ) -> Option<ToastId> {
        self.notify(ToastVariant::Warning, title, message, ToastOverrides::default(), host)
    }

    pub fn info(
        &mut self,
        title: impl Into<String>,
        message: Option<&str>,
        host: &mut OverlayHost,
    ) -> Option<ToastId> {
        self.notify(ToastVariant::Info, title, message, ToastOverrides::default(), host)
    }

    /// Dismiss one toast. It stays in the stack until its exit animation
    /// completes.
    pub fn dismiss(&mut self, id: ToastId, host: &mut OverlayHost) -> bool {
        self.active
            .iter_mut()
            .chain(self.leaving.iter_mut())
            .find(|t| t.id() == id)
            .is_some_and(|t| t.dismiss(host))
    }

    /// Dismiss everything and empty the stack right away.
    pub fn dismiss_all(&mut self, host: &mut OverlayHost) {
        let count = self.active.len();
        for mut toast in self.active.drain(..) {
            toast.dismiss(host);
            self.leaving.push(toast);
        }
        self.sweep_timer.arm(host.now(), host.timing().toast_exit);
        tracing::debug!(count, "dismissed all toasts");
    }

    /// Run toast timers, drop removed toasts and restack the survivors.
    pub fn tick(&mut self, host: &mut OverlayHost) -> bool {
        let mut removed = Vec::new();
        for toast in self.active.iter_mut() {
            if toast.tick(host) {
                removed.push(toast.id());
            }
        }
        let changed = !removed.is_empty();
        if changed {
            self.active.retain(|t| t.lifecycle() != ToastLifecycle::Removed);
            self.reposition();
            for id in removed {
                // the toast detaches itself; make sure nothing lingers
                host.root.detach(id.mount_id());
            }
        }
        let leaving_before = self.leaving.len();
        for toast in self.leaving.iter_mut() {
            toast.tick(host);
        }
        self.leaving
            .retain(|t| t.lifecycle() != ToastLifecycle::Removed);
        let mut swept = false;
        if self.sweep_timer.fire(host.now()) {
            swept = self.sweep(host) > 0;
        }
        changed || swept || self.leaving.len() != leaving_before
    }

    fn reposition(&mut self) {
        let spacing = self.config.stack_spacing;
        for (index, toast) in self.active.iter_mut().enumerate() {
            toast.set_offset(index as i32 * spacing);
        }
    }

    /// Detach toast mounts the service no longer tracks. Returns how many
    /// were removed.
    pub fn sweep(&mut self, host: &mut OverlayHost) -> usize {
        let tracked: Vec<_> = self
            .active
            .iter()
            .chain(self.leaving.iter())
            .map(|t| t.mount_id())
            .collect();
        let orphans = host
            .root
            .sweep(MountKind::Toast, |id| tracked.contains(&id));
        for id in &orphans {
            tracing::debug!(mount = %id, "removed orphaned toast");
        }
        orphans.len()
    }

    /// Route pointer input: hover pauses countdowns, the close affordance
    /// dismisses, and presses on a toast never fall through.
    pub fn handle_event(&mut self, event: &Event, host: &mut OverlayHost) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let point = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        let now = host.now();
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                for toast in self.active.iter_mut() {
                    if toast.contains(point) {
                        toast.pointer_enter(now);
                    } else {
                        toast.pointer_leave(now);
                    }
                }
                false
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .active
                    .iter()
                    .rev()
                    .find(|t| t.contains(point))
                    .map(|t| (t.id(), t.close_contains(point)));
                match hit {
                    Some((id, true)) => {
                        self.dismiss(id, host);
                        true
                    }
                    Some((_, false)) => true,
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn leaving_count(&self) -> usize {
        self.leaving.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active toasts in stack order, oldest first.
    pub fn active_ids(&self) -> Vec<ToastId> {
        self.active.iter().map(|t| t.id()).collect()
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.active
            .iter()
            .chain(self.leaving.iter())
            .find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.active
            .iter_mut()
            .chain(self.leaving.iter_mut())
            .find(|t| t.id() == id)
    }

    pub fn offset_of(&self, id: ToastId) -> Option<i32> {
        self.active.iter().find(|t| t.id() == id).map(|t| t.offset())
    }

    /// Log the tracked toasts and what is mounted at the root.
    pub fn debug(&self, host: &OverlayHost) {
        tracing::debug!(
            active = self.active.len(),
            leaving = self.leaving.len(),
            mounted = host.root.count(MountKind::Toast),
            "toast service state"
        );
        for (index, toast) in self.active.iter().enumerate() {
            tracing::debug!(
                index,
                toast = %toast.id(),
                lifecycle = ?toast.lifecycle(),
                offset = toast.offset(),
                mounted = toast.is_mounted(&host.root),
                title = %toast.options().title,
                "active toast"
            );
        }
        for toast in &self.leaving {
            tracing::debug!(toast = %toast.id(), lifecycle = ?toast.lifecycle(), "leaving toast");
        }
    }

    /// Paint the toast behind one portal layer. Returns `false` if the layer
    /// is not one of ours.
    pub fn render_mount(
        &mut self,
        id: MountId,
        frame: &mut UiFrame<'_>,
        area: Rect,
        host: &OverlayHost,
    ) -> bool {
        let Some(toast) = self
            .active
            .iter_mut()
            .chain(self.leaving.iter_mut())
            .find(|t| t.mount_id() == id)
        else {
            return false;
        };
        toast.render(frame, area, host);
        true
    }
}
