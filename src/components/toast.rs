//! A single toast notification and its timed lifecycle.

use std::fmt;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};

use crate::components::template;
use crate::event_bus::OverlayEvent;
use crate::host::OverlayHost;
use crate::layout::{Point, rect_contains};
use crate::portal::{MountId, MountKind, Mountable};
use crate::timer::{Countdown, Timeout};
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToastVariant {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastVariant {
    pub fn icon(self) -> ToastIcon {
        match self {
            ToastVariant::Success => ToastIcon::Check,
            ToastVariant::Error => ToastIcon::Cross,
            ToastVariant::Warning => ToastIcon::Alert,
            ToastVariant::Info => ToastIcon::Info,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToastVariant::Success => "success",
            ToastVariant::Error => "error",
            ToastVariant::Warning => "warning",
            ToastVariant::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastIcon {
    Check,
    Cross,
    Alert,
    Info,
}

impl ToastIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            ToastIcon::Check => "✓",
            ToastIcon::Cross => "✕",
            ToastIcon::Alert => "⚠",
            ToastIcon::Info => "ℹ",
        }
    }
}

/// Immutable description of a toast. `duration` of zero disables
/// auto-dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub title: String,
    pub message: Option<String>,
    pub variant: ToastVariant,
    pub duration: Duration,
    pub show_progress: bool,
}

impl ToastOptions {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: None,
            variant: ToastVariant::default(),
            duration: Self::DEFAULT_DURATION,
            show_progress: true,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.is_empty()).then_some(message);
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn apply(mut self, overrides: ToastOverrides) -> Self {
        if let Some(duration) = overrides.duration {
            self.duration = duration;
        }
        if let Some(show) = overrides.show_progress {
            self.show_progress = show;
        }
        self
    }
}

/// Per-call tweaks for the variant shortcuts of the toast service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToastOverrides {
    pub duration: Option<Duration>,
    pub show_progress: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLifecycle {
    Created,
    Visible,
    Hiding,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(MountId);

impl ToastId {
    pub(crate) fn new() -> Self {
        Self(MountId::new(MountKind::Toast))
    }

    pub fn mount_id(&self) -> MountId {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct Toast {
    id: ToastId,
    options: ToastOptions,
    lifecycle: ToastLifecycle,
    countdown: Countdown,
    exit: Timeout,
    offset: i32,
    hovered: bool,
    rect: Option<Rect>,
    close_rect: Option<Rect>,
}

impl Toast {
    pub fn new(options: ToastOptions) -> Self {
        Self {
            id: ToastId::new(),
            countdown: Countdown::new(options.duration),
            options,
            lifecycle: ToastLifecycle::Created,
            exit: Timeout::new(),
            offset: 0,
            hovered: false,
            rect: None,
            close_rect: None,
        }
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    pub fn lifecycle(&self) -> ToastLifecycle {
        self.lifecycle
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn has_message(&self) -> bool {
        self.options.message.is_some()
    }

    pub fn shows_progress(&self) -> bool {
        self.options.show_progress && !self.options.duration.is_zero()
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.countdown.remaining(now)
    }

    /// When the auto-dismiss timer fires, if it is running.
    pub fn deadline(&self) -> Option<Instant> {
        self.countdown.deadline()
    }

    /// Progress bar fill in `0.0..=1.0`, if the toast shows one.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        self.shows_progress()
            .then(|| self.countdown.fraction_left(now))
    }

    /// Rows needed to draw the toast: border, title, optional message,
    /// optional progress bar.
    pub fn height(&self) -> u16 {
        2 + 1 + u16::from(self.has_message()) + u16::from(self.shows_progress())
    }

    /// Attach to the root and start the countdown.
    pub fn mount(&mut self, host: &mut OverlayHost) -> bool {
        if self.lifecycle != ToastLifecycle::Created {
            return false;
        }
        if let Err(err) = host.templates.require(template::TOAST) {
            tracing::error!(toast = %self.id, %err, "toast mount aborted");
            return false;
        }
        self.attach_to(&mut host.root);
        self.lifecycle = ToastLifecycle::Visible;
        if !self.options.duration.is_zero() {
            self.countdown.start(host.now());
        }
        tracing::debug!(
            toast = %self.id,
            variant = self.options.variant.name(),
            title = %self.options.title,
            "toast shown"
        );
        true
    }

    /// Pause the countdown while the pointer rests on the toast.
    pub fn pointer_enter(&mut self, now: Instant) -> bool {
        if self.hovered {
            return false;
        }
        self.hovered = true;
        self.lifecycle == ToastLifecycle::Visible && self.countdown.pause(now)
    }

    pub fn pointer_leave(&mut self, now: Instant) -> bool {
        if !self.hovered {
            return false;
        }
        self.hovered = false;
        self.lifecycle == ToastLifecycle::Visible
            && !self.countdown.banked().is_zero()
            && self.countdown.resume(now)
    }

    /// Start the exit animation. Repeated calls are no-ops.
    pub fn dismiss(&mut self, host: &mut OverlayHost) -> bool {
        if matches!(
            self.lifecycle,
            ToastLifecycle::Hiding | ToastLifecycle::Removed
        ) {
            return false;
        }
        self.countdown.cancel();
        self.lifecycle = ToastLifecycle::Hiding;
        self.exit.arm(host.now(), host.timing().toast_exit);
        tracing::debug!(toast = %self.id, "toast dismissed");
        true
    }

    /// Run due timers. Returns `true` on the tick the toast is removed.
    pub fn tick(&mut self, host: &mut OverlayHost) -> bool {
        let now = host.now();
        if self.lifecycle == ToastLifecycle::Visible && self.countdown.fire(now) {
            self.dismiss(host);
        }
        if self.lifecycle == ToastLifecycle::Hiding && self.exit.fire(now) {
            self.detach_from(&mut host.root);
            self.lifecycle = ToastLifecycle::Removed;
            self.rect = None;
            self.close_rect = None;
            tracing::debug!(toast = %self.id, "toast removed");
            host.bus
                .publish(OverlayEvent::ToastDismissed { toast: self.id });
            return true;
        }
        false
    }

    pub fn contains(&self, point: Point) -> bool {
        hit(self.rect, point)
    }

    pub fn close_contains(&self, point: Point) -> bool {
        hit(self.close_rect, point)
    }

    /// Draw at the top-right corner of `area`, pushed down by the stack
    /// offset.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, host: &OverlayHost) {
        self.rect = None;
        self.close_rect = None;
        if !self.is_mounted(&host.root) || area.width < 6 || area.height < 3 {
            return;
        }
        let Some(fragment) = host.templates.get(template::TOAST).copied() else {
            return;
        };
        let width = host.toasts().width.min(area.width.saturating_sub(2)).max(6);
        let x = area
            .x
            .saturating_add(area.width.saturating_sub(width.saturating_add(1)));
        let top = i32::from(area.y) + 1 + self.offset;
        if top < 0 || top >= i32::from(area.y.saturating_add(area.height)) {
            return;
        }
        let rect = Rect {
            x,
            y: top as u16,
            width,
            height: self.height(),
        }
        .intersection(area);
        if rect.height < 3 {
            return;
        }
        let accent = crate::theme::toast_accent(self.options.variant);
        let mut base = fragment.style;
        if self.lifecycle == ToastLifecycle::Hiding {
            base = base.add_modifier(Modifier::DIM);
        }
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(base.fg(accent))
            .style(base);
        frame.render_widget(block, rect);
        self.rect = Some(rect);

        let inner = Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        };
        let bounds = inner;
        let buffer = frame.buffer_mut();
        let mut y = inner.y;
        let icon = self.options.variant.icon().glyph();
        safe_set_string(buffer, bounds, inner.x, y, icon, base.fg(accent));
        let title_width = inner.width.saturating_sub(4) as usize;
        safe_set_string(
            buffer,
            bounds,
            inner.x.saturating_add(2),
            y,
            &truncate_to_width(&self.options.title, title_width),
            base.patch(fragment.accent),
        );
        let close_x = inner.x.saturating_add(inner.width.saturating_sub(1));
        safe_set_string(buffer, bounds, close_x, y, "×", base);
        self.close_rect = Some(Rect {
            x: close_x,
            y,
            width: 1,
            height: 1,
        });
        y = y.saturating_add(1);
        if let Some(message) = &self.options.message {
            safe_set_string(
                buffer,
                bounds,
                inner.x.saturating_add(2),
                y,
                &truncate_to_width(message, inner.width.saturating_sub(2) as usize),
                base,
            );
            y = y.saturating_add(1);
        }
        if let Some(fraction) = self.progress(host.now()) {
            let total = inner.width as usize;
            let filled = ((fraction * total as f32).round() as usize).min(total);
            let bar = "━".repeat(filled);
            safe_set_string(buffer, bounds, inner.x, y, &bar, base.fg(accent));
            let rest = "─".repeat(total - filled);
            let rest_x = inner.x.saturating_add(filled as u16);
            safe_set_string(
                buffer,
                bounds,
                rest_x,
                y,
                &rest,
                Style::default().add_modifier(Modifier::DIM),
            );
        }
    }
}

impl Mountable for Toast {
    fn mount_id(&self) -> MountId {
        self.id.mount_id()
    }
}

fn hit(rect: Option<Rect>, point: Point) -> bool {
    let (Ok(column), Ok(row)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
        return false;
    };
    rect.is_some_and(|r| rect_contains(r, column, row))
}
