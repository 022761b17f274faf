//! Viewport-aware placement for floating boxes.
//!
//! Everything here is a pure function of its inputs so placement can be
//! tested without a live view tree.

use super::{Bounds, Point, Size};

/// Constants that drive placement, expressed in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementMetrics {
    /// Distance between the anchor and the box, and the minimum gutter on
    /// mobile.
    pub gutter: i32,
    /// Minimum distance from the viewport edges on desktop and vertically.
    pub edge_margin: i32,
    /// Viewports at most this wide are treated as mobile.
    pub mobile_breakpoint: i32,
    /// Share of half the viewport width the mobile sidebar occupies.
    pub sidebar_ratio: f32,
    /// Upper bound on the mobile sidebar width.
    pub sidebar_max: i32,
    /// Box size used when the caller does not provide one.
    pub default_box: Size,
}

impl PlacementMetrics {
    /// Cell-scaled metrics for terminal rendering.
    pub const fn terminal() -> Self {
        Self {
            gutter: 1,
            edge_margin: 1,
            mobile_breakpoint: 80,
            sidebar_ratio: 0.833,
            sidebar_max: 20,
            default_box: Size::new(24, 8),
        }
    }
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self {
            gutter: 8,
            edge_margin: 16,
            mobile_breakpoint: 768,
            sidebar_ratio: 0.833,
            sidebar_max: 160,
            default_box: Size::new(200, 150),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn for_viewport(width: i32, metrics: &PlacementMetrics) -> Self {
        if width <= metrics.mobile_breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Configured device class; `Auto` derives it from the viewport width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceMode {
    #[default]
    Auto,
    Desktop,
    Mobile,
}

impl DeviceMode {
    pub fn resolve(self, viewport: Size, metrics: &PlacementMetrics) -> DeviceClass {
        match self {
            DeviceMode::Auto => DeviceClass::for_viewport(viewport.width, metrics),
            DeviceMode::Desktop => DeviceClass::Desktop,
            DeviceMode::Mobile => DeviceClass::Mobile,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionSolver {
    metrics: PlacementMetrics,
}

impl PositionSolver {
    pub const fn new(metrics: PlacementMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &PlacementMetrics {
        &self.metrics
    }

    /// Width of the region reserved for the sidebar on mobile viewports.
    pub fn sidebar_width(&self, viewport_width: i32) -> i32 {
        let m = &self.metrics;
        let share = (viewport_width as f32 / 2.0) * m.sidebar_ratio;
        (share.min(m.sidebar_max as f32).floor() as i32).max(0)
    }

    /// Top-left corner for a box of `size` floating next to `anchor`.
    pub fn solve(&self, anchor: Bounds, viewport: Size, device: DeviceClass, size: Size) -> Point {
        let x = match device {
            DeviceClass::Desktop => self.desktop_x(anchor, viewport, size),
            DeviceClass::Mobile => self.mobile_x(viewport, size),
        };
        let y = self.clamp_y(anchor.top(), viewport, size);
        Point::new(x, y)
    }

    fn desktop_x(&self, anchor: Bounds, viewport: Size, size: Size) -> i32 {
        let m = &self.metrics;
        let limit = viewport.width - m.edge_margin;
        let mut x = anchor.right() + m.gutter;
        if x + size.width > limit {
            x = anchor.left() - size.width - m.gutter;
        }
        // Flipping can still overhang a narrow viewport; the left margin wins.
        x.min(limit - size.width).max(m.edge_margin)
    }

    fn mobile_x(&self, viewport: Size, size: Size) -> i32 {
        let m = &self.metrics;
        let sidebar = self.sidebar_width(viewport.width);
        let available = viewport.width - sidebar;
        let mut x = sidebar + m.edge_margin;
        if x + size.width > viewport.width {
            x = sidebar + (available - size.width) / 2;
        }
        if x + size.width > viewport.width - m.gutter {
            x = viewport.width - size.width - m.gutter;
        }
        x.max(sidebar + m.gutter)
    }

    fn clamp_y(&self, top: i32, viewport: Size, size: Size) -> i32 {
        let m = &self.metrics;
        let mut y = top;
        if y + size.height > viewport.height - m.edge_margin {
            y = viewport.height - size.height - m.edge_margin;
        }
        y.max(m.edge_margin)
    }
}

/// Place a box with the default layout-unit metrics.
pub fn solve(anchor: Bounds, viewport: Size, device: DeviceClass, size: Size) -> Point {
    PositionSolver::default().solve(anchor, viewport, device, size)
}
