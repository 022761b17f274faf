//! Shared crate-wide constants.

use std::time::Duration;

/// Idle wait between input polls. Every elapsed interval ticks the overlay
/// timers and redraws, so this bounds timer resolution in the demo.
pub const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Lines retained by the debug log ring buffer.
pub const DEBUG_LOG_MAX_LINES: usize = 2000;

/// Rows the debug log panel takes at the bottom of the screen.
pub const DEBUG_LOG_HEIGHT: u16 = 8;
