//! Cancellable timers for the single-threaded overlay loop.
//!
//! Nothing here spawns or sleeps. A timer is a deadline owned by the widget it
//! belongs to; the event loop ticks widgets and each due deadline fires once.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// One-shot deadline. Arming replaces any previous deadline, so a timeout can
/// never have two pending firings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Returns `true` if a pending deadline was dropped.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Fire if due. A fired timeout is disarmed.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Pausable countdown.
///
/// `remaining` only shrinks, and only on [`pause`](Self::pause), by the time
/// spent since the countdown was last armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
    remaining: Duration,
    armed_at: Option<Instant>,
    timeout: Timeout,
}

impl Countdown {
    pub const fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
            armed_at: None,
            timeout: Timeout::new(),
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Arm for whatever time is left. No-op while already running or when
    /// nothing is left.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.armed_at.is_some() || self.remaining.is_zero() {
            return false;
        }
        self.armed_at = Some(now);
        self.timeout.arm(now, self.remaining);
        true
    }

    /// Stop the clock and bank the elapsed time. A countdown whose deadline
    /// has already passed is left running so the next tick fires it.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.timeout.is_due(now) {
            return false;
        }
        let Some(armed_at) = self.armed_at.take() else {
            return false;
        };
        self.timeout.cancel();
        self.remaining = self
            .remaining
            .saturating_sub(now.saturating_duration_since(armed_at));
        true
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        self.start(now)
    }

    /// Drop the pending deadline for good.
    pub fn cancel(&mut self) -> bool {
        self.armed_at = None;
        self.timeout.cancel()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        if self.timeout.fire(now) {
            self.armed_at = None;
            self.remaining = Duration::ZERO;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timeout.deadline()
    }

    /// Banked remaining time, not counting the current run.
    pub fn banked(&self) -> Duration {
        self.remaining
    }

    /// Time left as of `now`.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.armed_at {
            Some(armed_at) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(armed_at)),
            None => self.remaining,
        }
    }

    /// Fraction of the total still left, in `0.0..=1.0`.
    pub fn fraction_left(&self, now: Instant) -> f32 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.remaining(now).as_secs_f32() / self.total.as_secs_f32()).clamp(0.0, 1.0)
    }
}
