use std::io::{self, IsTerminal, Write};
use std::time::Duration;

/// Optional tactile feedback. Callers check [`is_supported`](Haptics::is_supported)
/// first and ignore any error from [`pulse`](Haptics::pulse).
pub trait Haptics {
    fn is_supported(&self) -> bool;
    fn pulse(&mut self, duration: Duration) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn is_supported(&self) -> bool {
        false
    }

    fn pulse(&mut self, _duration: Duration) -> io::Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell. Only advertised when stdout is a terminal.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl Haptics for TerminalBell {
    fn is_supported(&self) -> bool {
        io::stdout().is_terminal()
    }

    fn pulse(&mut self, _duration: Duration) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// Fire a pulse if the capability is present. Failures are logged and dropped.
pub fn pulse_if_supported(haptics: &mut dyn Haptics, duration: Duration) -> bool {
    if !haptics.is_supported() {
        tracing::trace!("haptics unavailable, skipping pulse");
        return false;
    }
    match haptics.pulse(duration) {
        Ok(()) => true,
        Err(err) => {
            tracing::trace!(%err, "haptic pulse failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Haptics for Failing {
        fn is_supported(&self) -> bool {
            true
        }

        fn pulse(&mut self, _duration: Duration) -> io::Result<()> {
            Err(io::Error::other("no motor"))
        }
    }

    #[test]
    fn unsupported_capability_is_skipped() {
        let mut h = NoHaptics;
        assert!(!pulse_if_supported(&mut h, Duration::from_millis(50)));
    }

    #[test]
    fn failing_pulse_is_swallowed() {
        let mut h = Failing;
        assert!(!pulse_if_supported(&mut h, Duration::from_millis(50)));
    }
}
