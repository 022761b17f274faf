//! Overlay configuration and the demo command line.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::OverlayError;
use crate::layout::{DeviceMode, PlacementMetrics, Size};

/// Fixed delays of the overlay lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTiming {
    /// Delay before focus moves into a freshly opened menu.
    pub menu_focus_delay: Duration,
    /// Exit animation of a closing menu; the mount node is detached after it.
    pub menu_exit: Duration,
    /// Exit animation of a dismissed toast.
    pub toast_exit: Duration,
    pub haptic_pulse: Duration,
}

impl Default for OverlayTiming {
    fn default() -> Self {
        Self {
            menu_focus_delay: Duration::from_millis(100),
            menu_exit: Duration::from_millis(200),
            toast_exit: Duration::from_millis(300),
            haptic_pulse: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPress {
    pub threshold: Duration,
    /// Movement along either axis that cancels a pending press.
    pub move_cancel: i32,
}

impl Default for LongPress {
    fn default() -> Self {
        Self {
            threshold: Duration::from_millis(500),
            move_cancel: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    pub max_concurrent: usize,
    /// Vertical distance between stacked toasts.
    pub stack_spacing: i32,
    pub default_duration: Duration,
    pub warning_duration: Duration,
    /// Rendered width in cells.
    pub width: u16,
}

impl ToastConfig {
    pub const fn terminal() -> Self {
        Self {
            max_concurrent: 5,
            stack_spacing: 5,
            default_duration: Duration::from_millis(5000),
            warning_duration: Duration::from_millis(7000),
            width: 40,
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            stack_spacing: 80,
            default_duration: Duration::from_millis(5000),
            warning_duration: Duration::from_millis(7000),
            width: 40,
        }
    }
}

/// How a menu box is sized before it is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSizing {
    Fixed(Size),
    /// Widest label plus chrome, one row per entry.
    FitContent,
}

impl Default for MenuSizing {
    fn default() -> Self {
        MenuSizing::Fixed(PlacementMetrics::default().default_box)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub placement: PlacementMetrics,
    pub device: DeviceMode,
    pub menu_sizing: MenuSizing,
    pub timing: OverlayTiming,
    pub long_press: LongPress,
    pub toasts: ToastConfig,
    pub haptics: bool,
}

impl OverlayConfig {
    /// Cell-scaled preset used when rendering into a terminal.
    pub fn terminal() -> Self {
        Self {
            placement: PlacementMetrics::terminal(),
            device: DeviceMode::Auto,
            menu_sizing: MenuSizing::FitContent,
            timing: OverlayTiming::default(),
            long_press: LongPress {
                threshold: Duration::from_millis(500),
                move_cancel: 1,
            },
            toasts: ToastConfig::terminal(),
            haptics: true,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            placement: PlacementMetrics::default(),
            device: DeviceMode::Auto,
            menu_sizing: MenuSizing::default(),
            timing: OverlayTiming::default(),
            long_press: LongPress::default(),
            toasts: ToastConfig::default(),
            haptics: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Auto,
    Desktop,
    Mobile,
}

impl From<DeviceArg> for DeviceMode {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => DeviceMode::Auto,
            DeviceArg::Desktop => DeviceMode::Desktop,
            DeviceArg::Mobile => DeviceMode::Mobile,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "term-chat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal chat sidebar with action menus and toast notifications"
)]
pub struct Cli {
    /// Force the placement rules of a device class.
    #[arg(long, value_enum, default_value_t = DeviceArg::Auto)]
    pub device: DeviceArg,

    /// Maximum number of toasts visible at once.
    #[arg(long = "max-toasts", value_name = "N", default_value_t = 5)]
    pub max_toasts: usize,

    /// Auto-dismiss delay for success and info toasts.
    #[arg(long = "toast-ms", value_name = "MS", default_value_t = 5000)]
    pub toast_ms: u64,

    /// Hold time before a press on a chat row opens its menu.
    #[arg(long = "long-press-ms", value_name = "MS", default_value_t = 500)]
    pub long_press_ms: u64,

    /// Never ring the terminal bell on long press.
    #[arg(long = "no-haptics")]
    pub no_haptics: bool,

    /// Start with the debug log panel open.
    #[arg(long = "debug-log")]
    pub debug_log: bool,
}

impl TryFrom<&Cli> for OverlayConfig {
    type Error = OverlayError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=20).contains(&cli.max_toasts) {
            return Err(OverlayError::InvalidConfig(
                "max-toasts must be between 1 and 20".to_string(),
            ));
        }
        if cli.toast_ms > 60_000 {
            return Err(OverlayError::InvalidConfig(
                "toast-ms must be at most 60000".to_string(),
            ));
        }
        if !(100..=5000).contains(&cli.long_press_ms) {
            return Err(OverlayError::InvalidConfig(
                "long-press-ms must be between 100 and 5000".to_string(),
            ));
        }
        let mut config = OverlayConfig::terminal();
        config.device = cli.device.into();
        config.toasts.max_concurrent = cli.max_toasts;
        config.toasts.default_duration = Duration::from_millis(cli.toast_ms);
        config.long_press.threshold = Duration::from_millis(cli.long_press_ms);
        config.haptics = !cli.no_haptics;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["term-chat"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = OverlayConfig::default();
        assert_eq!(c.toasts.max_concurrent, 5);
        assert_eq!(c.toasts.stack_spacing, 80);
        assert_eq!(c.long_press.threshold, Duration::from_millis(500));
        assert_eq!(c.long_press.move_cancel, 10);
        assert_eq!(c.timing.menu_exit, Duration::from_millis(200));
        assert_eq!(c.timing.toast_exit, Duration::from_millis(300));
        assert_eq!(c.menu_sizing, MenuSizing::Fixed(Size::new(200, 150)));
    }

    #[test]
    fn cli_flags_flow_into_config() {
        let cli = parse(&[
            "--device",
            "mobile",
            "--max-toasts",
            "3",
            "--toast-ms",
            "2500",
            "--no-haptics",
        ]);
        let config = OverlayConfig::try_from(&cli).unwrap();
        assert_eq!(config.device, DeviceMode::Mobile);
        assert_eq!(config.toasts.max_concurrent, 3);
        assert_eq!(config.toasts.default_duration, Duration::from_millis(2500));
        assert!(!config.haptics);
        assert_eq!(config.menu_sizing, MenuSizing::FitContent);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for args in [
            &["--max-toasts", "0"][..],
            &["--max-toasts", "21"][..],
            &["--toast-ms", "60001"][..],
            &["--long-press-ms", "50"][..],
        ] {
            let cli = parse(args);
            let err = OverlayConfig::try_from(&cli).unwrap_err();
            assert!(matches!(err, OverlayError::InvalidConfig(_)), "{args:?}");
        }
    }
}
