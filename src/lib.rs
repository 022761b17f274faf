//! Portal overlays for a terminal chat client: contextual action menus that
//! open from a tap or long press, and a bounded stack of toasts.
//!
//! Everything runs on one thread. Components own their overlays and advance
//! their timers from `tick`, which the event loop calls between input polls.

pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_bus;
pub mod event_loop;
pub mod gesture;
pub mod host;
pub mod keybindings;
pub mod layout;
pub mod portal;
pub mod runner;
pub mod term_color;
pub mod theme;
pub mod timer;
pub mod tracing_sub;
pub mod ui;

pub use config::OverlayConfig;
pub use error::{OverlayError, Result};
pub use host::OverlayHost;
