use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod action_menu;
pub mod chat_list;
pub mod confirm_overlay;
pub mod debug_log;
pub mod dialog_overlay;
pub mod template;
pub mod toast;
pub mod toast_service;

pub use action_menu::{ActionMenu, MenuEntry, MenuItem, MenuItemVariant, menu_items};
pub use chat_list::{Chat, ChatCommand, ChatListComponent};
pub use confirm_overlay::{ConfirmAction, ConfirmOverlayComponent};
pub use debug_log::{DebugLogComponent, DebugLogHandle};
pub use dialog_overlay::DialogOverlayComponent;
pub use template::{Fragment, Templates};
pub use toast::{Toast, ToastId, ToastLifecycle, ToastOptions, ToastOverrides, ToastVariant};
pub use toast_service::ToastService;

pub use crate::component_context::ComponentContext;

/// Plain widgets that need no overlay host: they draw into an area and may
/// consume input.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}
