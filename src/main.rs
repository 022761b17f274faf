use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use clap::Parser;
use crossterm::event::{Event, KeyEventKind};
use indoc::indoc;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use term_chat::components::debug_log::set_global_debug_log;
use term_chat::components::{
    ChatCommand, ChatListComponent, Component, ComponentContext, ConfirmAction,
    ConfirmOverlayComponent, DebugLogComponent, ToastService,
};
use term_chat::config::Cli;
use term_chat::constants::{DEBUG_LOG_HEIGHT, POLL_INTERVAL};
use term_chat::drivers::console::{ConsoleInputDriver, TerminalSession};
use term_chat::event_bus::OverlayEvent;
use term_chat::event_loop::ControlFlow;
use term_chat::keybindings::Action;
use term_chat::layout::Size;
use term_chat::portal::MountKind;
use term_chat::runner::{OverlayApp, run_app};
use term_chat::ui::UiFrame;
use term_chat::{OverlayConfig, OverlayHost, tracing_sub};

const HELP: &str = indoc! {"
    Click ⋮ on a chat, or press and hold its title, to open the chat menu.
    With the keyboard: ↑/↓ select, m opens the menu, Esc closes it.

    s / e / w / i   show a success, error, warning or info toast
    d               dismiss all toasts
    F12             toggle the debug log
    q               quit
"};

const SEED_CHATS: [&str; 4] = [
    "General",
    "Release planning",
    "Bug triage",
    "Weekend hike",
];

enum Pending {
    Delete(u64),
    Rename(u64),
}

struct App {
    host: OverlayHost,
    list: ChatListComponent,
    commands: Receiver<ChatCommand>,
    toasts: ToastService,
    confirm: ConfirmOverlayComponent,
    pending: Option<Pending>,
    debug_log: DebugLogComponent,
    show_log: bool,
    last_event: Rc<RefCell<String>>,
    demo_counter: usize,
}

impl App {
    fn new(config: OverlayConfig, debug_log: DebugLogComponent, show_log: bool) -> Self {
        let mut host = OverlayHost::new(config);
        let last_event = Rc::new(RefCell::new(String::from("none yet")));
        let sink = last_event.clone();
        host.bus.subscribe(move |event: &OverlayEvent| {
            *sink.borrow_mut() = match event {
                OverlayEvent::MenuOpened { menu, items, .. } => {
                    format!("{} {menu} ({} entries)", event.name(), items.len())
                }
                OverlayEvent::MenuClosed { menu, .. } => format!("{} {menu}", event.name()),
                OverlayEvent::ToastDismissed { toast } => format!("{} {toast}", event.name()),
            };
        });
        let (tx, rx) = mpsc::channel();
        let mut list = ChatListComponent::new(tx);
        for title in SEED_CHATS {
            list.push(title, &host);
        }
        let toasts = ToastService::for_host(&host);
        let confirm = ConfirmOverlayComponent::new().with_keys(host.keys.clone());
        Self {
            host,
            list,
            commands: rx,
            toasts,
            confirm,
            pending: None,
            debug_log,
            show_log,
            last_event,
            demo_counter: 0,
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            tracing::debug!(?command, "chat command");
            match command {
                ChatCommand::Rename(id) => {
                    let Some(chat) = self.list.chat(id) else {
                        continue;
                    };
                    let title = chat.title.clone();
                    self.confirm.open_with_input(
                        "Rename chat",
                        "Enter a new title (1-50 characters).",
                        "Rename",
                        &title,
                    );
                    self.pending = Some(Pending::Rename(id));
                }
                ChatCommand::Duplicate(id) => match self.list.duplicate(id, &self.host) {
                    Some(copy) => {
                        let title = self.list.chat(copy).map(|c| c.title.clone());
                        self.toasts
                            .success("Chat duplicated", title.as_deref(), &mut self.host);
                    }
                    None => {
                        self.toasts.error(
                            "Could not duplicate chat",
                            Some("It no longer exists."),
                            &mut self.host,
                        );
                    }
                },
                ChatCommand::Delete(id) => {
                    let Some(chat) = self.list.chat(id) else {
                        continue;
                    };
                    let body = format!("Delete \"{}\"? This cannot be undone.", chat.title);
                    self.confirm.open("Delete chat", &body, "Delete");
                    self.pending = Some(Pending::Delete(id));
                }
            }
        }
    }

    fn resolve_confirm(&mut self, action: ConfirmAction) {
        let pending = self.pending.take();
        let input = self.confirm.input().map(|v| v.trim().to_string());
        self.confirm.close();
        if action == ConfirmAction::Cancel {
            return;
        }
        match pending {
            Some(Pending::Delete(id)) => match self.list.remove(id, &mut self.host) {
                Some(chat) => {
                    self.toasts
                        .success("Chat deleted", Some(&chat.title), &mut self.host);
                }
                None => {
                    self.toasts.error(
                        "Could not delete chat",
                        Some("It no longer exists."),
                        &mut self.host,
                    );
                }
            },
            Some(Pending::Rename(id)) => {
                let title = input.unwrap_or_default();
                if self.list.rename(id, title.as_str()) {
                    self.toasts
                        .success("Chat renamed", Some(&title), &mut self.host);
                } else {
                    self.toasts.error(
                        "Could not rename chat",
                        Some("It no longer exists."),
                        &mut self.host,
                    );
                }
            }
            None => {}
        }
    }

    fn demo_toast(&mut self, action: Action) -> bool {
        self.demo_counter += 1;
        let n = self.demo_counter;
        let host = &mut self.host;
        match action {
            Action::ToastSuccess => {
                self.toasts
                    .success(format!("Saved #{n}"), Some("Your changes are stored."), host)
            }
            Action::ToastError => self.toasts.error(
                format!("Send failed #{n}"),
                Some("Check your connection and try again."),
                host,
            ),
            Action::ToastWarning => self.toasts.warning(
                format!("Quota at 90% #{n}"),
                Some("Old attachments may be pruned."),
                host,
            ),
            Action::ToastInfo => self.toasts.info(format!("Heads up #{n}"), None, host),
            _ => return false,
        };
        true
    }

    fn sidebar_width(&self, width: u16) -> u16 {
        self.host.sidebar_width().min(width / 2)
    }
}

impl OverlayApp for App {
    fn handle_event(&mut self, event: &Event) -> ControlFlow {
        if self.confirm.visible() {
            if let Some(action) = self.confirm.handle_confirm_event(event) {
                self.resolve_confirm(action);
            }
            return ControlFlow::Continue;
        }
        if self.toasts.handle_event(event, &mut self.host) {
            return ControlFlow::Continue;
        }
        if self.list.handle_event(event, &mut self.host) {
            self.drain_commands();
            return ControlFlow::Continue;
        }
        let Event::Key(key) = event else {
            return ControlFlow::Continue;
        };
        if key.kind == KeyEventKind::Release {
            return ControlFlow::Continue;
        }
        let action = [
            Action::Quit,
            Action::ToggleDebugLog,
            Action::DismissAllToasts,
            Action::ToastSuccess,
            Action::ToastError,
            Action::ToastWarning,
            Action::ToastInfo,
        ]
        .into_iter()
        .find(|action| self.host.keys.matches(*action, key));
        match action {
            Some(Action::Quit) => return ControlFlow::Quit,
            Some(Action::ToggleDebugLog) => {
                self.show_log = !self.show_log;
                return ControlFlow::Continue;
            }
            Some(Action::DismissAllToasts) => {
                self.toasts.dismiss_all(&mut self.host);
                return ControlFlow::Continue;
            }
            Some(action) => {
                self.demo_toast(action);
                return ControlFlow::Continue;
            }
            None => {}
        }
        if self.show_log {
            self.debug_log
                .handle_event(event, &ComponentContext::default());
        }
        ControlFlow::Continue
    }

    fn tick(&mut self) -> ControlFlow {
        self.list.tick(&mut self.host);
        self.toasts.tick(&mut self.host);
        self.drain_commands();
        ControlFlow::Continue
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.host
            .set_viewport(Size::new(i32::from(width), i32::from(height)));
    }

    fn draw(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let viewport = Size::from(area);
        if self.host.viewport() != viewport {
            self.host.set_viewport(viewport);
        }
        let (main, log) = if self.show_log && area.height > DEBUG_LOG_HEIGHT * 2 {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(DEBUG_LOG_HEIGHT)])
                .split(area);
            (split[0], Some(split[1]))
        } else {
            (area, None)
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.sidebar_width(main.width)),
                Constraint::Min(1),
            ])
            .split(main);

        let sidebar = Block::default().title(" Chats ").borders(Borders::ALL);
        let inner = sidebar.inner(columns[0]);
        frame.render_widget(sidebar, columns[0]);
        self.list.render(frame, inner, !self.confirm.visible());

        let status = format!(
            "{HELP}\nlast overlay event: {}\ntoasts: {} active, {} leaving",
            self.last_event.borrow(),
            self.toasts.active_count(),
            self.toasts.leaving_count(),
        );
        let body = Paragraph::new(status)
            .style(Style::default().fg(term_chat::theme::panel_fg()))
            .wrap(Wrap { trim: false })
            .block(Block::default().title(" term-chat ").borders(Borders::ALL));
        frame.render_widget(body, columns[1]);

        if let Some(log) = log {
            self.debug_log
                .render(frame, log, &ComponentContext::default());
        }

        let layers = self.host.root.layers().to_vec();
        for id in layers {
            match id.kind() {
                MountKind::Menu => {
                    self.list.render_mount(id, frame, &self.host);
                }
                MountKind::Toast => {
                    self.toasts.render_mount(id, frame, area, &self.host);
                }
            }
        }

        let ctx = ComponentContext::new(true).with_screen(area);
        self.confirm.render(frame, area, &ctx);
    }
}

fn main() -> term_chat::Result<()> {
    let cli = Cli::parse();
    let config = OverlayConfig::try_from(&cli)?;

    let (debug_log, handle) = DebugLogComponent::new_default();
    set_global_debug_log(handle);
    tracing_sub::init_default();
    tracing::info!(device = ?config.device, max_toasts = config.toasts.max_concurrent, "starting");

    let mut app = App::new(config, debug_log, cli.debug_log);
    let mut session = TerminalSession::enter()?;
    let size = session.terminal_mut().size()?;
    app.resize(size.width, size.height);
    let mut driver = ConsoleInputDriver::new();

    let result = run_app(session.terminal_mut(), &mut driver, &mut app, POLL_INTERVAL);
    session.leave()?;
    result?;
    Ok(())
}
