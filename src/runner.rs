use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// An application whose overlays are driven by the shared event loop.
pub trait OverlayApp {
    fn handle_event(&mut self, event: &Event) -> ControlFlow;

    /// Advance timers. Called once per loop iteration, right before drawing.
    fn tick(&mut self) -> ControlFlow {
        ControlFlow::Continue
    }

    fn draw(&mut self, frame: &mut UiFrame<'_>);

    fn resize(&mut self, _width: u16, _height: u16) {}
}

/// Own the loop until the app quits. Mouse capture starts enabled.
pub fn run_app<B, D, A>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    app: &mut A,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
    A: OverlayApp,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    event_loop.run(|_driver, event| {
        let flow = match event {
            Some(evt) => {
                if let Event::Resize(width, height) = evt {
                    app.resize(width, height);
                }
                app.handle_event(&evt)
            }
            None => {
                let flow = app.tick();
                if flow == ControlFlow::Continue {
                    terminal
                        .draw(|frame| {
                            let mut ui = UiFrame::new(frame);
                            app.draw(&mut ui);
                        })
                        .map_err(|err| io::Error::other(err.to_string()))?;
                }
                flow
            }
        };
        Ok(flow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
        capture: Vec<bool>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }

        fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
            self.capture.push(enabled);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Counter {
        ticks: usize,
        draws: usize,
        resized: Option<(u16, u16)>,
        events: Vec<Event>,
    }

    impl OverlayApp for Counter {
        fn handle_event(&mut self, event: &Event) -> ControlFlow {
            self.events.push(event.clone());
            match event {
                Event::Key(k) if k.code == KeyCode::Char('q') => ControlFlow::Quit,
                _ => ControlFlow::Continue,
            }
        }

        fn tick(&mut self) -> ControlFlow {
            self.ticks += 1;
            if self.ticks > 5 {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            }
        }

        fn draw(&mut self, frame: &mut UiFrame<'_>) {
            self.draws += 1;
            assert_eq!(frame.area().width, 20);
        }

        fn resize(&mut self, width: u16, height: u16) {
            self.resized = Some((width, height));
        }
    }

    #[test]
    fn ticks_and_draws_until_quit_key() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        let mut driver = Scripted {
            events: VecDeque::from([
                Event::Resize(20, 5),
                Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            ]),
            capture: Vec::new(),
        };
        let mut app = Counter::default();
        run_app(&mut terminal, &mut driver, &mut app, Duration::ZERO).unwrap();
        assert_eq!(app.ticks, 1);
        assert_eq!(app.draws, 1);
        assert_eq!(app.resized, Some((20, 5)));
        assert_eq!(app.events.len(), 2);
        assert_eq!(driver.capture, vec![true]);
    }

    #[test]
    fn tick_can_quit() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        let mut driver = Scripted {
            events: VecDeque::new(),
            capture: Vec::new(),
        };
        let mut app = Counter::default();
        run_app(&mut terminal, &mut driver, &mut app, Duration::ZERO).unwrap();
        assert_eq!(app.ticks, 6);
        assert_eq!(app.draws, 5);
    }
}
