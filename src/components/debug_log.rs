//! In-app log panel. Tracing output lands here while the terminal is in raw
//! mode, so it can be read without corrupting the UI.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::components::{Component, ComponentContext};
use crate::constants::DEBUG_LOG_MAX_LINES;
use crate::ui::UiFrame;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();

/// Register the process-wide log sink. Only the first registration wins.
pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct Ring {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Ring {
    fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

/// Cloneable handle onto a bounded line buffer.
#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<Ring>>,
}

impl DebugLogHandle {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(Ring {
                lines: VecDeque::with_capacity(capacity.min(256)),
                capacity,
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.push(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|ring| ring.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.lines.clear();
        }
    }

    /// Up to `count` lines ending `skip` lines before the newest one.
    pub fn tail(&self, count: usize, skip: usize) -> Vec<String> {
        let Ok(ring) = self.inner.lock() else {
            return Vec::new();
        };
        let end = ring.lines.len().saturating_sub(skip);
        let start = end.saturating_sub(count);
        ring.lines.range(start..end).cloned().collect()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter {
            handle: self.clone(),
            partial: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits the byte stream into lines.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    partial: Vec<u8>,
}

impl DebugLogWriter {
    fn emit(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let line = text.trim_end_matches('\r');
        if !line.is_empty() {
            self.handle.push(line.to_string());
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            if self.partial.is_empty() {
                self.emit(&rest[..pos]);
            } else {
                self.partial.extend_from_slice(&rest[..pos]);
                let line = std::mem::take(&mut self.partial);
                self.emit(&line);
            }
            rest = &rest[pos + 1..];
        }
        self.partial.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.emit(&line);
        }
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Bordered panel showing the newest lines of a `DebugLogHandle`.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    scroll_back: usize,
}

impl DebugLogComponent {
    pub fn new(capacity: usize) -> (Self, DebugLogHandle) {
        let handle = DebugLogHandle::with_capacity(capacity);
        (
            Self {
                handle: handle.clone(),
                scroll_back: 0,
            },
            handle,
        )
    }

    pub fn new_default() -> (Self, DebugLogHandle) {
        Self::new(DEBUG_LOG_MAX_LINES)
    }

    pub fn handle(&self) -> &DebugLogHandle {
        &self.handle
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    fn line_style(line: &str) -> Style {
        if line.contains("ERROR") {
            Style::default().fg(crate::theme::danger())
        } else if line.contains("WARN") {
            Style::default().fg(crate::theme::accent_alt())
        } else {
            Style::default().fg(Color::Gray)
        }
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        frame.render_widget(Clear, area);
        let visible = area.height.saturating_sub(2) as usize;
        self.scroll_back = self
            .scroll_back
            .min(self.handle.len().saturating_sub(visible));
        let lines: Vec<Line<'_>> = self
            .handle
            .tail(visible, self.scroll_back)
            .into_iter()
            .map(|line| {
                let style = Self::line_style(&line);
                Line::styled(line, style)
            })
            .collect();
        let title = if self.scroll_back > 0 {
            format!(" debug log (-{}) ", self.scroll_back)
        } else {
            " debug log ".to_string()
        };
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if ctx.focused() {
            block = block.border_style(Style::default().fg(crate::theme::debug_highlight()));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match key.code {
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(10);
                true
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(10);
                true
            }
            KeyCode::End => {
                self.scroll_back = 0;
                true
            }
            _ => false,
        }
    }
}
