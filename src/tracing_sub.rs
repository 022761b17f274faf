//! Tracing subscriber whose output follows the debug log panel.

use std::io::{self, Write};

use tracing::Level;

use crate::components::debug_log::{DebugLogHandle, DebugLogWriter, global_debug_log};

/// Writer produced per event: the registered debug log if any, else stderr.
pub enum LogSink {
    Panel(DebugLogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    pub fn for_handle(handle: Option<DebugLogHandle>) -> Self {
        match handle {
            Some(handle) => LogSink::Panel(handle.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Panel(w) => w.write(buf),
            LogSink::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Panel(w) => w.flush(),
            LogSink::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SinkMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SinkMakeWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::for_handle(global_debug_log())
    }
}

/// Install the global subscriber at `level`. Later calls are no-ops.
pub fn init_with_level(level: Level) -> bool {
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(SinkMakeWriter)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

pub fn init_default() -> bool {
    init_with_level(Level::DEBUG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_sink_collects_lines() {
        let handle = DebugLogHandle::with_capacity(8);
        let mut sink = LogSink::for_handle(Some(handle.clone()));
        sink.write_all(b" DEBUG menu opened\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(handle.tail(1, 0), vec![" DEBUG menu opened"]);
    }

    #[test]
    fn missing_handle_falls_back_to_stderr() {
        assert!(matches!(LogSink::for_handle(None), LogSink::Stderr(_)));
    }
}
