//! Render sinks
//!
//! Displays do not print. They hand each rendered line to a [`RenderSink`],
//! which decides where it goes. Sinks are called synchronously from inside
//! the notification pass, so a sink that blocks stalls every display after
//! it; keep `emit` quick.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Downstream consumer of rendered display output
pub trait RenderSink: Send + Sync {
    /// Accept one rendered line from the display named `source`
    fn emit(&self, source: &str, line: &str);
}

/// Sends every line through the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    level: log::Level,
}

impl LogSink {
    /// Log target used for display output
    pub const TARGET: &'static str = "stationwatch::display";

    /// Sink logging at the given level
    pub const fn new(level: log::Level) -> Self {
        Self { level }
    }

    /// Level lines are logged at
    pub const fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl RenderSink for LogSink {
    fn emit(&self, source: &str, line: &str) {
        log::log!(target: Self::TARGET, self.level, "[{source}] {line}");
    }
}

/// One line captured by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Display that produced the line
    pub source: String,
    /// The rendered text
    pub line: String,
}

/// Keeps every emitted line in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<RenderedLine>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far
    pub fn lines(&self) -> Vec<RenderedLine> {
        self.lock().clone()
    }

    /// Text of every line from one display
    pub fn lines_from(&self, source: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|rendered| rendered.source == source)
            .map(|rendered| rendered.line.clone())
            .collect()
    }

    /// Most recent line from one display
    pub fn last_from(&self, source: &str) -> Option<String> {
        self.lock()
            .iter()
            .rev()
            .find(|rendered| rendered.source == source)
            .map(|rendered| rendered.line.clone())
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything captured so far
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RenderedLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSink for MemorySink {
    fn emit(&self, source: &str, line: &str) {
        self.lock().push(RenderedLine {
            source: source.to_owned(),
            line: line.to_owned(),
        });
    }
}
