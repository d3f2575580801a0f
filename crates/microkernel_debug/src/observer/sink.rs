//! Line sinks for trace output.
//!
//! # Invariants
//! - One `write_line` call produces exactly one output line.
//! - `StdoutSink` write failures are fatal, matching `println!`.

use log::error;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Destination of formatted trace lines.
pub trait TraceSink: Send + Sync {
    /// Writes one line; `line` carries no trailing newline.
    fn write_line(&self, line: &str);
}

/// Sink writing to the process standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl TraceSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}") {
            error!("event=trace_write module=observer status=error error={err}");
            panic!("failed printing to stdout: {err}");
        }
    }
}

/// Sink capturing lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TraceSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
