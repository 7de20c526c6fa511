//! User-facing output
//!
//! Change notices and command output go to stdout, not through `tracing`.
//! `--silence` mutes routine lines; errors are always written.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Line-oriented output shared by the gate and running commands
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    silence: bool,
}

impl Console {
    /// Console writing to the process stdout
    pub fn stdout(silence: bool) -> Self {
        Self::with_writer(io::stdout(), silence)
    }

    pub fn with_writer(writer: impl Write + Send + 'static, silence: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
            silence,
        }
    }

    /// Console writing into an in-memory buffer, for inspection in tests
    pub fn capture(silence: bool) -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::with_writer(captured.clone(), silence), captured)
    }

    /// Write a routine line, unless silenced
    pub fn say(&self, line: &str) {
        if !self.silence {
            self.write_line(line);
        }
    }

    /// Write an error line regardless of silence
    pub fn alert(&self, line: &str) {
        self.write_line(line);
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock();
        // A closed stdout must not take the watcher down with it
        let _ = writeln!(out, "{}", line.trim_end_matches('\n'));
        let _ = out.flush();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("silence", &self.silence)
            .finish_non_exhaustive()
    }
}

/// In-memory sink behind `Console::capture`
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
