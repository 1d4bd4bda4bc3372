//! Append-only transcript sinks for editor mutations.
//!
//! Every editor mutation produces one human-readable line. The sink is
//! passed in explicitly when the editor is constructed, so ownership and
//! flushing are visible at the call site instead of hiding behind a global
//! file handle.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

/// A sink that records one line per editor mutation.
///
/// Implementations must not buffer lines across calls without flushing;
/// a crash between mutations must not lose already-recorded lines.
pub trait Transcript {
    /// Append a single line to the transcript.
    fn append_line(&mut self, line: &str) -> io::Result<()>;
}

/// File-backed transcript. Opens the file in append mode and flushes after
/// every line, so the transcript survives abnormal termination.
pub struct FileTranscript {
    writer: BufWriter<File>,
}

impl FileTranscript {
    /// Open (or create) the transcript file at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Transcript for FileTranscript {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

impl Drop for FileTranscript {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            tracing::error!("failed to flush transcript on close: {err}");
        }
    }
}

/// In-memory transcript with a shared handle for inspection.
///
/// Cloning yields another handle onto the same line buffer, so a test can
/// hand one clone to the editor and keep the other for assertions.
#[derive(Clone, Default)]
pub struct MemoryTranscript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Transcript for MemoryTranscript {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}
