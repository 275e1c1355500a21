//! Destinations for the copy-to-clipboard export.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Errors delivering exported text.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Receives the newline-joined text of a session log.
pub trait ClipboardSink {
    /// Deliver `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot accept the text.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Writes exported text to any [`Write`] implementor, e.g. stdout.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ClipboardSink for WriterSink<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writer.write_all(text.as_bytes())?;
        if !text.is_empty() && !text.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Replaces the contents of a file with the exported text.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text).map_err(|source| ClipboardError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Sink that always fails, for environments without a clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard configured".to_string()))
    }
}
