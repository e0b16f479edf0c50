//! Input and output seams of the encounter server.
//!
//! The server never touches a device or a terminal itself. It pulls lines
//! from a [`Reader`] and pushes snapshots to a [`Renderer`].

use std::collections::VecDeque;

use thiserror::Error;

use super::snapshot::EncounterSnapshot;

/// Errors raised by input channels.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The underlying device failed.
    #[error("input device error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of raw command lines.
pub trait Reader {
    /// Prepares the channel for reading.
    ///
    /// # Errors
    ///
    /// Returns a [`ReaderError`] if the channel cannot be opened.
    fn open(&mut self) -> Result<(), ReaderError>;

    /// Releases the channel. Further reads return nothing.
    fn close(&mut self);

    /// Returns every line buffered since the last call, oldest first.
    /// Never blocks; returns an empty vector when nothing is waiting.
    fn read(&mut self) -> Vec<String>;
}

/// Consumer of encounter snapshots.
pub trait Renderer {
    /// Presents one snapshot. Called once per tick.
    fn render(&mut self, snapshot: &EncounterSnapshot);
}

/// An in-memory reader fed by hand.
///
/// Useful for tests and for scripting an encounter.
///
/// ```
/// use boss_battles_core::server::{QueueReader, Reader};
///
/// let mut reader = QueueReader::new();
/// reader.open().unwrap();
/// reader.push("alice/register");
/// assert_eq!(reader.read(), vec!["alice/register".to_string()]);
/// assert!(reader.read().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct QueueReader {
    lines: VecDeque<String>,
    open: bool,
}

impl QueueReader {
    /// Creates a closed, empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line for the next read.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// True between `open` and `close`.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}

impl Reader for QueueReader {
    fn open(&mut self) -> Result<(), ReaderError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
        self.lines.clear();
    }

    fn read(&mut self) -> Vec<String> {
        if !self.open {
            return Vec::new();
        }
        self.lines.drain(..).collect()
    }
}

/// A renderer that keeps every snapshot it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<EncounterSnapshot>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every snapshot rendered so far.
    #[must_use]
    pub fn frames(&self) -> &[EncounterSnapshot] {
        &self.frames
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&EncounterSnapshot> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, snapshot: &EncounterSnapshot) {
        self.frames.push(snapshot.clone());
    }
}
