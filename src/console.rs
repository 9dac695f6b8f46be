// src/console.rs

//! Console output abstraction.
//!
//! Every relayed chunk and every status line goes through an [`OutputSink`].
//! Production uses [`StdoutSink`]; tests use [`MemorySink`] to inspect what
//! would have been printed.
//!
//! A single call to [`OutputSink::write`] is never interleaved with another
//! writer's bytes, which is what keeps prefixes attached to their chunk.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Which child stream a relay task copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    /// Console prefix for chunks read from this stream of `script`.
    pub fn prefix(self, script: &str) -> String {
        match self {
            StreamKind::Stdout => format!("[{script}] "),
            StreamKind::Stderr => format!("[{script}][ERROR] "),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Destination for relayed output and status lines.
pub trait OutputSink: Send + Sync {
    /// Write `bytes` as one uninterrupted unit.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Write `line` followed by a newline.
    fn line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.write(&buf)
    }
}

/// Writes to the process stdout, holding the stdout lock per write.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

/// In-memory sink recording each write separately.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes in the order they happened.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes: Vec<u8> = self.writes().concat();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Concatenated payload of every write that starts with `prefix`, with the
    /// prefix removed.
    pub fn payload(&self, prefix: &str) -> Vec<u8> {
        self.writes()
            .iter()
            .filter_map(|w| w.strip_prefix(prefix.as_bytes()))
            .flatten()
            .copied()
            .collect()
    }
}

impl OutputSink for MemorySink {
    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(bytes.to_vec());
        Ok(())
    }
}
