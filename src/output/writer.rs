//! Line-oriented output sink.

use std::io::{self, BufWriter, Write};

/// Buffered writer emitting one entry per line.
pub struct EntryWriter<W: Write> {
    inner: BufWriter<W>,
    written: usize,
}

impl<W: Write> EntryWriter<W> {
    pub fn new(inner: W) -> Self {
        EntryWriter {
            inner: BufWriter::new(inner),
            written: 0,
        }
    }

    /// Write `entry` followed by a newline.
    pub fn write_entry<T: std::fmt::Display>(&mut self, entry: T) -> io::Result<()> {
        writeln!(self.inner, "{entry}")?;
        self.written += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush everything to the sink and hand it back.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }

    /// Drop the sink without flushing what is still buffered.
    pub fn abandon(self) {
        let (_sink, _unflushed) = self.inner.into_parts();
    }
}
