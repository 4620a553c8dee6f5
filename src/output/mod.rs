//! Output of filtered entries.
//!
//! - [`writer`] - buffered one-entry-per-line sink

mod writer;

pub use writer::EntryWriter;
