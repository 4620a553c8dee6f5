//! Error types for the filtering pipeline.
//!
//! Every error is fatal to the run that raised it. Errors raised while a
//! stream is being filtered are wrapped in [`FilterError::AtLine`] so the
//! caller can tell which input line triggered them.

use std::io;

use thiserror::Error;

/// Coarse classification used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Size,
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Size => "size",
            ErrorCategory::Io => "io",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid entry {entry:?}: not an IP address or CIDR block")]
    Parse { entry: String },

    #[error("unable to determine size of CIDR {cidr:?}")]
    Size { cidr: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot {operation} {path}: {source}")]
    File {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    pub fn category(&self) -> ErrorCategory {
        use FilterError::*;
        match self {
            Parse { .. } => ErrorCategory::Parse,
            Size { .. } => ErrorCategory::Size,
            Io(_) | File { .. } => ErrorCategory::Io,
            AtLine { source, .. } => source.category(),
        }
    }

    /// Input line (1-based) that triggered the error, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            FilterError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn parse(entry: impl Into<String>) -> Self {
        Self::Parse {
            entry: entry.into(),
        }
    }

    pub fn size(cidr: impl Into<String>) -> Self {
        Self::Size { cidr: cidr.into() }
    }

    pub fn file(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Attach the input line number. An error that already has one keeps it.
    pub fn at_line(self, line: usize) -> Self {
        if let FilterError::AtLine { .. } = self {
            return self;
        }
        FilterError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
