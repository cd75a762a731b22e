//! Error taxonomy for the detag pipeline.
//!
//! There is no retry policy anywhere: a failed transform produces no output
//! and the caller decides whether to try again with different input/options.

/// Errors surfaced by parsing, configuration, and rewriting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required option is missing or invalid. Raised by
    /// `Options::normalize` before any output is produced.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A construct the rewriter explicitly refuses, with its source position.
    #[error("{message} (line {line}, column {column})")]
    UnsupportedSyntax {
        message: String,
        /// 1-based line of the offending construct.
        line: usize,
        /// 1-based byte column of the offending construct.
        column: usize,
    },

    /// A syntax error from the underlying parser, propagated verbatim.
    #[error("parse error: {0}")]
    Parse(String),

    /// File read/write failure in the file-based entry points.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `UnsupportedSyntax` error from a byte offset into `source`.
    pub fn unsupported(message: impl Into<String>, source: &str, offset: usize) -> Self {
        let (line, column) = line_column(source, offset);
        Error::UnsupportedSyntax {
            message: message.into(),
            line,
            column,
        }
    }
}

/// 1-based line and byte column of `offset` within `source`.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(source.len());
    let prefix = &source[..clamped];
    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(newline) => clamped - newline,
        None => clamped + 1,
    };
    (line, column)
}
