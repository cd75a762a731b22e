//! Filename-filtered transform adapter.
//!
//! Wraps the string transform behind a filename predicate so a bundler-style
//! pipeline can feed every file through one adapter: matching files are
//! rewritten, everything else is passed through byte-for-byte. Failures are
//! reported through the returned `Result`; nothing is swallowed.

use std::io::{self, Read, Write};

use dt_ast::{default_extensions, Error, Options};
use tracing::debug;

/// Streaming pass-through that rewrites files matching an extension
/// allowlist.
pub struct FilterTransform {
    options: Options,
    extensions: Vec<String>,
}

impl FilterTransform {
    pub fn new(options: Options) -> Self {
        let extensions = options
            .extensions
            .clone()
            .unwrap_or_else(default_extensions);
        Self {
            options,
            extensions,
        }
    }

    /// Whether `filename` is subject to rewriting.
    pub fn matches(&self, filename: &str) -> bool {
        self.extensions
            .iter()
            .any(|extension| filename.ends_with(extension.as_str()))
    }

    /// Rewrite `input` into `output` when the filename matches, otherwise
    /// copy it through unchanged.
    pub fn apply<R: Read, W: Write>(
        &self,
        filename: &str,
        mut input: R,
        mut output: W,
    ) -> Result<(), Error> {
        if !self.matches(filename) {
            debug!(filename, "passing through unmatched file");
            io::copy(&mut input, &mut output)?;
            return Ok(());
        }

        debug!(filename, "rewriting matched file");
        let mut source = String::new();
        input.read_to_string(&mut source)?;
        let rewritten = crate::transform_str(&source, &self.options)?;
        output.write_all(rewritten.as_bytes())?;
        Ok(())
    }
}
