//! Cursor-based output emitter.
//!
//! Keeps a read cursor into the original source and an append-only output
//! buffer. The rewriter reproduces input formatting byte-for-byte by copying
//! source ranges forward ("catching up") and only appends synthesized text
//! where tag syntax is replaced. Skipping a range elides syntax that has no
//! counterpart in the output (tag delimiters, spread braces).
//!
//! State is per transform call; nothing here is shared or global.

use swc_common::BytePos;

/// Filter applied to each copied slice during a catch-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFilter {
    /// Copy the slice unchanged.
    Verbatim,
    /// Strip leading spaces (spaces only — tabs and newlines pass through).
    TrimLeadingSpaces,
    /// Keep only `\r` and `\n`. Skips an `=` between an attribute name and
    /// its value while preserving line structure.
    NewlinesOnly,
    /// Keep only `(` and `)`. Elides spread-attribute syntax while
    /// preserving parenthesization around the inner expression.
    ParensOnly,
}

impl CopyFilter {
    fn apply(self, slice: &str, out: &mut String) {
        match self {
            CopyFilter::Verbatim => out.push_str(slice),
            CopyFilter::TrimLeadingSpaces => out.push_str(slice.trim_start_matches(' ')),
            CopyFilter::NewlinesOnly => {
                out.extend(slice.chars().filter(|c| matches!(c, '\r' | '\n')))
            }
            CopyFilter::ParensOnly => {
                out.extend(slice.chars().filter(|c| matches!(c, '(' | ')')))
            }
        }
    }
}

/// Read cursor plus output buffer for one transform call.
pub struct Emitter<'a> {
    source: &'a str,
    /// `BytePos` of the source's first byte within the parser's source map.
    base: u32,
    cursor: usize,
    out: String,
}

impl<'a> Emitter<'a> {
    pub fn new(source: &'a str, base: u32) -> Self {
        Self {
            source,
            base,
            cursor: 0,
            out: String::with_capacity(source.len() + source.len() / 4),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Resolve a span position to a byte offset into the source.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base) as usize
    }

    pub fn slice(&self, lo: usize, hi: usize) -> &'a str {
        &self.source[lo..hi]
    }

    /// Copy original source from the cursor up to `to`.
    pub fn catch_up(&mut self, to: usize) {
        self.catch_up_filtered(to, CopyFilter::Verbatim);
    }

    /// Copy original source from the cursor up to `to`, passing the copied
    /// slice through `filter`. Backward targets are a no-op: the cursor never
    /// retreats, so no source byte is emitted twice.
    pub fn catch_up_filtered(&mut self, to: usize, filter: CopyFilter) {
        let to = to.min(self.source.len());
        if to <= self.cursor {
            return;
        }
        let slice = &self.source[self.cursor..to];
        filter.apply(slice, &mut self.out);
        self.cursor = to;
    }

    /// Advance the cursor without copying.
    pub fn skip_to(&mut self, to: usize) {
        if to > self.cursor {
            self.cursor = to.min(self.source.len());
        }
    }

    /// Append synthesized text directly to the output.
    pub fn append(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Copy the remaining source and return the output buffer.
    pub fn finish(mut self) -> String {
        self.catch_up(self.source.len());
        self.out
    }
}
