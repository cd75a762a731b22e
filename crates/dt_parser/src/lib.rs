//! ECMAScript parser wrapper for detag.
//!
//! Wraps the standard SWC parser with inline tag elements (the XML-like
//! embedded element syntax) enabled, producing a module whose node spans are
//! byte offsets into the original source. The rewriter consumes those spans
//! to splice output text; nothing here understands the tag semantics.

pub mod parse;

pub use parse::{parse_markup, parse_plain, ParseResult};
