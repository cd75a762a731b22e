//! Shared foundation for the detag rewriter.
//!
//! Re-exports the standard SWC AST and adds:
//! - The transform configuration surface (`Options`, `NormalizedOptions`)
//! - The error taxonomy shared by the parser, rewriter, and CLI

pub use swc_ecma_ast::*;

mod error;
mod options;

pub use error::Error;
pub use options::{default_extensions, NormalizedOptions, Options};
