//! Diagnostic types for error reporting.
//!
//! Errors carry `miette` codes so the CLI can render them with source context.

mod error;
mod span;

pub use error::CompilerError;
pub use span::Span;
