//! Source location tracking.

use std::path::PathBuf;

/// A span in the source code.
#[derive(Debug, Clone)]
pub struct Span {
    pub file: PathBuf,
    pub start_line: usize,
    pub start_col: usize,
}

impl Span {
    pub fn new(file: PathBuf, start_line: usize, start_col: usize) -> Self {
        Self {
            file,
            start_line,
            start_col,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.start_line + 1, self.start_col + 1)
    }
}
