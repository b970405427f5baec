//! TypeScript frontend for the modelgen compiler.

pub mod ast;
pub mod parser;
pub mod to_ir;

use std::path::Path;
use walkdir::WalkDir;

use crate::diagnostic::CompilerError;
use crate::ir::DeclarationSet;
use super::Frontend;
use parser::TypeScriptParser;

/// TypeScript frontend implementation.
pub struct TypeScriptFrontend {
    parser: TypeScriptParser,
}

impl TypeScriptFrontend {
    /// Creates a new TypeScript frontend.
    pub fn new() -> Result<Self, CompilerError> {
        Ok(Self {
            parser: TypeScriptParser::new()?,
        })
    }
}

impl Frontend for TypeScriptFrontend {
    fn extensions(&self) -> &[&str] {
        &["ts", "tsx"]
    }

    fn parse_directory(&mut self, dir: &Path) -> Result<DeclarationSet, CompilerError> {
        if !dir.is_dir() {
            return Err(CompilerError::io(dir, "source directory does not exist"));
        }

        let mut parsed_files = Vec::new();

        // Sorted walk keeps discovery order, and therefore output, stable across runs.
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                CompilerError::io(path, e.to_string())
            })?;
            let path = entry.path();
            if !path.is_file() || path.to_string_lossy().ends_with(".d.ts") {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if !self.extensions().contains(&ext.to_string_lossy().as_ref()) {
                continue;
            }

            let source = std::fs::read_to_string(path).map_err(|e| CompilerError::IoError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let parsed = self.parser.parse(&source, path)?;
            if parsed.has_errors {
                tracing::warn!(path = %path.display(), "syntax errors in source, extraction is best-effort");
            }
            tracing::debug!(
                path = %path.display(),
                classes = parsed.classes.len(),
                enums = parsed.enums.len(),
                "parsed source file"
            );
            parsed_files.push(parsed);
        }

        Ok(to_ir::to_ir(&parsed_files, dir.to_path_buf()))
    }
}
