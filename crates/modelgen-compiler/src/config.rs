//! Compiler configuration.

use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::diagnostic::CompilerError;

/// Default name of the optional JSON config file.
pub const CONFIG_FILE_NAME: &str = "modelgen.json";

/// Configuration for the modelgen compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerConfig {
    /// Directory containing entity declaration sources.
    pub source_dir: PathBuf,

    /// Directory to write generated models to.
    pub out_dir: PathBuf,

    /// Source language (default: "typescript").
    pub language: String,

    /// File name suffix that marks entity files. Stripped to form the module id.
    pub entity_suffix: String,

    /// Suffix inserted before `.ts` in generated module file names.
    pub output_suffix: String,

    /// Name of the shared base declaration all entities inherit from.
    pub base_class: String,

    /// Fail the run instead of degrading when a reference cannot be resolved.
    pub strict_references: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src/entities"),
            out_dir: PathBuf::from("src/models"),
            language: "typescript".to_string(),
            entity_suffix: ".entity.ts".to_string(),
            output_suffix: ".model".to_string(),
            base_class: "BaseEntity".to_string(),
            strict_references: false,
        }
    }
}

impl CompilerConfig {
    /// Loads a config file from disk.
    ///
    /// Returns `Ok(None)` if the file doesn't exist. Missing keys take their
    /// default values.
    pub fn load(path: &Path) -> Result<Option<Self>, CompilerError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| CompilerError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| CompilerError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(config))
    }

    /// Derives the module id of a source file by stripping the entity suffix,
    /// or the plain extension for files that don't carry it.
    pub fn module_id(&self, path: &Path) -> String {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(stem) = file_name.strip_suffix(self.entity_suffix.as_str()) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }

        for ext in [".tsx", ".ts"] {
            if let Some(stem) = file_name.strip_suffix(ext) {
                return stem.to_string();
            }
        }

        file_name
    }

    /// File name of the generated module for `module_id`.
    pub fn module_file(&self, module_id: &str) -> String {
        format!("{}{}.ts", module_id, self.output_suffix)
    }

    /// Import specifier of the generated module for `module_id`.
    pub fn module_import(&self, module_id: &str) -> String {
        format!("./{}{}", module_id, self.output_suffix)
    }
}
