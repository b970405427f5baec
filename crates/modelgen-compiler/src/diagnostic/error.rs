//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during model generation.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(modelgen::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration file '{}': {message}", path.display())]
    #[diagnostic(
        code(modelgen::config::invalid),
        help("The config file is JSON with camelCase keys, e.g. {{ \"sourceDir\": \"src/entities\" }}")
    )]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(modelgen::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(modelgen::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Analysis Errors
    // =========================================================================
    #[error("Entity '{entity}' references unknown type '{target}' on property '{property}'")]
    #[diagnostic(
        code(modelgen::analysis::unresolved_reference),
        help("Declare the target entity in the source directory, or disable strictReferences")
    )]
    UnresolvedReference {
        entity: String,
        property: String,
        target: String,
    },

    #[error("'{name}' in '{}' collides with the generated base model", path.display())]
    #[diagnostic(
        code(modelgen::analysis::reserved_name),
        help("Rename the entity or its source file; the base model is always emitted as BaseModel in the 'base' module")
    )]
    ReservedName {
        name: String,
        path: PathBuf,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported language: {language}")]
    #[diagnostic(code(modelgen::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}
