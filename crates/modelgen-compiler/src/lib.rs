//! # modelgen Compiler
//!
//! This crate projects TypeORM entity classes onto plain TypeScript model
//! interfaces. Every `@Entity` class becomes an `<Entity>Model` interface
//! holding only its persisted and lifecycle-computed properties, with
//! relations retargeted to other models and referenced enums inlined.
//!
//! ## Supported Languages
//!
//! - TypeScript (default)
//!
//! ## Architecture
//!
//! ```text
//! Entity sources (.ts)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  tree-sitter parsing
//! │  (TS → IR)   │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Analysis   │  Registry, classification,
//! │ (IR → Model) │  relations, enums, base
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Model modules, base file, barrel
//! │ (Model → TS) │
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelgen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     source_dir: "src/entities".into(),
//!     out_dir: "src/models".into(),
//!     ..Default::default()
//! };
//!
//! let compiler = Compiler::new(config);
//! let result = compiler.compile()?;
//! ```

pub mod analysis;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod frontend;
pub mod ir;

pub use analysis::UnresolvedReference;
pub use config::CompilerConfig;
pub use diagnostic::CompilerError;

/// The main compiler struct that orchestrates the generation pipeline.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this compiler runs with.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Generates model code and writes it to the output directory.
    ///
    /// Nothing is written when reading, parsing or (in strict mode) reference
    /// resolution fails.
    pub fn compile(&self) -> Result<CompileResult, CompilerError> {
        let (generated, result) = self.generate()?;
        self.write_output(&generated)?;

        tracing::info!(
            out_dir = %self.config.out_dir.display(),
            files = generated.files.len(),
            "wrote generated models"
        );
        Ok(result)
    }

    /// Runs the pipeline without writing anything.
    pub fn check(&self) -> Result<CompileResult, CompilerError> {
        self.generate().map(|(_, result)| result)
    }

    /// Runs the full pipeline in memory:
    /// 1. Create frontend for the configured language
    /// 2. Parse source files into IR
    /// 3. Project entities onto models
    /// 4. Reject names reserved for the base model, enforce strict references
    ///    when enabled
    /// 5. Generate TypeScript code
    pub fn generate(&self) -> Result<(codegen::GeneratedCode, CompileResult), CompilerError> {
        // Phase 1: Create frontend
        let mut frontend = frontend::create_frontend(&self.config.language)?;

        // Phase 2: Parse files into IR
        let declarations = frontend.parse_directory(&self.config.source_dir)?;

        // Phase 3: Project
        let projected = analysis::project(&declarations, &self.config);

        // Phase 4: Reserved names and strict references
        analysis::check_reserved_names(&projected)?;
        if self.config.strict_references {
            if let Some(first) = projected.unresolved.first() {
                return Err(CompilerError::UnresolvedReference {
                    entity: first.entity.clone(),
                    property: first.property.clone(),
                    target: first.target.clone(),
                });
            }
        }

        // Phase 5: Generate TypeScript code
        let generated = codegen::generate(&projected, &self.config);

        let result = CompileResult {
            entities: projected.entity_count(),
            modules: projected.modules.len(),
            enums: projected.enum_count(),
            base: projected.base.is_some(),
            unresolved: projected.unresolved,
        };

        tracing::info!(
            source_dir = %self.config.source_dir.display(),
            entities = result.entities,
            modules = result.modules,
            enums = result.enums,
            unresolved = result.unresolved.len(),
            "projected entity models"
        );

        Ok((generated, result))
    }

    /// Writes generated code to the output directory.
    fn write_output(&self, generated: &codegen::GeneratedCode) -> Result<(), CompilerError> {
        std::fs::create_dir_all(&self.config.out_dir).map_err(|e| CompilerError::IoError {
            path: self.config.out_dir.clone(),
            message: e.to_string(),
        })?;

        for (filename, content) in &generated.files {
            let path = self.config.out_dir.join(filename);
            std::fs::write(&path, content).map_err(|e| CompilerError::IoError {
                path,
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct CompileResult {
    /// Number of entities projected.
    pub entities: usize,
    /// Number of model modules generated.
    pub modules: usize,
    /// Total number of enums inlined across all modules.
    pub enums: usize,
    /// Whether a base declaration was found.
    pub base: bool,
    /// Relation targets that named no known entity.
    pub unresolved: Vec<UnresolvedReference>,
}
