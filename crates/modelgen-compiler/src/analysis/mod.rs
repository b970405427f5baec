//! Projection of entity declarations onto model types.
//!
//! The passes run in a fixed order over a [`DeclarationSet`]:
//! 1. [`registry`] maps every entity to its module (completes first)
//! 2. [`base`] projects the shared base declaration
//! 3. [`classify`] decides, per entity property, whether and how it appears
//!    in the model, calling into [`relation`] and [`enums`]
//!
//! The result is a [`ProjectedModels`] that the emitter turns into text.

pub mod base;
pub mod classify;
pub mod enums;
pub mod registry;
pub mod relation;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::CompilerConfig;
use crate::diagnostic::CompilerError;
use crate::ir::{ColumnKind, DeclarationSet, EnumIR, RelationKind, TypeRef};
pub use base::BaseModel;
pub use registry::EntityRegistry;

/// Suffix appended to an entity name to form its model name.
pub const MODEL_SUFFIX: &str = "Model";

/// Name of the shared base model type.
pub const BASE_MODEL_NAME: &str = "BaseModel";

/// Module id of the generated base file.
pub const BASE_MODULE_ID: &str = "base";

/// Model name for an entity name.
pub fn model_name(entity: &str) -> String {
    format!("{}{}", entity, MODEL_SUFFIX)
}

/// Where an imported model lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A generated module id.
    Module(String),
    /// The referenced entity isn't registered.
    Unresolved,
}

/// A model type a generated module must import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub name: String,
    pub source: ImportSource,
}

/// A relation whose target entity could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub entity: String,
    pub property: String,
    pub target: String,
}

/// Why a property appears in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOrigin {
    Relation(RelationKind),
    /// Join metadata without a relation decoration.
    JoinMetadata,
    Column(ColumnKind),
    /// Assigned by a lifecycle hook, otherwise undecorated.
    LifecycleImplicit,
}

/// Type of a model property.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelType {
    /// Declared type text, emitted as written.
    Verbatim(String),
    /// A type rewritten during projection.
    Resolved(TypeRef),
}

/// A property that made it into a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedProperty {
    pub name: String,
    pub origin: PropertyOrigin,
    pub typ: ModelType,
    pub optional: bool,
}

/// The model projected from one entity.
#[derive(Debug, Clone)]
pub struct EntityModel {
    /// Entity name (the model is `<entity>Model`).
    pub entity: String,
    pub properties: Vec<ClassifiedProperty>,
}

impl EntityModel {
    pub fn model_name(&self) -> String {
        model_name(&self.entity)
    }
}

/// Per-module state accumulated while classifying one source file.
#[derive(Debug)]
pub struct ModuleContext {
    pub module_id: String,
    /// Distinct imports in first-use order.
    pub imports: Vec<ImportEntry>,
    pub enums: BTreeMap<String, EnumIR>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ModuleContext {
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            imports: Vec::new(),
            enums: BTreeMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Adds an import unless the same `(name, source)` pair is already present.
    pub fn require_import(&mut self, entry: ImportEntry) {
        if !self.imports.contains(&entry) {
            self.imports.push(entry);
        }
    }
}

/// One generated module: every entity of one source file.
#[derive(Debug, Clone)]
pub struct ModelModule {
    pub module_id: String,
    pub source_path: PathBuf,
    pub entities: Vec<EntityModel>,
    pub imports: Vec<ImportEntry>,
    pub enums: BTreeMap<String, EnumIR>,
}

/// Everything the emitter needs.
#[derive(Debug, Clone, Default)]
pub struct ProjectedModels {
    /// `None` when the source set has no base declaration.
    pub base: Option<BaseModel>,
    /// Generated modules in source order.
    pub modules: Vec<ModelModule>,
    /// Distinct module ids in first-discovery order, as re-exported by the barrel.
    pub barrel_modules: Vec<String>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ProjectedModels {
    pub fn entity_count(&self) -> usize {
        self.modules.iter().map(|m| m.entities.len()).sum()
    }

    pub fn enum_count(&self) -> usize {
        self.modules.iter().map(|m| m.enums.len()).sum()
    }
}

/// Projects every entity of the source set onto its model.
pub fn project(set: &DeclarationSet, config: &CompilerConfig) -> ProjectedModels {
    let registry = EntityRegistry::build(set, config);

    let base = match set.find_class(&config.base_class) {
        Some(class) => Some(base::project_base(class)),
        None => {
            tracing::debug!(base_class = %config.base_class, "no base declaration found, skipping base model");
            None
        }
    };

    let mut projected = ProjectedModels {
        base,
        barrel_modules: registry.modules().to_vec(),
        ..Default::default()
    };

    for source in &set.modules {
        let entities: Vec<_> = source.entities().collect();
        if entities.is_empty() {
            continue;
        }

        let module_id = config.module_id(&source.path);
        if projected.modules.iter().any(|m| m.module_id == module_id) {
            tracing::warn!(
                module = %module_id,
                path = %source.path.display(),
                "module id produced by more than one source file, the later file wins"
            );
        }

        let mut ctx = ModuleContext::new(module_id);
        let models = entities
            .into_iter()
            .map(|entity| classify::classify_entity(entity, &registry, set, &mut ctx))
            .collect();

        projected.unresolved.append(&mut ctx.unresolved);
        projected.modules.push(ModelModule {
            module_id: ctx.module_id,
            source_path: source.path.clone(),
            entities: models,
            imports: ctx.imports,
            enums: ctx.enums,
        });
    }

    projected
}

/// Rejects modules and models that would overwrite the base file or shadow
/// `BaseModel`.
pub fn check_reserved_names(projected: &ProjectedModels) -> Result<(), CompilerError> {
    for module in &projected.modules {
        if module.module_id == BASE_MODULE_ID {
            return Err(CompilerError::ReservedName {
                name: module.module_id.clone(),
                path: module.source_path.clone(),
            });
        }
        if let Some(entity) = module
            .entities
            .iter()
            .find(|e| e.model_name() == BASE_MODEL_NAME)
        {
            return Err(CompilerError::ReservedName {
                name: entity.entity.clone(),
                path: module.source_path.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;
    use crate::ir::{ClassIR, Decoration, PropertyIR, SourceModule};

    fn property(name: &str, ty: &str, decorations: Vec<Decoration>) -> PropertyIR {
        PropertyIR {
            name: name.to_string(),
            type_text: Some(ty.to_string()),
            typ: Some(TypeRef::Primitive(ty.to_string())),
            optional: false,
            decorations,
        }
    }

    fn class(name: &str, entity: bool, properties: Vec<PropertyIR>) -> ClassIR {
        ClassIR {
            name: name.to_string(),
            decorations: if entity { vec![Decoration::Entity] } else { vec![] },
            properties,
            hooks: vec![],
            span: Span::new(PathBuf::new(), 0, 0),
        }
    }

    #[test]
    fn test_module_context_dedupes_imports() {
        let mut ctx = ModuleContext::new("user");
        let entry = ImportEntry {
            name: "PostModel".to_string(),
            source: ImportSource::Module("post".to_string()),
        };
        ctx.require_import(entry.clone());
        ctx.require_import(entry);
        assert_eq!(ctx.imports.len(), 1);
    }

    #[test]
    fn test_project_skips_files_without_entities() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/base.entity.ts"),
            classes: vec![class(
                "BaseEntity",
                false,
                vec![property("id", "number", vec![Decoration::Column(ColumnKind::PrimaryGenerated)])],
            )],
        });
        set.modules.push(SourceModule {
            path: PathBuf::from("src/tag.entity.ts"),
            classes: vec![class(
                "Tag",
                true,
                vec![property("label", "string", vec![Decoration::Column(ColumnKind::Plain)])],
            )],
        });

        let projected = project(&set, &CompilerConfig::default());

        assert!(projected.base.is_some());
        assert_eq!(projected.modules.len(), 1);
        assert_eq!(projected.modules[0].module_id, "tag");
        assert_eq!(projected.entity_count(), 1);
        assert!(projected.unresolved.is_empty());
    }

    #[test]
    fn test_barrel_modules_follow_registry_order() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        for (path, name) in [("src/user.entity.ts", "User"), ("src/post.entity.ts", "Post"), ("src/admin/user.entity.ts", "Admin")] {
            set.modules.push(SourceModule {
                path: PathBuf::from(path),
                classes: vec![class(name, true, vec![])],
            });
        }

        let projected = project(&set, &CompilerConfig::default());

        assert_eq!(projected.modules.len(), 3);
        assert_eq!(projected.barrel_modules, vec!["user".to_string(), "post".to_string()]);
    }

    #[test]
    fn test_base_module_id_is_reserved() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/base.entity.ts"),
            classes: vec![class("Audit", true, vec![])],
        });

        let projected = project(&set, &CompilerConfig::default());

        match check_reserved_names(&projected) {
            Err(CompilerError::ReservedName { name, path }) => {
                assert_eq!(name, "base");
                assert_eq!(path, PathBuf::from("src/base.entity.ts"));
            }
            other => panic!("expected reserved name error, got {:?}", other),
        }
    }

    #[test]
    fn test_base_model_name_is_reserved() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/common.entity.ts"),
            classes: vec![class("Base", true, vec![])],
        });

        let projected = project(&set, &CompilerConfig::default());

        assert!(matches!(
            check_reserved_names(&projected),
            Err(CompilerError::ReservedName { name, .. }) if name == "Base"
        ));
    }

    #[test]
    fn test_non_entity_base_file_is_allowed() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/base.entity.ts"),
            classes: vec![class("BaseEntity", false, vec![])],
        });
        set.modules.push(SourceModule {
            path: PathBuf::from("src/tag.entity.ts"),
            classes: vec![class("Tag", true, vec![])],
        });

        let projected = project(&set, &CompilerConfig::default());

        assert!(check_reserved_names(&projected).is_ok());
    }

    #[test]
    fn test_project_without_base() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/tag.entity.ts"),
            classes: vec![class("Tag", true, vec![])],
        });

        let projected = project(&set, &CompilerConfig::default());

        assert!(projected.base.is_none());
        assert_eq!(projected.modules.len(), 1);
        assert!(projected.modules[0].entities[0].properties.is_empty());
    }

    #[test]
    fn test_project_collects_unresolved_relations() {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        set.modules.push(SourceModule {
            path: PathBuf::from("src/user.entity.ts"),
            classes: vec![class(
                "User",
                true,
                vec![property(
                    "ghost",
                    "Ghost",
                    vec![Decoration::Relation {
                        kind: RelationKind::ManyToOne,
                        target: Some("Ghost".to_string()),
                    }],
                )],
            )],
        });

        let projected = project(&set, &CompilerConfig::default());

        assert_eq!(
            projected.unresolved,
            vec![UnresolvedReference {
                entity: "User".to_string(),
                property: "ghost".to_string(),
                target: "Ghost".to_string(),
            }]
        );
    }
}
