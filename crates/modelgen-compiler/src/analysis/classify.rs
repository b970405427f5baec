//! Property classification.
//!
//! Decides per entity property whether it appears in the model and with
//! which type. Precedence is relation, then join metadata, then column, then
//! lifecycle-implicit; anything else is left out of the model.

use std::collections::BTreeSet;

use crate::ir::{ClassIR, ColumnKind, DeclarationSet, Decoration, PropertyIR, TypeRef};
use super::enums::capture_enum;
use super::registry::EntityRegistry;
use super::relation::resolve_relation;
use super::{
    model_name, ClassifiedProperty, EntityModel, ImportEntry, ImportSource, ModelType,
    ModuleContext, PropertyOrigin, UnresolvedReference,
};

/// Classifies every property of `entity`, recording imports, enums and
/// unresolved references in `ctx`.
pub fn classify_entity(
    entity: &ClassIR,
    registry: &EntityRegistry,
    set: &DeclarationSet,
    ctx: &mut ModuleContext,
) -> EntityModel {
    let implicit = entity.hook_assigned();

    let properties: Vec<_> = entity
        .properties
        .iter()
        .filter_map(|property| classify_property(entity, property, &implicit, registry, set, ctx))
        .collect();

    tracing::debug!(
        entity = %entity.name,
        module = %ctx.module_id,
        included = properties.len(),
        declared = entity.properties.len(),
        "classified entity"
    );

    EntityModel {
        entity: entity.name.clone(),
        properties,
    }
}

/// Why `property` belongs in a model, or `None` when it doesn't.
pub fn property_origin(property: &PropertyIR, implicit: &BTreeSet<&str>) -> Option<PropertyOrigin> {
    let mut join_metadata = false;
    let mut column = None;

    for decoration in &property.decorations {
        match decoration {
            Decoration::Relation { kind, .. } => return Some(PropertyOrigin::Relation(*kind)),
            Decoration::JoinMetadata => join_metadata = true,
            Decoration::Column(kind) => {
                column.get_or_insert(*kind);
            }
            Decoration::Entity | Decoration::Lifecycle(_) | Decoration::Other(_) => {}
        }
    }

    if join_metadata {
        return Some(PropertyOrigin::JoinMetadata);
    }
    if let Some(kind) = column {
        return Some(PropertyOrigin::Column(kind));
    }
    implicit
        .contains(property.name.as_str())
        .then_some(PropertyOrigin::LifecycleImplicit)
}

fn classify_property(
    entity: &ClassIR,
    property: &PropertyIR,
    implicit: &BTreeSet<&str>,
    registry: &EntityRegistry,
    set: &DeclarationSet,
    ctx: &mut ModuleContext,
) -> Option<ClassifiedProperty> {
    let origin = property_origin(property, implicit)?;

    let typ = match origin {
        PropertyOrigin::Relation(kind) => match relation_target(property) {
            Some(target) => {
                let resolution = resolve_relation(kind, target, &entity.name, registry);
                if let Some(import) = resolution.import {
                    if import.source == ImportSource::Unresolved {
                        tracing::warn!(
                            entity = %entity.name,
                            property = %property.name,
                            target,
                            "relation target is not a known entity, import omitted"
                        );
                        ctx.unresolved.push(UnresolvedReference {
                            entity: entity.name.clone(),
                            property: property.name.clone(),
                            target: target.to_string(),
                        });
                    }
                    ctx.require_import(import);
                }
                ModelType::Resolved(resolution.typ)
            }
            None => {
                tracing::debug!(
                    entity = %entity.name,
                    property = %property.name,
                    "relation target not extractable, using declared type"
                );
                resolve_declared(property, &entity.name, registry, set, ctx)
            }
        },
        PropertyOrigin::Column(ColumnKind::Virtual) => {
            ModelType::Verbatim(property.declared_type().to_string())
        }
        PropertyOrigin::JoinMetadata | PropertyOrigin::Column(_) | PropertyOrigin::LifecycleImplicit => {
            resolve_declared(property, &entity.name, registry, set, ctx)
        }
    };

    Some(ClassifiedProperty {
        name: property.name.clone(),
        origin,
        typ,
        optional: property.optional,
    })
}

fn relation_target(property: &PropertyIR) -> Option<&str> {
    property.decorations.iter().find_map(|d| match d {
        Decoration::Relation { target, .. } => target.as_deref(),
        _ => None,
    })
}

/// Fallback typing from the declared type.
///
/// Entity references become model references (with an import unless they
/// name the current entity) and enum references pull the enum into the
/// module. The declared text is kept when nothing had to be rewritten.
fn resolve_declared(
    property: &PropertyIR,
    current_entity: &str,
    registry: &EntityRegistry,
    set: &DeclarationSet,
    ctx: &mut ModuleContext,
) -> ModelType {
    let Some(typ) = &property.typ else {
        return ModelType::Verbatim(property.declared_type().to_string());
    };

    let mut rewritten = false;
    let resolved = rewrite_type(typ, current_entity, registry, set, ctx, &mut rewritten);

    if rewritten {
        ModelType::Resolved(resolved)
    } else {
        ModelType::Verbatim(property.declared_type().to_string())
    }
}

fn rewrite_type(
    typ: &TypeRef,
    current_entity: &str,
    registry: &EntityRegistry,
    set: &DeclarationSet,
    ctx: &mut ModuleContext,
    rewritten: &mut bool,
) -> TypeRef {
    match typ {
        TypeRef::Reference(name) => {
            if let Some(module) = registry.module_of(name) {
                *rewritten = true;
                if name != current_entity {
                    ctx.require_import(ImportEntry {
                        name: model_name(name),
                        source: ImportSource::Module(module.to_string()),
                    });
                }
                TypeRef::Reference(model_name(name))
            } else {
                capture_enum(name, set, ctx);
                TypeRef::Reference(name.clone())
            }
        }
        TypeRef::Array(inner) => TypeRef::Array(Box::new(rewrite_type(
            inner,
            current_entity,
            registry,
            set,
            ctx,
            rewritten,
        ))),
        TypeRef::Union(members) => TypeRef::Union(
            members
                .iter()
                .map(|m| rewrite_type(m, current_entity, registry, set, ctx, rewritten))
                .collect(),
        ),
        TypeRef::Generic { name, arguments } => TypeRef::Generic {
            name: name.clone(),
            arguments: arguments
                .iter()
                .map(|a| rewrite_type(a, current_entity, registry, set, ctx, rewritten))
                .collect(),
        },
        TypeRef::Primitive(_) => typ.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::diagnostic::Span;
    use crate::ir::{EnumIR, EnumValue, HookKind, HookMethod, RelationKind, SourceModule};
    use std::path::PathBuf;

    fn property(name: &str, ty: Option<(&str, TypeRef)>, decorations: Vec<Decoration>) -> PropertyIR {
        PropertyIR {
            name: name.to_string(),
            type_text: ty.as_ref().map(|(text, _)| text.to_string()),
            typ: ty.map(|(_, typ)| typ),
            optional: false,
            decorations,
        }
    }

    fn primitive(text: &str) -> Option<(&str, TypeRef)> {
        Some((text, TypeRef::Primitive(text.to_string())))
    }

    fn reference(text: &str) -> Option<(&str, TypeRef)> {
        Some((text, TypeRef::Reference(text.to_string())))
    }

    fn column() -> Vec<Decoration> {
        vec![Decoration::Column(ColumnKind::Plain)]
    }

    fn relation(kind: RelationKind, target: Option<&str>) -> Vec<Decoration> {
        vec![Decoration::Relation {
            kind,
            target: target.map(str::to_string),
        }]
    }

    fn entity(name: &str, properties: Vec<PropertyIR>) -> ClassIR {
        ClassIR {
            name: name.to_string(),
            decorations: vec![Decoration::Entity],
            properties,
            hooks: vec![],
            span: Span::new(PathBuf::new(), 0, 0),
        }
    }

    fn source_set(classes: Vec<(&str, ClassIR)>) -> DeclarationSet {
        let mut set = DeclarationSet::new(PathBuf::from("src"));
        for (file, class) in classes {
            set.modules.push(SourceModule {
                path: PathBuf::from(file),
                classes: vec![class],
            });
        }
        set
    }

    fn classify(set: &DeclarationSet, entity_name: &str, module: &str) -> (EntityModel, ModuleContext) {
        let registry = EntityRegistry::build(set, &CompilerConfig::default());
        let mut ctx = ModuleContext::new(module);
        let class = set.find_class(entity_name).expect("entity in set");
        let model = classify_entity(class, &registry, set, &mut ctx);
        (model, ctx)
    }

    fn typ(model: &EntityModel, name: &str) -> ModelType {
        model
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.typ.clone())
            .expect("property in model")
    }

    #[test]
    fn test_user_post_relations() {
        let user = entity(
            "User",
            vec![
                property("name", primitive("string"), column()),
                property("posts", reference("Post"), relation(RelationKind::OneToMany, Some("Post"))),
            ],
        );
        let post = entity(
            "Post",
            vec![property("author", reference("User"), relation(RelationKind::ManyToOne, Some("User")))],
        );
        let set = source_set(vec![("src/user.entity.ts", user), ("src/post.entity.ts", post)]);

        let (model, ctx) = classify(&set, "User", "user");
        assert_eq!(typ(&model, "name"), ModelType::Verbatim("string".to_string()));
        assert_eq!(
            typ(&model, "posts"),
            ModelType::Resolved(TypeRef::Array(Box::new(TypeRef::Reference("PostModel".to_string()))))
        );
        assert_eq!(
            ctx.imports,
            vec![ImportEntry {
                name: "PostModel".to_string(),
                source: ImportSource::Module("post".to_string()),
            }]
        );

        let (model, ctx) = classify(&set, "Post", "post");
        assert_eq!(
            typ(&model, "author"),
            ModelType::Resolved(TypeRef::Reference("UserModel".to_string()))
        );
        assert_eq!(ctx.imports[0].source, ImportSource::Module("user".to_string()));
    }

    #[test]
    fn test_unclassified_properties_are_excluded() {
        let user = entity(
            "User",
            vec![
                property("name", primitive("string"), column()),
                property("cache", primitive("string"), vec![Decoration::Other("Exclude".to_string())]),
                property("scratch", primitive("number"), vec![]),
            ],
        );
        let set = source_set(vec![("src/user.entity.ts", user)]);

        let (model, _) = classify(&set, "User", "user");
        let names: Vec<_> = model.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_hook_assigned_property_included_once() {
        let mut user = entity(
            "User",
            vec![
                property("name", primitive("string"), column()),
                property("fullName", primitive("string"), vec![]),
            ],
        );
        for (method, kind) in [("computeOnLoad", HookKind::AfterLoad), ("computeOnInsert", HookKind::BeforeInsert)] {
            user.hooks.push(HookMethod {
                name: method.to_string(),
                kinds: vec![kind],
                assigned: vec!["fullName".to_string()],
            });
        }
        let set = source_set(vec![("src/user.entity.ts", user)]);

        let (model, _) = classify(&set, "User", "user");
        let full_name: Vec<_> = model.properties.iter().filter(|p| p.name == "fullName").collect();
        assert_eq!(full_name.len(), 1);
        assert_eq!(full_name[0].origin, PropertyOrigin::LifecycleImplicit);
        assert_eq!(full_name[0].typ, ModelType::Verbatim("string".to_string()));
    }

    #[test]
    fn test_enum_reference_captured() {
        let user = entity("User", vec![property("status", reference("Status"), column())]);
        let mut set = source_set(vec![("src/user.entity.ts", user)]);
        set.enums.insert(
            "Status".to_string(),
            EnumIR::from_members(
                "Status",
                vec![
                    ("Active".to_string(), Some(EnumValue::Text("active".to_string()))),
                    ("Inactive".to_string(), Some(EnumValue::Text("inactive".to_string()))),
                ],
            ),
        );

        let (model, ctx) = classify(&set, "User", "user");
        assert_eq!(typ(&model, "status"), ModelType::Verbatim("Status".to_string()));
        assert!(ctx.enums.contains_key("Status"));
        assert!(ctx.imports.is_empty());
    }

    #[test]
    fn test_virtual_column_keeps_declared_text() {
        let user = entity(
            "User",
            vec![
                property(
                    "postCount",
                    reference("Post"),
                    vec![Decoration::Column(ColumnKind::Virtual)],
                ),
                property("posts", reference("Post"), relation(RelationKind::OneToMany, Some("Post"))),
            ],
        );
        let post = entity("Post", vec![]);
        let set = source_set(vec![("src/user.entity.ts", user), ("src/post.entity.ts", post)]);

        let (model, _) = classify(&set, "User", "user");
        assert_eq!(typ(&model, "postCount"), ModelType::Verbatim("Post".to_string()));
    }

    #[test]
    fn test_relation_precedes_column() {
        let mut decorations = column();
        decorations.extend(relation(RelationKind::ManyToOne, Some("Post")));
        let user = entity("User", vec![property("post", reference("Post"), decorations)]);
        let post = entity("Post", vec![]);
        let set = source_set(vec![("src/user.entity.ts", user), ("src/post.entity.ts", post)]);

        let (model, _) = classify(&set, "User", "user");
        assert_eq!(model.properties[0].origin, PropertyOrigin::Relation(RelationKind::ManyToOne));
    }

    #[test]
    fn test_relation_without_target_falls_back_to_declared_type() {
        let user = entity(
            "User",
            vec![property(
                "posts",
                Some(("Post[]", TypeRef::Array(Box::new(TypeRef::Reference("Post".to_string()))))),
                relation(RelationKind::OneToMany, None),
            )],
        );
        let post = entity("Post", vec![]);
        let set = source_set(vec![("src/user.entity.ts", user), ("src/post.entity.ts", post)]);

        let (model, ctx) = classify(&set, "User", "user");
        assert_eq!(
            typ(&model, "posts"),
            ModelType::Resolved(TypeRef::Array(Box::new(TypeRef::Reference("PostModel".to_string()))))
        );
        assert_eq!(ctx.imports.len(), 1);
    }

    #[test]
    fn test_join_metadata_alone_uses_declared_type() {
        let user = entity(
            "User",
            vec![property("profileId", primitive("number"), vec![Decoration::JoinMetadata])],
        );
        let set = source_set(vec![("src/user.entity.ts", user)]);

        let (model, _) = classify(&set, "User", "user");
        assert_eq!(model.properties[0].origin, PropertyOrigin::JoinMetadata);
        assert_eq!(typ(&model, "profileId"), ModelType::Verbatim("number".to_string()));
    }

    #[test]
    fn test_self_reference_has_no_import() {
        let category = entity(
            "Category",
            vec![
                property("parent", reference("Category"), relation(RelationKind::ManyToOne, Some("Category"))),
                property(
                    "siblings",
                    Some(("Category[]", TypeRef::Array(Box::new(TypeRef::Reference("Category".to_string()))))),
                    column(),
                ),
            ],
        );
        let set = source_set(vec![("src/category.entity.ts", category)]);

        let (model, ctx) = classify(&set, "Category", "category");
        assert_eq!(
            typ(&model, "parent"),
            ModelType::Resolved(TypeRef::Reference("CategoryModel".to_string()))
        );
        assert_eq!(
            typ(&model, "siblings"),
            ModelType::Resolved(TypeRef::Array(Box::new(TypeRef::Reference("CategoryModel".to_string()))))
        );
        assert!(ctx.imports.is_empty());
    }

    #[test]
    fn test_unannotated_and_optional() {
        let mut note = property("note", None, column());
        note.optional = true;
        let user = entity("User", vec![note]);
        let set = source_set(vec![("src/user.entity.ts", user)]);

        let (model, _) = classify(&set, "User", "user");
        assert_eq!(typ(&model, "note"), ModelType::Verbatim("any".to_string()));
        assert!(model.properties[0].optional);
    }

    #[test]
    fn test_lazy_relation_uses_decorator_target() {
        let user = entity(
            "User",
            vec![property(
                "profile",
                Some((
                    "Promise<Profile>",
                    TypeRef::Generic {
                        name: "Promise".to_string(),
                        arguments: vec![TypeRef::Reference("Profile".to_string())],
                    },
                )),
                relation(RelationKind::OneToOne, Some("Profile")),
            )],
        );
        let profile = entity("Profile", vec![]);
        let set = source_set(vec![("src/user.entity.ts", user), ("src/profile.entity.ts", profile)]);

        let (model, _) = classify(&set, "User", "user");
        assert_eq!(
            typ(&model, "profile"),
            ModelType::Resolved(TypeRef::Reference("ProfileModel".to_string()))
        );
    }

    #[test]
    fn test_unresolved_relation_recorded() {
        let user = entity(
            "User",
            vec![property("ghost", reference("Ghost"), relation(RelationKind::ManyToOne, Some("Ghost")))],
        );
        let set = source_set(vec![("src/user.entity.ts", user)]);

        let (model, ctx) = classify(&set, "User", "user");
        assert_eq!(
            typ(&model, "ghost"),
            ModelType::Resolved(TypeRef::Reference("GhostModel".to_string()))
        );
        assert_eq!(ctx.imports[0].source, ImportSource::Unresolved);
        assert_eq!(ctx.unresolved.len(), 1);
        assert_eq!(ctx.unresolved[0].target, "Ghost");
    }
}
