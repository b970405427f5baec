//! Relation resolution.

use crate::ir::{Cardinality, RelationKind, TypeRef};
use super::registry::EntityRegistry;
use super::{model_name, ImportEntry, ImportSource};

/// Generated type reference for a relation property plus the import it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationResolution {
    pub typ: TypeRef,
    /// `None` for self relations.
    pub import: Option<ImportEntry>,
}

/// Resolves a relation decoration naming `target` on `current_entity`.
///
/// The reference is always synthesized as `<Target>Model` (an array for
/// to-many kinds). When the target isn't registered the import source is
/// [`ImportSource::Unresolved`].
pub fn resolve_relation(
    kind: RelationKind,
    target: &str,
    current_entity: &str,
    registry: &EntityRegistry,
) -> RelationResolution {
    let reference = TypeRef::Reference(model_name(target));
    let typ = match kind.cardinality() {
        Cardinality::ToOne => reference,
        Cardinality::ToMany => TypeRef::Array(Box::new(reference)),
    };

    if target == current_entity {
        return RelationResolution { typ, import: None };
    }

    let source = match registry.module_of(target) {
        Some(module) => ImportSource::Module(module.to_string()),
        None => ImportSource::Unresolved,
    };

    RelationResolution {
        typ,
        import: Some(ImportEntry {
            name: model_name(target),
            source,
        }),
    }
}
