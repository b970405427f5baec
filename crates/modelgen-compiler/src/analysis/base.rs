//! Base model projection.

use crate::ir::{ClassIR, Decoration};
use super::{ClassifiedProperty, ModelType, PropertyOrigin};

/// The shared `BaseModel` type every entity model extends.
#[derive(Debug, Clone)]
pub struct BaseModel {
    /// Name of the class it was projected from.
    pub source: String,
    pub properties: Vec<ClassifiedProperty>,
}

/// Projects the base declaration.
///
/// Keeps column properties and properties assigned by the class's own
/// lifecycle hooks. Types stay exactly as declared.
pub fn project_base(class: &ClassIR) -> BaseModel {
    let implicit = class.hook_assigned();

    let properties: Vec<_> = class
        .properties
        .iter()
        .filter_map(|property| {
            let column = property.decorations.iter().find_map(|d| match d {
                Decoration::Column(kind) => Some(*kind),
                _ => None,
            });
            let origin = match column {
                Some(kind) => PropertyOrigin::Column(kind),
                None if implicit.contains(property.name.as_str()) => PropertyOrigin::LifecycleImplicit,
                None => return None,
            };
            Some(ClassifiedProperty {
                name: property.name.clone(),
                origin,
                typ: ModelType::Verbatim(property.declared_type().to_string()),
                optional: property.optional,
            })
        })
        .collect();

    tracing::debug!(base = %class.name, properties = properties.len(), "projected base model");

    BaseModel {
        source: class.name.clone(),
        properties,
    }
}
