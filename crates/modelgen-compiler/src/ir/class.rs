//! Class-level intermediate representation.

use std::collections::BTreeSet;

use crate::diagnostic::Span;
use super::{Decoration, HookKind, TypeRef};

/// IR representation of a declared class (entity, base declaration or plain class).
#[derive(Debug, Clone)]
pub struct ClassIR {
    /// Class name.
    pub name: String,

    /// Decorations on the class itself.
    pub decorations: Vec<Decoration>,

    /// Instance properties in declaration order.
    pub properties: Vec<PropertyIR>,

    /// Lifecycle-decorated methods in declaration order.
    pub hooks: Vec<HookMethod>,

    pub span: Span,
}

/// A declared instance property.
#[derive(Debug, Clone)]
pub struct PropertyIR {
    pub name: String,

    /// Declared static type exactly as written, `None` when unannotated.
    pub type_text: Option<String>,

    /// Parsed form of the declared type.
    pub typ: Option<TypeRef>,

    /// Declared with `?`.
    pub optional: bool,

    pub decorations: Vec<Decoration>,
}

/// A method carrying at least one lifecycle decoration.
#[derive(Debug, Clone)]
pub struct HookMethod {
    pub name: String,
    pub kinds: Vec<HookKind>,
    /// Property names assigned as `this.<name> = ...` at the top level of the body.
    pub assigned: Vec<String>,
}

impl ClassIR {
    /// Whether the class is marked as an entity.
    pub fn is_entity(&self) -> bool {
        self.decorations.iter().any(|d| matches!(d, Decoration::Entity))
    }

    /// Names assigned directly by any lifecycle hook of this class.
    pub fn hook_assigned(&self) -> BTreeSet<&str> {
        self.hooks
            .iter()
            .flat_map(|h| h.assigned.iter().map(String::as_str))
            .collect()
    }
}

impl PropertyIR {
    /// Declared type text, `any` for unannotated properties.
    pub fn declared_type(&self) -> &str {
        self.type_text.as_deref().unwrap_or("any")
    }
}
