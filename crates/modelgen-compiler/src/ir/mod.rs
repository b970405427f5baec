//! Language-agnostic intermediate representation.
//!
//! This IR is produced by language frontends and consumed by the analysis
//! passes. It holds the declaration source set: every parsed class with its
//! decorations, properties and lifecycle hooks, plus every enum declared
//! anywhere in the source tree.

mod class;
mod decoration;
mod enums;

pub use class::{ClassIR, HookMethod, PropertyIR};
pub use decoration::{Cardinality, ColumnKind, Decoration, HookKind, RelationKind};
pub use enums::{EnumIR, EnumMember, EnumValue};

use std::collections::HashMap;
use std::path::PathBuf;

/// A declared type, as far as the projection needs to look into it.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// Predefined and literal types, or any type syntax not modelled further (verbatim).
    Primitive(String),

    /// Reference to a named type.
    Reference(String),

    /// T[]
    Array(Box<TypeRef>),

    /// Name<A, B>
    Generic {
        name: String,
        arguments: Vec<TypeRef>,
    },

    /// T | U
    Union(Vec<TypeRef>),
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceModule {
    pub path: PathBuf,
    pub classes: Vec<ClassIR>,
}

impl SourceModule {
    /// Entity-marked classes of this file, in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &ClassIR> {
        self.classes.iter().filter(|c| c.is_entity())
    }
}

/// The complete declaration source set.
#[derive(Debug)]
pub struct DeclarationSet {
    /// Source files in discovery order.
    pub modules: Vec<SourceModule>,
    /// Every enum in the source tree, keyed by name.
    pub enums: HashMap<String, EnumIR>,
    pub source_dir: PathBuf,
}

impl DeclarationSet {
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            modules: Vec::new(),
            enums: HashMap::new(),
            source_dir,
        }
    }

    /// Finds the first class with the given name.
    pub fn find_class(&self, name: &str) -> Option<&ClassIR> {
        self.modules
            .iter()
            .flat_map(|m| m.classes.iter())
            .find(|c| c.name == name)
    }
}
