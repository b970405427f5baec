//! Convert TypeScript AST to language-agnostic IR.

use std::path::PathBuf;

use crate::ir::{
    ClassIR, DeclarationSet, Decoration, EnumIR, EnumValue, HookMethod, PropertyIR, SourceModule,
    TypeRef,
};
use super::ast::*;

/// Converts parsed TypeScript files to the declaration source set.
///
/// Files keep the order they were given in; enums are indexed by name across
/// all files, a later declaration replacing an earlier one.
pub fn to_ir(files: &[ParsedFile], source_dir: PathBuf) -> DeclarationSet {
    let mut set = DeclarationSet::new(source_dir);

    for file in files {
        for decl in &file.enums {
            let converted = convert_enum(decl);
            if let Some(previous) = set.enums.insert(converted.name.clone(), converted) {
                tracing::warn!(
                    name = %previous.name,
                    at = %decl.span,
                    "enum declared more than once, keeping the last declaration"
                );
            }
        }

        set.modules.push(SourceModule {
            path: file.path.clone(),
            classes: file.classes.iter().map(convert_class).collect(),
        });
    }

    set
}

/// Converts a class declaration to a ClassIR.
fn convert_class(class: &ClassDecl) -> ClassIR {
    let properties = class
        .properties
        .iter()
        .filter(|p| !p.is_static)
        .map(convert_property)
        .collect();

    // Only lifecycle-decorated methods matter; everything else is behaviour.
    let hooks = class
        .methods
        .iter()
        .filter_map(|m| {
            let kinds: Vec<_> = convert_decorators(&m.decorators)
                .into_iter()
                .filter_map(|d| match d {
                    Decoration::Lifecycle(kind) => Some(kind),
                    _ => None,
                })
                .collect();
            if kinds.is_empty() {
                return None;
            }
            Some(HookMethod {
                name: m.name.clone(),
                kinds,
                assigned: assignment_targets(&m.body),
            })
        })
        .collect();

    ClassIR {
        name: class.name.clone(),
        decorations: convert_decorators(&class.decorators),
        properties,
        hooks,
        span: class.span.clone(),
    }
}

fn convert_property(prop: &PropertyDecl) -> PropertyIR {
    PropertyIR {
        name: prop.name.clone(),
        type_text: prop.type_text.clone(),
        typ: prop.type_node.as_ref().map(convert_type_node),
        optional: prop.optional,
        decorations: convert_decorators(&prop.decorators),
    }
}

fn convert_decorators(decorators: &[DecoratorDecl]) -> Vec<Decoration> {
    decorators
        .iter()
        .map(|d| Decoration::from_decorator(&d.name, relation_target(d)))
        .collect()
}

/// Target entity named by the first decorator argument.
///
/// Only meaningful for relation decorators, but cheap to compute for all.
fn relation_target(decorator: &DecoratorDecl) -> Option<String> {
    match decorator.arguments.first()? {
        DecoratorArgument::String(name) | DecoratorArgument::Identifier(name) => Some(name.clone()),
        DecoratorArgument::ArrowFunction { returns } => returns.clone(),
        DecoratorArgument::Other(_) => None,
    }
}

/// Distinct `this.<name> = ...` targets among the top-level statements, in order.
fn assignment_targets(body: &[Statement]) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for statement in body {
        if let Statement::Assignment {
            target: AssignmentTarget::ThisMember(name),
            ..
        } = statement
        {
            if !targets.contains(name) {
                targets.push(name.clone());
            }
        }
    }
    targets
}

/// Converts a TypeNode to a TypeRef.
fn convert_type_node(node: &TypeNode) -> TypeRef {
    match node {
        TypeNode::Primitive(text) => TypeRef::Primitive(text.clone()),
        TypeNode::Reference(name) => TypeRef::Reference(name.clone()),
        TypeNode::Array(inner) => TypeRef::Array(Box::new(convert_type_node(inner))),
        TypeNode::Union(members) => TypeRef::Union(members.iter().map(convert_type_node).collect()),
        TypeNode::Generic { name, arguments } => TypeRef::Generic {
            name: name.clone(),
            arguments: arguments.iter().map(convert_type_node).collect(),
        },
    }
}

fn convert_enum(decl: &EnumDecl) -> EnumIR {
    let members = decl
        .members
        .iter()
        .map(|m| {
            let value = m.initializer.as_ref().map(|init| match init {
                EnumInitializer::String(s) => EnumValue::Text(s.clone()),
                EnumInitializer::Number(n) => EnumValue::Number(n.clone()),
                EnumInitializer::Expression(e) => EnumValue::Expression(e.clone()),
            });
            (m.name.clone(), value)
        })
        .collect();

    EnumIR::from_members(decl.name.clone(), members)
}
