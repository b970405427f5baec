//! TypeScript-specific AST types.

use std::path::PathBuf;
use crate::diagnostic::Span;

/// A parsed TypeScript file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub classes: Vec<ClassDecl>,
    pub enums: Vec<EnumDecl>,
    /// tree-sitter recovered from at least one syntax error.
    pub has_errors: bool,
}

/// A decorator application, e.g. `@ManyToOne(() => User, { eager: true })`.
#[derive(Debug, Clone)]
pub struct DecoratorDecl {
    pub name: String,
    pub arguments: Vec<DecoratorArgument>,
    pub span: Span,
}

/// A decorator call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoratorArgument {
    /// 'Post'
    String(String),
    /// Post
    Identifier(String),
    /// () => Post, type => Post
    ArrowFunction {
        /// Identifier the arrow body evaluates to, if it is a bare identifier.
        returns: Option<String>,
    },
    /// Anything else, verbatim.
    Other(String),
}

/// Type AST nodes.
#[derive(Debug, Clone)]
pub enum TypeNode {
    /// string, number, literal types and anything not modelled further.
    Primitive(String),

    /// T[]
    Array(Box<TypeNode>),

    /// T | U
    Union(Vec<TypeNode>),

    /// Reference to another type
    Reference(String),

    /// Name<A, B>
    Generic {
        name: String,
        arguments: Vec<TypeNode>,
    },
}

/// A class declaration.
#[derive(Debug)]
pub struct ClassDecl {
    pub name: String,
    pub decorators: Vec<DecoratorDecl>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub exported: bool,
    pub is_abstract: bool,
    pub span: Span,
}

/// A class property declaration.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub decorators: Vec<DecoratorDecl>,
    pub type_node: Option<TypeNode>,
    /// Type annotation source text without the leading colon.
    pub type_text: Option<String>,
    pub optional: bool,
    pub is_static: bool,
    pub span: Span,
}

/// A method declaration.
#[derive(Debug)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<DecoratorDecl>,
    /// Top-level statements of the body.
    pub body: Vec<Statement>,
    pub span: Span,
}

/// A top-level statement in a method body.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `<target> = <value>;`
    Assignment {
        target: AssignmentTarget,
        value: String,
        span: Span,
    },
    /// Control flow, declarations, calls and everything else.
    Other {
        kind: String,
        span: Span,
    },
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentTarget {
    /// this.<name>
    ThisMember(String),
    /// Any other assignable expression, verbatim.
    Other(String),
}

/// An enum declaration.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMemberDecl>,
    pub exported: bool,
    pub span: Span,
}

/// An enum member with its initializer, if written.
#[derive(Debug, Clone)]
pub struct EnumMemberDecl {
    pub name: String,
    pub initializer: Option<EnumInitializer>,
}

/// An enum member initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumInitializer {
    String(String),
    Number(String),
    Expression(String),
}
