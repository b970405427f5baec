//! TypeScript parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{CompilerError, Span};
use super::ast::*;

/// TypeScript parser.
pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    /// Creates a new TypeScript parser.
    pub fn new() -> Result<Self, CompilerError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| CompilerError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a TypeScript source file.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile, CompilerError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CompilerError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);
        visitor.visit_program(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            classes: visitor.classes,
            enums: visitor.enums,
            has_errors: root.has_error(),
        })
    }
}

/// AST visitor that extracts declarations from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    classes: Vec<ClassDecl>,
    enums: Vec<EnumDecl>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            classes: Vec::new(),
            enums: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path.to_path_buf(),
            node.start_position().row,
            node.start_position().column,
        )
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn visit_program(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "export_statement" => self.visit_export(child),
                "class_declaration" | "abstract_class_declaration" => {
                    if let Some(class) = self.visit_class(child, Vec::new(), false) {
                        self.classes.push(class);
                    }
                }
                "enum_declaration" => {
                    if let Some(decl) = self.visit_enum(child, false) {
                        self.enums.push(decl);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_export(&mut self, node: Node) {
        // `@Entity() export class Foo {}` hangs the decorators off the export statement.
        let mut decorators = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(decorator) = self.visit_decorator(child) {
                        decorators.push(decorator);
                    }
                }
                "class_declaration" | "abstract_class_declaration" | "class" => {
                    let inherited = std::mem::take(&mut decorators);
                    if let Some(class) = self.visit_class(child, inherited, true) {
                        self.classes.push(class);
                    }
                }
                "enum_declaration" => {
                    if let Some(decl) = self.visit_enum(child, true) {
                        self.enums.push(decl);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_decorator(&self, node: Node) -> Option<DecoratorDecl> {
        let mut cursor = node.walk();
        let expression = node.named_children(&mut cursor).next()?;

        let (name, arguments) = match expression.kind() {
            "call_expression" => {
                let function = expression.child_by_field_name("function")?;
                let arguments = expression
                    .child_by_field_name("arguments")
                    .map(|args| self.visit_decorator_arguments(args))
                    .unwrap_or_default();
                (self.callee_name(function), arguments)
            }
            _ => (self.callee_name(expression), Vec::new()),
        };

        if name.is_empty() {
            return None;
        }

        Some(DecoratorDecl {
            name,
            arguments,
            span: self.span(node),
        })
    }

    /// `Entity` for `Entity`, `orm.Entity` and `(Entity)`.
    fn callee_name(&self, node: Node) -> String {
        match node.kind() {
            "member_expression" => node
                .child_by_field_name("property")
                .map(|p| self.node_text(p).to_string())
                .unwrap_or_default(),
            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                inner.map(|n| self.callee_name(n)).unwrap_or_default()
            }
            _ => self.node_text(node).to_string(),
        }
    }

    fn visit_decorator_arguments(&self, node: Node) -> Vec<DecoratorArgument> {
        let mut arguments = Vec::new();
        let mut cursor = node.walk();

        for arg in node.named_children(&mut cursor) {
            let argument = match arg.kind() {
                "string" | "template_string" => DecoratorArgument::String(self.extract_string_value(arg)),
                "identifier" => DecoratorArgument::Identifier(self.node_text(arg).to_string()),
                "arrow_function" => {
                    let returns = arg
                        .child_by_field_name("body")
                        .filter(|body| body.kind() == "identifier")
                        .map(|body| self.node_text(body).to_string());
                    DecoratorArgument::ArrowFunction { returns }
                }
                "comment" => continue,
                _ => DecoratorArgument::Other(self.node_text(arg).to_string()),
            };
            arguments.push(argument);
        }

        arguments
    }

    fn visit_class(&mut self, node: Node, mut decorators: Vec<DecoratorDecl>, exported: bool) -> Option<ClassDecl> {
        let mut name = String::new();
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let is_abstract = node.kind() == "abstract_class_declaration";

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(decorator) = self.visit_decorator(child) {
                        decorators.push(decorator);
                    }
                }
                "type_identifier" | "identifier" => {
                    if name.is_empty() {
                        name = self.node_text(child).to_string();
                    }
                }
                "class_body" => {
                    let (props, meths) = self.visit_class_body(child);
                    properties = props;
                    methods = meths;
                }
                _ => {}
            }
        }

        if name.is_empty() {
            return None;
        }

        Some(ClassDecl {
            name,
            decorators,
            properties,
            methods,
            exported,
            is_abstract,
            span: self.span(node),
        })
    }

    fn visit_class_body(&self, node: Node) -> (Vec<PropertyDecl>, Vec<MethodDecl>) {
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        // Method decorators precede the method_definition as siblings in the class body.
        let mut pending = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(decorator) = self.visit_decorator(child) {
                        pending.push(decorator);
                    }
                }
                "public_field_definition" | "property_definition" => {
                    let leading = std::mem::take(&mut pending);
                    if let Some(prop) = self.visit_property_decl(child, leading) {
                        properties.push(prop);
                    }
                }
                "method_definition" => {
                    let leading = std::mem::take(&mut pending);
                    if let Some(method) = self.visit_method_decl(child, leading) {
                        methods.push(method);
                    }
                }
                _ => {}
            }
        }

        (properties, methods)
    }

    fn visit_property_decl(&self, node: Node, mut decorators: Vec<DecoratorDecl>) -> Option<PropertyDecl> {
        let mut name = String::new();
        let mut type_node = None;
        let mut type_text = None;
        let mut optional = false;
        let mut is_static = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(decorator) = self.visit_decorator(child) {
                        decorators.push(decorator);
                    }
                }
                "static" => is_static = true,
                "?" => optional = true,
                "property_identifier" | "private_property_identifier" => {
                    if name.is_empty() {
                        name = self.node_text(child).to_string();
                    }
                }
                "type_annotation" => {
                    let mut inner_cursor = child.walk();
                    if let Some(inner_child) = child.named_children(&mut inner_cursor).next() {
                        type_text = Some(self.node_text(inner_child).to_string());
                        type_node = Some(self.visit_type_node(inner_child));
                    };
                }
                _ => {}
            }
        }

        if name.is_empty() {
            return None;
        }

        Some(PropertyDecl {
            name,
            decorators,
            type_node,
            type_text,
            optional,
            is_static,
            span: self.span(node),
        })
    }

    fn visit_type_node(&self, node: Node) -> TypeNode {
        match node.kind() {
            "type_identifier" | "nested_type_identifier" => {
                TypeNode::Reference(self.node_text(node).to_string())
            }
            "array_type" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                match inner {
                    Some(inner) => TypeNode::Array(Box::new(self.visit_type_node(inner))),
                    None => TypeNode::Primitive(self.node_text(node).to_string()),
                }
            }
            "union_type" => {
                let mut variants = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    // Flatten nested unions
                    match self.visit_type_node(child) {
                        TypeNode::Union(nested) => variants.extend(nested),
                        variant => variants.push(variant),
                    }
                }
                TypeNode::Union(variants)
            }
            "generic_type" => {
                let mut name = String::new();
                let mut arguments = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "type_arguments" => {
                            let mut arg_cursor = child.walk();
                            for arg in child.named_children(&mut arg_cursor) {
                                arguments.push(self.visit_type_node(arg));
                            }
                        }
                        _ => {
                            if name.is_empty() {
                                name = self.node_text(child).to_string();
                            }
                        }
                    }
                }
                if name.is_empty() {
                    return TypeNode::Primitive(self.node_text(node).to_string());
                }
                TypeNode::Generic { name, arguments }
            }
            "parenthesized_type" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                match inner {
                    Some(inner) => self.visit_type_node(inner),
                    None => TypeNode::Primitive(self.node_text(node).to_string()),
                }
            }
            _ => {
                // predefined_type, literal_type, object types, tuples, ...
                TypeNode::Primitive(self.node_text(node).to_string())
            }
        }
    }

    fn visit_method_decl(&self, node: Node, mut decorators: Vec<DecoratorDecl>) -> Option<MethodDecl> {
        let mut name = String::new();
        let mut body = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "decorator" => {
                    if let Some(decorator) = self.visit_decorator(child) {
                        decorators.push(decorator);
                    }
                }
                "property_identifier" | "private_property_identifier" => {
                    name = self.node_text(child).to_string();
                }
                "statement_block" => {
                    body = self.visit_statement_block(child);
                }
                _ => {}
            }
        }

        if name.is_empty() {
            return None;
        }

        Some(MethodDecl {
            name,
            decorators,
            body,
            span: self.span(node),
        })
    }

    /// Collects the top-level statements of a block. Nested blocks are not entered.
    fn visit_statement_block(&self, node: Node) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            statements.push(self.visit_statement(child));
        }

        statements
    }

    fn visit_statement(&self, node: Node) -> Statement {
        if node.kind() == "expression_statement" {
            let mut cursor = node.walk();
            let expression = node.named_children(&mut cursor).next();
            if let Some(expression) = expression.filter(|e| e.kind() == "assignment_expression") {
                if let (Some(left), Some(right)) = (
                    expression.child_by_field_name("left"),
                    expression.child_by_field_name("right"),
                ) {
                    return Statement::Assignment {
                        target: self.visit_assignment_target(left),
                        value: self.node_text(right).to_string(),
                        span: self.span(node),
                    };
                }
            }
        }

        Statement::Other {
            kind: node.kind().to_string(),
            span: self.span(node),
        }
    }

    fn visit_assignment_target(&self, node: Node) -> AssignmentTarget {
        if node.kind() == "member_expression" {
            let object = node.child_by_field_name("object");
            let property = node.child_by_field_name("property");
            if let (Some(object), Some(property)) = (object, property) {
                if object.kind() == "this" && property.kind() == "property_identifier" {
                    return AssignmentTarget::ThisMember(self.node_text(property).to_string());
                }
            }
        }
        AssignmentTarget::Other(self.node_text(node).to_string())
    }

    fn visit_enum(&self, node: Node, exported: bool) -> Option<EnumDecl> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n).to_string())?;
        let mut members = Vec::new();

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                match child.kind() {
                    "enum_assignment" => {
                        let member_name = child
                            .child_by_field_name("name")
                            .map(|n| self.property_name(n))
                            .unwrap_or_default();
                        let initializer = child
                            .child_by_field_name("value")
                            .map(|v| self.visit_enum_initializer(v));
                        if !member_name.is_empty() {
                            members.push(EnumMemberDecl {
                                name: member_name,
                                initializer,
                            });
                        }
                    }
                    "comment" => {}
                    _ => {
                        members.push(EnumMemberDecl {
                            name: self.property_name(child),
                            initializer: None,
                        });
                    }
                }
            }
        }

        Some(EnumDecl {
            name,
            members,
            exported,
            span: self.span(node),
        })
    }

    fn visit_enum_initializer(&self, node: Node) -> EnumInitializer {
        match node.kind() {
            "string" => EnumInitializer::String(self.extract_string_value(node)),
            "number" => EnumInitializer::Number(self.node_text(node).to_string()),
            "unary_expression" => {
                let text: String = self.node_text(node).split_whitespace().collect();
                if text.parse::<f64>().is_ok() {
                    EnumInitializer::Number(text)
                } else {
                    EnumInitializer::Expression(self.node_text(node).to_string())
                }
            }
            _ => EnumInitializer::Expression(self.node_text(node).to_string()),
        }
    }

    /// Member name for `Foo`, `'foo-bar'` and `"Foo"`.
    fn property_name(&self, node: Node) -> String {
        match node.kind() {
            "string" => self.extract_string_value(node),
            _ => self.node_text(node).to_string(),
        }
    }

    /// Value of a string literal, with escape sequences decoded.
    fn extract_string_value(&self, node: Node) -> String {
        if node.kind() != "string" {
            return strip_quotes(self.node_text(node)).to_string();
        }

        let mut value = String::new();
        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            match part.kind() {
                "escape_sequence" => unescape_into(self.node_text(part), &mut value),
                _ => value.push_str(self.node_text(part)),
            }
        }
        value
    }
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\''))
            || (text.starts_with('`') && text.ends_with('`')))
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Decodes one escape sequence (`\n`, `\x41`, `\u{1F600}`, ...) onto `out`.
fn unescape_into(sequence: &str, out: &mut String) {
    let Some(body) = sequence.strip_prefix('\\') else {
        out.push_str(sequence);
        return;
    };

    let decoded = match body {
        "n" => Some('\n'),
        "r" => Some('\r'),
        "t" => Some('\t'),
        "b" => Some('\u{8}'),
        "f" => Some('\u{c}'),
        "v" => Some('\u{b}'),
        "0" => Some('\0'),
        _ if body.starts_with('x') || body.starts_with('u') => {
            let hex = body[1..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        }
        // Line continuation.
        _ if body.starts_with('\n') || body.starts_with('\r') => return,
        _ => body.chars().next(),
    };

    match decoded {
        Some(c) => out.push(c),
        None => out.push_str(sequence),
    }
}
