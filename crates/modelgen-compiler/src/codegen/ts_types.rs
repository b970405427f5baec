//! TypeScript type text from projected types.

use crate::analysis::ModelType;
use crate::ir::TypeRef;

/// Converts a TypeRef to a TypeScript type string.
pub fn to_ts_type(typ: &TypeRef) -> String {
    match typ {
        TypeRef::Primitive(text) | TypeRef::Reference(text) => text.clone(),
        TypeRef::Array(inner) => {
            if needs_parens(inner) {
                format!("({})[]", to_ts_type(inner))
            } else {
                format!("{}[]", to_ts_type(inner))
            }
        }
        TypeRef::Generic { name, arguments } => {
            let arguments: Vec<String> = arguments.iter().map(to_ts_type).collect();
            format!("{}<{}>", name, arguments.join(", "))
        }
        TypeRef::Union(members) => members
            .iter()
            .map(to_ts_type)
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

/// Whether an array element type must be parenthesized before `[]`.
fn needs_parens(typ: &TypeRef) -> bool {
    match typ {
        TypeRef::Union(members) => members.len() > 1,
        // Verbatim text such as `() => void` or `keyof T`.
        TypeRef::Primitive(text) => text.contains(' ') && !text.starts_with('{'),
        TypeRef::Reference(_) | TypeRef::Array(_) | TypeRef::Generic { .. } => false,
    }
}

/// Type text of a model property.
pub fn model_type(typ: &ModelType) -> String {
    match typ {
        ModelType::Verbatim(text) => text.clone(),
        ModelType::Resolved(typ) => to_ts_type(typ),
    }
}

/// Single-quoted TypeScript string literal.
pub fn quote(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('\'');
    for c in value.chars() {
        match c {
            '\'' => output.push_str("\\'"),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            other => output.push(other),
        }
    }
    output.push('\'');
    output
}
