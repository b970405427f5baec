//! Enum declarations.

/// An enum declared somewhere in the source set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumIR {
    pub name: String,
    pub members: Vec<EnumMember>,
}

/// One enum member with its resolved literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    /// `None` only when TypeScript can't infer a value either
    /// (an uninitialized member following a non-numeric one).
    pub value: Option<EnumValue>,
}

/// Literal value of an enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    /// Numeric literal text, e.g. `3` or `-1`.
    Number(String),
    /// String literal content without quotes.
    Text(String),
    /// Any other initializer expression, kept verbatim.
    Expression(String),
}

impl EnumIR {
    /// Builds an enum from `(name, initializer)` pairs, assigning TypeScript's
    /// implicit auto-increment values to uninitialized members.
    pub fn from_members(name: impl Into<String>, raw: Vec<(String, Option<EnumValue>)>) -> Self {
        let mut members = Vec::with_capacity(raw.len());
        let mut next: Option<i64> = Some(0);

        for (member, value) in raw {
            let value = match value {
                Some(v) => Some(v),
                None => next.map(|n| EnumValue::Number(n.to_string())),
            };
            next = match &value {
                Some(EnumValue::Number(n)) => n.parse::<i64>().ok().map(|n| n + 1),
                _ => None,
            };
            members.push(EnumMember { name: member, value });
        }

        Self {
            name: name.into(),
            members,
        }
    }
}
