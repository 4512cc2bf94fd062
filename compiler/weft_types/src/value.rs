//! Runtime values.

use std::fmt;

use crate::{Fields, Type, TypeError};

/// An immutable runtime datum.
///
/// Equality is structural; struct members are matched by name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    Struct(StructValue),
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Build a struct value from ordered `(name, value)` pairs.
    pub fn structure<I, S>(fields: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        StructValue::new(fields).map(Value::Struct)
    }

    /// The type this value inhabits.
    pub fn ty(&self) -> Type {
        match self {
            Value::Bool(_) => Type::BOOL,
            Value::Str(_) => Type::STR,
            Value::Int(_) => Type::INT,
            Value::Float(_) => Type::FLOAT,
            Value::Struct(st) => st.ty(),
        }
    }

    /// Raw string contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(st) => Some(st),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Struct(st) => {
                f.write_str("struct{")?;
                for (i, (name, value)) in st.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Struct instance: ordered, name-unique members.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructValue {
    fields: Vec<(String, Value)>,
}

impl StructValue {
    /// Collect members, rejecting duplicate names.
    pub fn new<I, S>(fields: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            if out.iter().any(|(existing, _)| *existing == name) {
                return Err(TypeError::DuplicateName { name });
            }
            out.push((name, value));
        }
        Ok(StructValue { fields: out })
    }

    /// Look up a member by name. `None` means the struct has no such member.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The struct type of this value, members in declaration order.
    pub fn ty(&self) -> Type {
        Type::Struct(Fields::from_unique(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.ty()))
                .collect(),
        ))
    }
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.lookup(name).is_some_and(|theirs| theirs == value))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
