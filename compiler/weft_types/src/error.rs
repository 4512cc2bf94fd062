//! Type comparison and construction errors.

use std::fmt;

use crate::Type;

/// Error from comparing or constructing types and values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Two types are not structurally identical.
    #[error("type mismatch in {context}: expected `{expected}`, found `{found}`")]
    Mismatch {
        /// The type on the left of the comparison.
        expected: Type,
        /// The type on the right of the comparison.
        found: Type,
        /// Innermost place where the types differed.
        context: MismatchContext,
    },

    /// A struct field or function argument name was used twice.
    #[error("duplicate name `{name}`")]
    DuplicateName { name: String },

    /// An expression was refined to a second, different type.
    #[error("type was already set to `{previous}`, cannot change it to `{next}`")]
    AlreadySet { previous: Type, next: Type },
}

impl TypeError {
    pub(crate) fn mismatch(expected: &Type, found: &Type, context: MismatchContext) -> Self {
        TypeError::Mismatch {
            expected: expected.clone(),
            found: found.clone(),
            context,
        }
    }
}

/// Where inside a type a comparison failed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MismatchContext {
    /// The outermost type differed (kind or primitive).
    #[default]
    TopLevel,
    /// The named struct field differed or is missing on one side.
    Field(String),
    /// The zero-based function argument differed.
    Arg(usize),
    /// The function return type differed.
    Return,
}

impl fmt::Display for MismatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchContext::TopLevel => f.write_str("types"),
            MismatchContext::Field(name) => write!(f, "struct field `{name}`"),
            MismatchContext::Arg(index) => write!(f, "function arg {index}"),
            MismatchContext::Return => f.write_str("function return type"),
        }
    }
}
