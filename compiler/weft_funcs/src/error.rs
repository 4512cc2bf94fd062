//! Function errors, one enum per phase.

use weft_types::{Type, TypeError};
use weft_unify::UnifyError;

/// A solved signature violates the function's contract, or the function was
/// used before a valid build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("input type must be of kind func, found {found}")]
    NotFunc { found: Type },

    #[error("the {func} function needs exactly {expected} args, found {found}")]
    Arity {
        func: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("return type of function must be specified")]
    MissingReturn,

    /// `position` is "first", "second", ...
    #[error("{position} arg must be specified")]
    MissingArg { position: &'static str },

    #[error("field must be an str: {0}")]
    SelectorNotText(TypeError),

    #[error("optional arg must match return type: {0}")]
    FallbackMismatch(TypeError),

    #[error("invalid signature: {0}")]
    Signature(TypeError),

    /// Build has not run yet.
    #[error("type is still unspecified")]
    Unspecified,

    #[error("type must be a kind of struct, found {found}")]
    NotStruct { found: Type },
}

/// A running node received input that breaks its contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("received empty field")]
    EmptySelector,

    #[error("input field changed from: `{from}`, to: `{to}`")]
    SelectorChanged { from: String, to: String },

    #[error("input is missing the `{name}` arg")]
    MissingArg { name: &'static str },

    #[error("input arg `{name}` must be of kind {expected}, found {found}")]
    WrongKind {
        name: &'static str,
        expected: &'static str,
        found: Type,
    },

    #[error("result does not match the built return type: {0}")]
    ResultType(TypeError),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("function `{name}` is already registered")]
    Duplicate { name: &'static str },
}

/// Any function error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FuncError {
    #[error("index {index} exceeds arg length of {len}")]
    ArgIndex { index: usize, len: usize },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Unify(#[from] UnifyError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            StreamError::SelectorChanged {
                from: "a".to_owned(),
                to: "b".to_owned()
            }
            .to_string(),
            "input field changed from: `a`, to: `b`"
        );
        assert_eq!(
            FuncError::ArgIndex { index: 3, len: 3 }.to_string(),
            "index 3 exceeds arg length of 3"
        );
        assert_eq!(
            FuncError::from(BuildError::MissingArg { position: "first" }).to_string(),
            "first arg must be specified"
        );
    }
}
