//! Unification errors.

use weft_types::{Type, TypeError};

/// An invariant was constructed with an invalid shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A function invariant must bind at least one argument.
    #[error("function invariant needs at least one argument")]
    NoArgs,

    /// The same argument or field name appears twice.
    #[error("duplicate name `{name}` in invariant")]
    DuplicateName { name: String },
}

/// Error returned by a generator or by a function's unification step.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    /// Nothing new could be derived this round. The solver should try again
    /// once it has learned more.
    #[error("couldn't generate new invariants")]
    NoProgress,

    /// The call site passes the wrong number of arguments.
    #[error("unable to build function with {found} args, expected {expected}")]
    ArityMismatch { expected: usize, found: usize },

    /// An argument is known to have a kind the function cannot accept.
    #[error("unable to build function with {position} arg of kind: {found}, expected {expected}")]
    UnexpectedKind {
        position: &'static str,
        expected: &'static str,
        found: Type,
    },

    /// Two independently learned types for the same unknown disagree.
    #[error("{origin} is inconsistent with {previous}: {mismatch}")]
    Inconsistent {
        /// Where the conflicting type came from.
        origin: &'static str,
        /// Where the type learned first came from.
        previous: &'static str,
        mismatch: TypeError,
    },

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl UnifyError {
    /// Whether the solver may retry in a later round.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, UnifyError::NoProgress)
    }
}
