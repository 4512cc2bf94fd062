//! Invariant vocabulary for weft type inference.
//!
//! Polymorphic functions describe their typing rules to the external solver
//! as a list of [`Invariant`]s. Most are plain facts; one kind, the
//! [`Generator`], is re-run by the solver every round with the invariants and
//! partial [`Solution`] it has so far, and answers with more facts once it
//! has learned enough.
//!
//! This crate only defines the vocabulary and a few helpers functions use to
//! derive facts. The solver itself lives elsewhere.

mod error;
mod expr;
mod generator;
mod invariant;
mod learned;
mod solution;

pub use error::{InvariantError, UnifyError};
pub use expr::{Expr, ExprId, ExprKind};
pub use generator::{GenerateResult, Generator};
pub use invariant::{find_call_args, CallArgs, Invariant, WrapFunc, WrapStruct};
pub use learned::Learned;
pub use solution::Solution;
