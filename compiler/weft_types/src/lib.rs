//! Type and value model for weft function graphs.
//!
//! This crate is the small adapter layer every other weft crate speaks:
//! - `Type`: tagged descriptor over primitives, structs, function signatures
//!   and the not-yet-known `Unresolved` marker
//! - `Value`: immutable runtime datum carrying enough shape to recover its `Type`
//! - `TypeError`: structural comparison and construction failures
//!
//! # Comparison
//!
//! `Type::compare` is the structural check used by the solver and by
//! functions during unification. Comparing against `Unresolved` always
//! succeeds, since it carries no information yet.

mod error;
mod ty;
mod value;

pub use error::{MismatchContext, TypeError};
pub use ty::{Fields, Prim, Signature, Type};
pub use value::{StructValue, Value};
