//! `_struct_lookup_optional`: struct member lookup with a fallback.
//!
//! Signature: `func(struct T, field str, optional R) R`.
//!
//! If the struct type `T` has a member named by `field`, the call returns
//! that member and `R` is the member's type. Otherwise it returns `optional`.
//! Unlike a plain lookup, a struct type lacking the member is not a type
//! error, so the selector must be known before the container's type can say
//! anything about `R`. The compiler inserts this function itself; user code
//! cannot name it.
//!
//! Typing lives in `unify`, signature fixing in `build`, execution in
//! `stream`.

mod build;
mod stream;
mod unify;

use std::fmt;

use weft_types::{Type, TypeError, Value};
use weft_unify::{Expr, Invariant};

use crate::{BuildError, Func, FuncError, Info, Init, Node, PolyFunc};

/// Reserved name of the function.
pub const STRUCT_LOOKUP_OPTIONAL: &str = "_struct_lookup_optional";

const ARG_STRUCT: &str = "struct";
const ARG_FIELD: &str = "field";
const ARG_OPTIONAL: &str = "optional";

const ARGS: [&str; 3] = [ARG_STRUCT, ARG_FIELD, ARG_OPTIONAL];

/// The signature fixed by a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Compiled {
    container: Type,
    out: Type,
}

/// The `_struct_lookup_optional` function.
#[derive(Debug, Default)]
pub struct StructLookupOptionalFunc {
    compiled: Option<Compiled>,
}

impl StructLookupOptionalFunc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry constructor.
    pub fn boxed() -> Box<dyn PolyFunc> {
        Box::new(Self::new())
    }

    /// Build the input record a node of this function consumes.
    pub fn input(
        container: Value,
        field: impl Into<String>,
        fallback: Value,
    ) -> Result<Value, TypeError> {
        Value::structure([
            (ARG_STRUCT, container),
            (ARG_FIELD, Value::Str(field.into())),
            (ARG_OPTIONAL, fallback),
        ])
    }

    fn compiled(&self) -> Result<&Compiled, BuildError> {
        let compiled = self.compiled.as_ref().ok_or(BuildError::Unspecified)?;
        compiled.validate()?;
        Ok(compiled)
    }
}

impl Func for StructLookupOptionalFunc {
    fn name(&self) -> &'static str {
        STRUCT_LOOKUP_OPTIONAL
    }

    fn arg_name(&self, index: usize) -> Result<&'static str, FuncError> {
        ARGS.get(index).copied().ok_or(FuncError::ArgIndex {
            index,
            len: ARGS.len(),
        })
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.compiled().map(|_| ())
    }

    fn info(&self) -> Info {
        Info {
            pure: true,
            memo: false,
            sig: self
                .compiled
                .as_ref()
                .and_then(|compiled| compiled.signature().ok()),
            err: self.validate().err(),
        }
    }

    fn init(&self, init: Init) -> Result<Box<dyn Node>, FuncError> {
        let compiled = self.compiled()?.clone();
        Ok(Box::new(stream::StructLookupOptionalNode::new(compiled, init)))
    }
}

impl PolyFunc for StructLookupOptionalFunc {
    fn unify(&self, site: &Expr) -> Result<Vec<Invariant>, FuncError> {
        Ok(unify::invariants(site)?)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(sig = %sig))]
    fn build(&mut self, sig: &Type) -> Result<Type, BuildError> {
        let compiled = Compiled::from_signature(sig)?;
        let built = compiled.signature()?;
        tracing::debug!(%built, "built signature");
        self.compiled = Some(compiled);
        Ok(built)
    }
}

impl fmt::Display for StructLookupOptionalFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(STRUCT_LOOKUP_OPTIONAL)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
