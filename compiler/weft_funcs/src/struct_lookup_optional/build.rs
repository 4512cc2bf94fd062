use weft_types::{Signature, Type};

use super::{Compiled, ARGS, ARG_FIELD, ARG_OPTIONAL, ARG_STRUCT, STRUCT_LOOKUP_OPTIONAL};
use crate::BuildError;

impl Compiled {
    /// Fix the signature from the solved function type.
    ///
    /// Argument names in `typ` are ignored; only positions matter.
    pub(super) fn from_signature(typ: &Type) -> Result<Self, BuildError> {
        let Some(sig) = typ.as_func() else {
            return Err(BuildError::NotFunc { found: typ.clone() });
        };
        if sig.arity() != ARGS.len() {
            return Err(BuildError::Arity {
                func: STRUCT_LOOKUP_OPTIONAL,
                expected: ARGS.len(),
                found: sig.arity(),
            });
        }

        let out = sig.ret();
        if !out.is_resolved() {
            return Err(BuildError::MissingReturn);
        }

        let container = specified(sig, 0, "first")?;
        let field = specified(sig, 1, "second")?;
        field
            .compare(&Type::STR)
            .map_err(BuildError::SelectorNotText)?;
        let fallback = specified(sig, 2, "third")?;
        fallback
            .compare(out)
            .map_err(BuildError::FallbackMismatch)?;

        Ok(Compiled {
            container: container.clone(),
            out: out.clone(),
        })
    }

    pub(super) fn validate(&self) -> Result<(), BuildError> {
        if self.container.as_struct().is_none() {
            return Err(BuildError::NotStruct {
                found: self.container.clone(),
            });
        }
        if !self.out.is_resolved() {
            return Err(BuildError::MissingReturn);
        }
        Ok(())
    }

    /// `func(struct T, field str, optional R) R`
    pub(super) fn signature(&self) -> Result<Type, BuildError> {
        Type::func(
            [
                (ARG_STRUCT, self.container.clone()),
                (ARG_FIELD, Type::STR),
                (ARG_OPTIONAL, self.out.clone()),
            ],
            self.out.clone(),
        )
        .map_err(BuildError::Signature)
    }
}

fn specified<'a>(
    sig: &'a Signature,
    index: usize,
    position: &'static str,
) -> Result<&'a Type, BuildError> {
    match sig.arg(index) {
        Some((_, ty)) if ty.is_resolved() => Ok(ty),
        _ => Err(BuildError::MissingArg { position }),
    }
}
