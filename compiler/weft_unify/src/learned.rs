//! Incremental learning of one unknown type from several sources.

use weft_types::Type;

use crate::UnifyError;

/// The type of one unknown, as far as it has been learned.
///
/// Each observation names its origin. Every observation must compare equal
/// to the one kept so far, otherwise learning fails with
/// [`UnifyError::Inconsistent`] naming both origins. An agreeing observation
/// with fewer `Unresolved` holes replaces the kept one.
#[derive(Clone, Debug, Default)]
pub struct Learned {
    known: Option<(Type, &'static str)>,
}

impl Learned {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `ty` from `origin`.
    ///
    /// Returns `Ok(true)` if this observation taught something new: the type
    /// itself, or a more resolved form of it. `Unresolved` observations carry
    /// no information and are ignored.
    pub fn learn(&mut self, ty: &Type, origin: &'static str) -> Result<bool, UnifyError> {
        if !ty.is_resolved() {
            return Ok(false);
        }
        match &self.known {
            Some((previous, previous_origin)) => {
                previous
                    .compare(ty)
                    .map_err(|mismatch| UnifyError::Inconsistent {
                        origin,
                        previous: *previous_origin,
                        mismatch,
                    })?;
                if ty.holes() >= previous.holes() {
                    return Ok(false);
                }
                tracing::debug!(%ty, origin, "refined type");
                self.known = Some((ty.clone(), origin));
                Ok(true)
            }
            None => {
                tracing::debug!(%ty, origin, "learned type");
                self.known = Some((ty.clone(), origin));
                Ok(true)
            }
        }
    }

    pub fn get(&self) -> Option<&Type> {
        self.known.as_ref().map(|(ty, _)| ty)
    }

    /// Where the current type was first learned from.
    pub fn origin(&self) -> Option<&'static str> {
        self.known.as_ref().map(|(_, origin)| *origin)
    }
}
