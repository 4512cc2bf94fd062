//! Partial solution: the types the solver has resolved so far.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use weft_types::{Type, TypeError};

use crate::Expr;

/// Map from expression to resolved type. Grows monotonically across rounds.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    types: FxHashMap<Expr, Type>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, expr: &Expr) -> Option<&Type> {
        self.types.get(expr)
    }

    /// Record `ty` for `expr`.
    ///
    /// A type already recorded is never overwritten: inserting a type that
    /// does not compare equal to it is an error.
    pub fn insert(&mut self, expr: Expr, ty: Type) -> Result<(), TypeError> {
        match self.types.entry(expr) {
            Entry::Occupied(entry) => {
                entry
                    .get()
                    .compare(&ty)
                    .map_err(|_| TypeError::AlreadySet {
                        previous: entry.get().clone(),
                        next: ty,
                    })
            }
            Entry::Vacant(entry) => {
                entry.insert(ty);
                Ok(())
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &Type)> + '_ {
        self.types.iter()
    }
}
