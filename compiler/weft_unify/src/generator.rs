//! Generator invariants.

use std::fmt;
use std::sync::Arc;

use crate::{Expr, Invariant, Solution, UnifyError};

/// What a generator returns each time the solver runs it.
pub type GenerateResult = Result<Vec<Invariant>, UnifyError>;

type GenerateFn = dyn Fn(&[Invariant], &Solution) -> GenerateResult + Send + Sync;

/// An invariant that derives more invariants as the solver learns types.
///
/// Holds the call-site handle it was created for plus a pure transition
/// function. The solver may run it any number of times; each run sees the
/// full invariant list and the current partial solution, and must terminate
/// without looping on its own.
#[derive(Clone)]
pub struct Generator {
    site: Expr,
    generate: Arc<GenerateFn>,
}

impl Generator {
    pub fn new<F>(site: Expr, generate: F) -> Self
    where
        F: Fn(&[Invariant], &Solution) -> GenerateResult + Send + Sync + 'static,
    {
        Generator {
            site,
            generate: Arc::new(generate),
        }
    }

    /// The expression this generator was created for.
    #[inline]
    pub fn site(&self) -> &Expr {
        &self.site
    }

    /// Run one round.
    pub fn generate(&self, invariants: &[Invariant], solution: &Solution) -> GenerateResult {
        let result = (self.generate)(invariants, solution);
        match &result {
            Ok(derived) => {
                tracing::trace!(site = %self.site, count = derived.len(), "generator derived invariants");
            }
            Err(err) if err.is_recoverable() => {
                tracing::trace!(site = %self.site, "generator made no progress");
            }
            Err(err) => {
                tracing::debug!(site = %self.site, %err, "generator failed");
            }
        }
        result
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}
