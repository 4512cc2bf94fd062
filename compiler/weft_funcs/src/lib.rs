//! Polymorphic, streaming functions for weft graphs.
//!
//! A function goes through two phases:
//! - **Compile time**: [`PolyFunc::unify`] describes the function's typing
//!   rules to the solver as invariants; once the solver has converged,
//!   [`PolyFunc::build`] fixes one concrete signature and
//!   [`Func::validate`] checks it.
//! - **Run time**: [`Func::init`] binds channels and a cancellation token and
//!   returns a [`Node`], whose [`Node::stream`] loop turns input records into
//!   result values until the input is exhausted or the token fires.
//!
//! Functions are found by name through a [`FuncRegistry`].

mod cancel;
mod error;
mod func;
mod registry;
mod struct_lookup_optional;

use std::sync::Once;

pub use cancel::{cancel_pair, CancelSource, CancelToken};
pub use error::{BuildError, FuncError, RegistryError, StreamError};
pub use func::{spawn_node, Exit, Func, Info, Init, Node, PolyFunc};
pub use registry::{is_internal, Constructor, FuncRegistry};
pub use struct_lookup_optional::{StructLookupOptionalFunc, STRUCT_LOOKUP_OPTIONAL};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=weft_funcs=debug` or
/// `RUST_LOG=weft_unify=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
