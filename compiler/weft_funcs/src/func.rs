//! Function lifecycle traits.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender};
use weft_types::{Type, Value};
use weft_unify::{Expr, Invariant};

use crate::{BuildError, CancelToken, FuncError, StreamError};

/// A function usable in a graph.
pub trait Func: Send {
    /// The name the function is registered under.
    fn name(&self) -> &'static str;

    /// Name of the argument at `index`.
    fn arg_name(&self, index: usize) -> Result<&'static str, FuncError>;

    /// Check the built signature. Fails before a successful build.
    fn validate(&self) -> Result<(), BuildError>;

    fn info(&self) -> Info;

    /// Bind channels and cancellation, producing the runnable node.
    ///
    /// Requires a valid build. The function itself stays reusable.
    fn init(&self, init: Init) -> Result<Box<dyn Node>, FuncError>;
}

/// A function whose signature is decided by type unification.
pub trait PolyFunc: Func {
    /// Typing rules for the call site whose function expression is `site`.
    ///
    /// Pure: calling it twice yields independent, equivalent lists, each
    /// with fresh internal unknowns.
    fn unify(&self, site: &Expr) -> Result<Vec<Invariant>, FuncError>;

    /// Fix one concrete signature from the solved function type and return it.
    fn build(&mut self, sig: &Type) -> Result<Type, BuildError>;
}

/// A running instance of a function.
pub trait Node: Send {
    /// Process input until the input closes, cancellation fires or no one is
    /// listening anymore. The output sender is dropped when this returns, on
    /// every path.
    fn stream(self: Box<Self>) -> Result<Exit, StreamError>;
}

/// Static facts about a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Info {
    /// Same inputs always produce the same output.
    pub pure: bool,
    /// Results may be cached across runs.
    pub memo: bool,
    /// Built signature, if any.
    pub sig: Option<Type>,
    /// Current validation error, if any.
    pub err: Option<BuildError>,
}

/// Runtime bindings for a node.
#[derive(Debug)]
pub struct Init {
    /// Input records, one struct value per change of any argument.
    pub input: Receiver<Value>,
    pub output: Sender<Value>,
    pub cancel: CancelToken,
}

/// Why a node stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// The input was closed and drained.
    Closed,
    /// The cancellation token fired.
    Cancelled,
    /// Every output receiver was dropped.
    Detached,
}

/// Run `node` on its own named thread.
pub fn spawn_node(
    name: &str,
    node: Box<dyn Node>,
) -> io::Result<JoinHandle<Result<Exit, StreamError>>> {
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || node.stream())
}
