//! Function registry for looking up functions by name.

use rustc_hash::FxHashMap;

use crate::{PolyFunc, RegistryError, StructLookupOptionalFunc, STRUCT_LOOKUP_OPTIONAL};

/// Creates a fresh, unbuilt function.
pub type Constructor = fn() -> Box<dyn PolyFunc>;

/// Registry mapping function names to constructors.
///
/// Every lookup yields a new instance, so each call site builds its own
/// signature.
#[derive(Default)]
pub struct FuncRegistry {
    funcs: FxHashMap<&'static str, Constructor>,
}

impl FuncRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in function registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .funcs
            .insert(STRUCT_LOOKUP_OPTIONAL, StructLookupOptionalFunc::boxed);
        registry
    }

    pub fn register(&mut self, name: &'static str, ctor: Constructor) -> Result<(), RegistryError> {
        if self.funcs.contains_key(name) {
            return Err(RegistryError::Duplicate { name });
        }
        tracing::debug!(name, "registered function");
        self.funcs.insert(name, ctor);
        Ok(())
    }

    /// Instantiate the function registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Box<dyn PolyFunc>> {
        self.funcs.get(name).map(|ctor| ctor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.funcs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

impl std::fmt::Debug for FuncRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuncRegistry")
            .field("funcs", &self.names())
            .finish()
    }
}

/// Names starting with an underscore are reserved for functions the compiler
/// inserts itself; user code cannot spell them.
pub fn is_internal(name: &str) -> bool {
    name.starts_with('_')
}
