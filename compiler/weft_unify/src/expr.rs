//! Expression handles.
//!
//! An [`Expr`] names one node of the compile-time expression graph. Handles
//! are cheap to clone and compare by identity, so they can key the solver's
//! maps and be captured by generator closures.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use weft_types::{Type, TypeError, Value};

static NEXT_EXPR_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of an expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// What an expression is.
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// A solver-only unknown with no source representation.
    Placeholder,
    /// A constant whose value is known statically.
    Literal(Value),
    /// A named reference whose value is only known at run time.
    Symbol(String),
    /// A function call.
    Call { func: String, args: Vec<Expr> },
}

struct ExprNode {
    id: ExprId,
    kind: ExprKind,
    /// Statically known type, refined at most once.
    ty: RwLock<Option<Type>>,
}

/// Shared handle to an expression node.
#[derive(Clone)]
pub struct Expr {
    node: Arc<ExprNode>,
}

impl Expr {
    fn alloc(kind: ExprKind, ty: Option<Type>) -> Self {
        Expr {
            node: Arc::new(ExprNode {
                id: ExprId::fresh(),
                kind,
                ty: RwLock::new(ty),
            }),
        }
    }

    /// A fresh unknown.
    pub fn placeholder() -> Self {
        Self::alloc(ExprKind::Placeholder, None)
    }

    /// A constant. Its type is known immediately.
    pub fn literal(value: Value) -> Self {
        let ty = value.ty();
        Self::alloc(ExprKind::Literal(value), Some(ty))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::alloc(ExprKind::Symbol(name.into()), None)
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::alloc(
            ExprKind::Call {
                func: func.into(),
                args,
            },
            None,
        )
    }

    #[inline]
    pub fn id(&self) -> ExprId {
        self.node.id
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.node.kind
    }

    /// The statically known type, if any.
    pub fn ty(&self) -> Option<Type> {
        self.node.ty.read().clone()
    }

    /// The statically known value, if any.
    pub fn value(&self) -> Option<&Value> {
        match &self.node.kind {
            ExprKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Record the type of this expression.
    ///
    /// The first resolved type sticks. Setting a type again succeeds only if
    /// it compares equal to the recorded one.
    pub fn set_type(&self, ty: Type) -> Result<(), TypeError> {
        if !ty.is_resolved() {
            return Ok(());
        }
        let mut slot = self.node.ty.write();
        match slot.as_ref() {
            Some(previous) => previous
                .compare(&ty)
                .map_err(|_| TypeError::AlreadySet {
                    previous: previous.clone(),
                    next: ty,
                }),
            None => {
                *slot = Some(ty);
                Ok(())
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("id", &self.id())
            .field("kind", self.kind())
            .finish()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Placeholder => write!(f, "{}", self.id()),
            ExprKind::Literal(value) => write!(f, "{value}"),
            ExprKind::Symbol(name) => f.write_str(name),
            ExprKind::Call { func, args } => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
