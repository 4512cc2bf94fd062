//! Constraint facts exchanged with the solver.

use std::fmt;

use weft_types::Type;

use crate::{Expr, GenerateResult, Generator, InvariantError, Solution};

/// A constraint handed to the solver.
///
/// Invariants are never mutated after creation; the solver only consumes
/// them.
#[derive(Clone, Debug)]
pub enum Invariant {
    /// `expr` has exactly type `ty`.
    Equals { expr: Expr, ty: Type },
    /// `left` and `right` share one (otherwise unconstrained) type.
    Equality { left: Expr, right: Expr },
    /// A function expression's argument and return positions.
    WrapFunc(WrapFunc),
    /// A struct expression's members.
    WrapStruct(WrapStruct),
    /// The return slot of `call` is produced by exactly the function `func`.
    WrapCall { call: Expr, func: Expr },
    /// The solver's record that `call` invokes `func` with `args`.
    CallArgs(CallArgs),
    /// Derives more invariants as types become known.
    Generator(Generator),
}

impl Invariant {
    pub fn equals(expr: Expr, ty: Type) -> Self {
        Invariant::Equals { expr, ty }
    }

    pub fn equality(left: Expr, right: Expr) -> Self {
        Invariant::Equality { left, right }
    }

    /// Tie `func` to ordered, named argument expressions and a return expression.
    pub fn wrap_func<I, S>(func: Expr, args: I, ret: Expr) -> Result<Self, InvariantError>
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        let args = unique_names(args)?;
        if args.is_empty() {
            return Err(InvariantError::NoArgs);
        }
        Ok(Invariant::WrapFunc(WrapFunc { func, args, ret }))
    }

    /// Tie each member of `expr` to its own expression, in member order.
    pub fn wrap_struct<I, S>(expr: Expr, fields: I) -> Result<Self, InvariantError>
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        let fields = unique_names(fields)?;
        Ok(Invariant::WrapStruct(WrapStruct { expr, fields }))
    }

    pub fn wrap_call(call: Expr, func: Expr) -> Self {
        Invariant::WrapCall { call, func }
    }

    pub fn call_args(call: Expr, func: Expr, args: Vec<Expr>) -> Self {
        Invariant::CallArgs(CallArgs { call, func, args })
    }

    pub fn generator<F>(site: Expr, generate: F) -> Self
    where
        F: Fn(&[Invariant], &Solution) -> GenerateResult + Send + Sync + 'static,
    {
        Invariant::Generator(Generator::new(site, generate))
    }

    /// Short name of the invariant kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Invariant::Equals { .. } => "equals",
            Invariant::Equality { .. } => "equality",
            Invariant::WrapFunc(_) => "wrap-func",
            Invariant::WrapStruct(_) => "wrap-struct",
            Invariant::WrapCall { .. } => "wrap-call",
            Invariant::CallArgs(_) => "call-args",
            Invariant::Generator(_) => "generator",
        }
    }
}

fn unique_names<I, S>(entries: I) -> Result<Vec<(String, Expr)>, InvariantError>
where
    I: IntoIterator<Item = (S, Expr)>,
    S: Into<String>,
{
    let mut out: Vec<(String, Expr)> = Vec::new();
    for (name, expr) in entries {
        let name = name.into();
        if out.iter().any(|(existing, _)| *existing == name) {
            return Err(InvariantError::DuplicateName { name });
        }
        out.push((name, expr));
    }
    Ok(out)
}

/// Payload of [`Invariant::WrapFunc`].
#[derive(Clone, Debug)]
pub struct WrapFunc {
    func: Expr,
    args: Vec<(String, Expr)>,
    ret: Expr,
}

impl WrapFunc {
    #[inline]
    pub fn func(&self) -> &Expr {
        &self.func
    }

    pub fn args(&self) -> impl Iterator<Item = (&str, &Expr)> + '_ {
        self.args.iter().map(|(name, expr)| (name.as_str(), expr))
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn ret(&self) -> &Expr {
        &self.ret
    }
}

/// Payload of [`Invariant::WrapStruct`].
#[derive(Clone, Debug)]
pub struct WrapStruct {
    expr: Expr,
    fields: Vec<(String, Expr)>,
}

impl WrapStruct {
    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Expr)> + '_ {
        self.fields.iter().map(|(name, expr)| (name.as_str(), expr))
    }

    pub fn field(&self, name: &str) -> Option<&Expr> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, expr)| expr)
    }
}

/// Payload of [`Invariant::CallArgs`].
#[derive(Clone, Debug)]
pub struct CallArgs {
    call: Expr,
    func: Expr,
    args: Vec<Expr>,
}

impl CallArgs {
    /// The call expression, which is also its return slot.
    #[inline]
    pub fn call(&self) -> &Expr {
        &self.call
    }

    #[inline]
    pub fn func(&self) -> &Expr {
        &self.func
    }

    #[inline]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// Find the solver's call record for the function expression `func`.
pub fn find_call_args<'a>(invariants: &'a [Invariant], func: &Expr) -> Option<&'a CallArgs> {
    invariants.iter().find_map(|invariant| match invariant {
        Invariant::CallArgs(call) if call.func() == func => Some(call),
        _ => None,
    })
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invariant::Equals { expr, ty } => write!(f, "{expr} == {ty}"),
            Invariant::Equality { left, right } => write!(f, "{left} == {right}"),
            Invariant::WrapFunc(wrap) => {
                write!(f, "{} == func(", wrap.func)?;
                for (i, (name, expr)) in wrap.args().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} {expr}")?;
                }
                write!(f, ") {}", wrap.ret)
            }
            Invariant::WrapStruct(wrap) => {
                write!(f, "{} == struct{{", wrap.expr)?;
                for (i, (name, expr)) in wrap.fields().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name} {expr}")?;
                }
                f.write_str("}")
            }
            Invariant::WrapCall { call, func } => write!(f, "{call} == call({func})"),
            Invariant::CallArgs(call) => {
                write!(f, "{} == {}(", call.call, call.func)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Invariant::Generator(generator) => write!(f, "generator({})", generator.site()),
        }
    }
}
